use std::fmt;

/// Errors raised while constructing or driving a scenario provider
#[derive(Debug, Clone, PartialEq)]
pub enum ScenarioError {
    /// The provider has no series for this asset
    DataNotFound(String),
    /// The provider's cursor does not point at a usable entry of the asset's series
    IndexOutOfRange {
        asset: String,
        index: usize,
        len: usize,
    },
    /// Resampling needs at least two entries in the shortest series
    InsufficientData { len: usize },
    /// Every state of the Markov transition graph was pruned away
    EmptyModel,
    /// Expected regime length must be at least one month
    InvalidRegimeLength(u32),
}

impl fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioError::DataNotFound(asset) => write!(f, "no such data: {asset:?}"),
            ScenarioError::IndexOutOfRange { asset, index, len } => {
                write!(
                    f,
                    "index out of bounds for {asset:?}: have {index}, size {len}"
                )
            }
            ScenarioError::InsufficientData { len } => {
                write!(f, "need at least 2 data points to resample, have {len}")
            }
            ScenarioError::EmptyModel => {
                write!(f, "transition graph is empty after pruning terminal states")
            }
            ScenarioError::InvalidRegimeLength(months) => {
                write!(f, "expected regime length must be >= 1 month, got {months}")
            }
        }
    }
}

impl std::error::Error for ScenarioError {}

/// Errors related to portfolio construction
#[derive(Debug, Clone, PartialEq)]
pub enum PortfolioError {
    DuplicateAsset(String),
    InvalidWeight { asset: String, weight: f64 },
    Empty,
    ZeroTotal,
}

impl fmt::Display for PortfolioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortfolioError::DuplicateAsset(asset) => {
                write!(f, "asset {asset:?} appears more than once")
            }
            PortfolioError::InvalidWeight { asset, weight } => {
                write!(f, "invalid weight {weight} for asset {asset:?}")
            }
            PortfolioError::Empty => write!(f, "portfolio has no positions"),
            PortfolioError::ZeroTotal => write!(f, "portfolio weights sum to zero"),
        }
    }
}

impl std::error::Error for PortfolioError {}

/// Errors that abort an optimization run
#[derive(Debug, Clone)]
pub enum OptimizeError {
    /// Configuration error
    Config(String),
    Scenario(ScenarioError),
    Portfolio(PortfolioError),
}

impl fmt::Display for OptimizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptimizeError::Config(msg) => write!(f, "configuration error: {msg}"),
            OptimizeError::Scenario(e) => write!(f, "scenario error: {e}"),
            OptimizeError::Portfolio(e) => write!(f, "portfolio error: {e}"),
        }
    }
}

impl std::error::Error for OptimizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OptimizeError::Scenario(e) => Some(e),
            OptimizeError::Portfolio(e) => Some(e),
            OptimizeError::Config(_) => None,
        }
    }
}

impl From<ScenarioError> for OptimizeError {
    fn from(err: ScenarioError) -> Self {
        OptimizeError::Scenario(err)
    }
}

impl From<PortfolioError> for OptimizeError {
    fn from(err: PortfolioError) -> Self {
        OptimizeError::Portfolio(err)
    }
}

/// Errors raised by the forecast and backtest front ends
#[derive(Debug, Clone)]
pub enum AnalysisError {
    Config(String),
    Scenario(ScenarioError),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::Config(msg) => write!(f, "configuration error: {msg}"),
            AnalysisError::Scenario(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for AnalysisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AnalysisError::Scenario(e) => Some(e),
            AnalysisError::Config(_) => None,
        }
    }
}

impl From<ScenarioError> for AnalysisError {
    fn from(err: ScenarioError) -> Self {
        AnalysisError::Scenario(err)
    }
}
