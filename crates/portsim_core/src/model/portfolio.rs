//! Portfolio allocations
//!
//! A portfolio is a set of named positions with unscaled weights. Weights only
//! matter relative to each other; the evaluator and the optimizer normalize
//! them wherever a comparable scale is needed.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PortfolioError;

/// A single holding: asset name and its (unscaled) weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub asset: String,
    pub weight: f64,
}

impl Position {
    #[must_use]
    pub fn new(asset: impl Into<String>, weight: f64) -> Self {
        Self {
            asset: asset.into(),
            weight,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Position>", into = "Vec<Position>")]
pub struct Portfolio {
    positions: Vec<Position>,
}

impl Portfolio {
    /// Build a portfolio, rejecting duplicate names, negative or non-finite
    /// weights, and portfolios with nothing allocated.
    pub fn new(positions: Vec<Position>) -> Result<Self, PortfolioError> {
        if positions.is_empty() {
            return Err(PortfolioError::Empty);
        }
        for (i, pos) in positions.iter().enumerate() {
            if !pos.weight.is_finite() || pos.weight < 0.0 {
                return Err(PortfolioError::InvalidWeight {
                    asset: pos.asset.clone(),
                    weight: pos.weight,
                });
            }
            if positions[..i].iter().any(|p| p.asset == pos.asset) {
                return Err(PortfolioError::DuplicateAsset(pos.asset.clone()));
            }
        }
        if positions.iter().all(|p| p.weight == 0.0) {
            return Err(PortfolioError::ZeroTotal);
        }
        Ok(Self { positions })
    }

    /// Equal weight across `names`, scaled to `total`.
    pub fn equal_weight<'a>(
        names: impl IntoIterator<Item = &'a str>,
        total: f64,
    ) -> Result<Self, PortfolioError> {
        let names: Vec<&str> = names.into_iter().collect();
        if names.is_empty() {
            return Err(PortfolioError::Empty);
        }
        let weight = total / names.len() as f64;
        Self::new(names.into_iter().map(|n| Position::new(n, weight)).collect())
    }

    #[must_use]
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Weight of `asset`, or 0 if the portfolio does not hold it.
    #[must_use]
    pub fn weight(&self, asset: &str) -> f64 {
        self.positions
            .iter()
            .find(|p| p.asset == asset)
            .map_or(0.0, |p| p.weight)
    }

    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.positions.iter().map(|p| p.weight).sum()
    }

    /// Percentage allocation per asset, in position order.
    #[must_use]
    pub fn allocation(&self) -> Vec<(&str, f64)> {
        let total = self.total_weight();
        self.positions
            .iter()
            .map(|p| (p.asset.as_str(), 100.0 * p.weight / total))
            .collect()
    }

    /// Same proportions, rescaled so the weights sum to `total`.
    #[must_use]
    pub fn normalized(&self, total: f64) -> Self {
        let sum = self.total_weight();
        let positions = self
            .positions
            .iter()
            .map(|p| Position::new(p.asset.clone(), total * p.weight / sum))
            .collect();
        Self { positions }
    }

    /// Allocation percentages with one decimal, comma separated.
    #[must_use]
    pub fn csv_row(&self) -> String {
        self.allocation()
            .iter()
            .map(|(_, pct)| format!("{pct:.1}"))
            .collect::<Vec<_>>()
            .join(",")
    }

    // Constructor for code that already guarantees the invariants.
    pub(crate) fn from_positions_unchecked(positions: Vec<Position>) -> Self {
        Self { positions }
    }
}

impl fmt::Display for Portfolio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (asset, pct)) in self.allocation().into_iter().enumerate() {
            if i != 0 {
                f.write_str(", ")?;
            }
            write!(f, "{pct:2.0}% {asset}")?;
        }
        Ok(())
    }
}

impl TryFrom<Vec<Position>> for Portfolio {
    type Error = PortfolioError;

    fn try_from(positions: Vec<Position>) -> Result<Self, Self::Error> {
        Portfolio::new(positions)
    }
}

impl From<Portfolio> for Vec<Position> {
    fn from(portfolio: Portfolio) -> Self {
        portfolio.positions
    }
}
