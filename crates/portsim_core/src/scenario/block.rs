use jiff::civil::Date;
use rand::Rng;
use rand_distr::{Bernoulli, Distribution};

use crate::error::ScenarioError;
use crate::model::SeriesStore;

use super::historical::lookup;
use super::{Horizon, MonthlyClock, ScenarioProvider};

/// Default expected regime length for [`BlockBootstrap`], in months
pub const DEFAULT_EXPECTED_REGIME_MONTHS: u32 = 12;

/// Regime-persistence resampling of historical months.
///
/// Each step reads the same historical month for every asset, so
/// cross-asset co-movement is preserved. After each step the index moves to
/// the next month, except that with probability `1 / expected_regime_months`
/// (or whenever the next month does not exist) it jumps to a uniformly random
/// month in `1..len`. Index 0 is never sampled.
#[derive(Debug, Clone)]
pub struct BlockBootstrap<'a, R> {
    store: &'a SeriesStore,
    len: usize,
    index: usize,
    started: bool,
    jump: Bernoulli,
    clock: MonthlyClock,
    rng: R,
}

impl<'a, R: Rng> BlockBootstrap<'a, R> {
    pub fn new(
        store: &'a SeriesStore,
        horizon: Horizon,
        expected_regime_months: u32,
        mut rng: R,
    ) -> Result<Self, ScenarioError> {
        let len = store.common_len();
        if len < 2 {
            return Err(ScenarioError::InsufficientData { len });
        }
        if expected_regime_months == 0 {
            return Err(ScenarioError::InvalidRegimeLength(expected_regime_months));
        }
        let jump = Bernoulli::new(1.0 / f64::from(expected_regime_months))
            .map_err(|_| ScenarioError::InvalidRegimeLength(expected_regime_months))?;
        let index = rng.random_range(1..len);

        Ok(Self {
            store,
            len,
            index,
            started: false,
            jump,
            clock: horizon.clock(),
            rng,
        })
    }

    /// Historical month currently sampled.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    fn step_index(&mut self) {
        if self.index >= self.len - 1 || self.jump.sample(&mut self.rng) {
            self.index = self.rng.random_range(1..self.len);
        } else {
            self.index += 1;
        }
    }
}

impl<R: Rng> ScenarioProvider for BlockBootstrap<'_, R> {
    fn advance(&mut self) -> Option<Date> {
        let date = self.clock.tick()?;
        // The first step samples the start index drawn at construction
        if self.started {
            self.step_index();
        } else {
            self.started = true;
        }
        Some(date)
    }

    fn relative_return(&self, asset: &str) -> Result<f64, ScenarioError> {
        lookup(self.store, asset, self.index)
    }
}
