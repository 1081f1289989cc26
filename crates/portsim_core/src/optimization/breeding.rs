//! Initial allocations, recombination and mutation

use std::collections::BTreeSet;

use rand::Rng;
use rand_distr::{Distribution, Uniform};

use crate::model::{Portfolio, Position};

use super::result::Individual;

/// Random allocation over `names`: `increments` units of `notional / increments`,
/// each handed to a uniformly chosen asset.
///
/// Every name is present, possibly with zero weight. The shape is a discrete
/// random walk, deliberately irregular rather than uniform over the simplex.
pub fn random_portfolio<R: Rng + ?Sized>(
    names: &[String],
    increments: u32,
    notional: f64,
    rng: &mut R,
) -> Portfolio {
    let mut weights = vec![0.0; names.len()];
    if !names.is_empty() {
        let unit = notional / f64::from(increments);
        for _ in 0..increments {
            weights[rng.random_range(0..names.len())] += unit;
        }
    }
    let positions = names
        .iter()
        .zip(weights)
        .map(|(name, weight)| Position::new(name.clone(), weight))
        .collect();
    Portfolio::from_positions_unchecked(positions)
}

/// Multiplicative mutation factor drawn from `[1 - spread, 1 + spread)`
#[derive(Debug, Clone)]
pub struct Mutation {
    factor: Option<Uniform<f64>>,
}

impl Mutation {
    /// `spread` must be in `[0, 1)`; zero disables mutation.
    #[must_use]
    pub fn new(spread: f64) -> Self {
        let factor = if spread > 0.0 {
            Uniform::new(1.0 - spread, 1.0 + spread).ok()
        } else {
            None
        };
        Self { factor }
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.factor.as_ref().map_or(1.0, |f| f.sample(rng))
    }
}

/// Uniform crossover of two parents.
///
/// For each asset held by either parent, take its weight from `a` or `b` with
/// equal probability (a missing position counts as zero), mutate it, then
/// rescale the offspring so its weights sum to `notional`. An all-zero
/// offspring becomes an even split.
pub fn recombine<R: Rng + ?Sized>(
    a: &Portfolio,
    b: &Portfolio,
    notional: f64,
    mutation: &Mutation,
    rng: &mut R,
) -> Portfolio {
    let names: BTreeSet<&str> = a
        .positions()
        .iter()
        .chain(b.positions())
        .map(|p| p.asset.as_str())
        .collect();

    let mut positions: Vec<Position> = names
        .into_iter()
        .map(|name| {
            let parent = if rng.random_bool(0.5) { a } else { b };
            Position::new(name, parent.weight(name) * mutation.sample(rng))
        })
        .collect();

    let total: f64 = positions.iter().map(|p| p.weight).sum();
    if total > 0.0 && total.is_finite() {
        for p in &mut positions {
            p.weight *= notional / total;
        }
    } else if !positions.is_empty() {
        let even = notional / positions.len() as f64;
        for p in &mut positions {
            p.weight = even;
        }
    }

    Portfolio::from_positions_unchecked(positions)
}

/// Replace the lower half of a population sorted ascending by rank with
/// offspring of parents drawn uniformly, with replacement, from the upper half.
pub fn breed<R: Rng + ?Sized>(
    population: &mut [Individual],
    notional: f64,
    mutation: &Mutation,
    rng: &mut R,
) {
    let half = population.len() / 2;
    let (weak, strong) = population.split_at_mut(half);
    if strong.is_empty() {
        return;
    }
    for child in weak {
        let a = &strong[rng.random_range(0..strong.len())].portfolio;
        let b = &strong[rng.random_range(0..strong.len())].portfolio;
        *child = Individual::new(recombine(a, b, notional, mutation, rng));
    }
}
