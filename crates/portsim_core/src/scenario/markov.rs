use std::collections::BTreeMap;
use std::sync::Arc;

use jiff::civil::Date;
use rand::Rng;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::error::ScenarioError;
use crate::model::TimeSeries;

use super::{Horizon, MonthlyClock, ScenarioProvider};

/// Discretize a fractional return into a per-mille state: `round(r * 1000)`.
#[must_use]
pub fn discretize(value: f64) -> i64 {
    (value * 1000.0).round() as i64
}

/// Slack allowed on the sum of a state's outgoing probabilities
const NORMALIZATION_TOLERANCE: f64 = 1e-9;

/// Weighted transition to a successor state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub target: i64,
    pub probability: f64,
}

/// First-order transition graph over discretized monthly returns.
///
/// Built from consecutive state pairs of a reference series, then pruned
/// until every edge target is itself a live source (so a walk can never
/// strand), then normalized so each source's outgoing probabilities sum to 1.
/// Read-only after construction; share it across providers with [`Arc`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionGraph {
    states: BTreeMap<i64, Vec<Edge>>,
}

impl TransitionGraph {
    pub fn from_series(reference: &TimeSeries) -> Result<Self, ScenarioError> {
        let states: Vec<i64> = reference.values().map(discretize).collect();

        let mut counts: FxHashMap<i64, FxHashMap<i64, u32>> = FxHashMap::default();
        for pair in states.windows(2) {
            *counts
                .entry(pair[0])
                .or_default()
                .entry(pair[1])
                .or_default() += 1;
        }

        loop {
            let live: FxHashSet<i64> = counts.keys().copied().collect();
            let mut removed = false;
            for edges in counts.values_mut() {
                let before = edges.len();
                edges.retain(|target, _| live.contains(target));
                removed |= edges.len() != before;
            }
            let before = counts.len();
            counts.retain(|_, edges| !edges.is_empty());
            removed |= counts.len() != before;
            if !removed {
                break;
            }
        }

        if counts.is_empty() {
            return Err(ScenarioError::EmptyModel);
        }

        let states = counts
            .into_iter()
            .map(|(source, edges)| {
                let total: u32 = edges.values().sum();
                let mut edges: Vec<Edge> = edges
                    .into_iter()
                    .map(|(target, count)| Edge {
                        target,
                        probability: f64::from(count) / f64::from(total),
                    })
                    .collect();
                edges.sort_by_key(|e| e.target);
                (source, edges)
            })
            .collect();

        Ok(Self { states })
    }

    /// Live states in ascending order.
    pub fn states(&self) -> impl Iterator<Item = i64> + '_ {
        self.states.keys().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    #[must_use]
    pub fn edges(&self, state: i64) -> Option<&[Edge]> {
        self.states.get(&state).map(Vec::as_slice)
    }

    /// Pick a successor of `state` for a uniform draw `u` in `[0, 1)`.
    ///
    /// `None` when `state` is unknown or its probabilities do not cover `u`.
    /// A shortfall within [`NORMALIZATION_TOLERANCE`] of 1 goes to the last edge.
    fn successor(&self, state: i64, u: f64) -> Option<i64> {
        let edges = self.states.get(&state)?;
        let mut cumulative = 0.0;
        for edge in edges {
            cumulative += edge.probability;
            if u < cumulative {
                return Some(edge.target);
            }
        }
        if cumulative >= 1.0 - NORMALIZATION_TOLERANCE {
            edges.last().map(|e| e.target)
        } else {
            None
        }
    }
}

/// Synthetic future walking a [`TransitionGraph`].
///
/// Single-factor: every asset receives the same growth factor
/// `1 + state / 1000` at each step, whatever its name.
#[derive(Debug, Clone)]
pub struct MarkovBootstrap<R> {
    graph: Arc<TransitionGraph>,
    state: i64,
    clock: MonthlyClock,
    rng: R,
}

impl<R: Rng> MarkovBootstrap<R> {
    /// Build the graph from `reference` and start a walk over it.
    pub fn new(reference: &TimeSeries, horizon: Horizon, rng: R) -> Result<Self, ScenarioError> {
        let graph = Arc::new(TransitionGraph::from_series(reference)?);
        Self::from_graph(graph, horizon, rng)
    }

    /// Start a walk over an already built graph, at a uniformly random state.
    pub fn from_graph(
        graph: Arc<TransitionGraph>,
        horizon: Horizon,
        mut rng: R,
    ) -> Result<Self, ScenarioError> {
        if graph.is_empty() {
            return Err(ScenarioError::EmptyModel);
        }
        let pick = rng.random_range(0..graph.len());
        let state = graph.states().nth(pick).ok_or(ScenarioError::EmptyModel)?;

        Ok(Self {
            graph,
            state,
            clock: horizon.clock(),
            rng,
        })
    }

    #[must_use]
    pub fn state(&self) -> i64 {
        self.state
    }

    #[must_use]
    pub fn graph(&self) -> &Arc<TransitionGraph> {
        &self.graph
    }
}

impl<R: Rng> ScenarioProvider for MarkovBootstrap<R> {
    fn advance(&mut self) -> Option<Date> {
        let date = self.clock.tick()?;
        let u = self.rng.random::<f64>();
        match self.graph.successor(self.state, u) {
            Some(next) => self.state = next,
            // Pruning and normalization guarantee a successor for every draw
            None => panic!(
                "markov walk stranded at state {} (draw {u})",
                self.state
            ),
        }
        Some(date)
    }

    fn relative_return(&self, _asset: &str) -> Result<f64, ScenarioError> {
        Ok(1.0 + self.state as f64 / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn reference(values: &[f64]) -> TimeSeries {
        TimeSeries::monthly("ref", date(2000, 1, 31), values)
    }

    fn horizon() -> Horizon {
        Horizon::anchored(date(2025, 1, 15), 30)
    }

    #[test]
    fn test_discretize() {
        assert_eq!(discretize(0.0123), 12);
        assert_eq!(discretize(-0.0456), -46);
        assert_eq!(discretize(0.0005), 1);
        assert_eq!(discretize(0.0), 0);
    }

    #[test]
    fn test_graph_counts_and_normalizes() {
        // States 10 -> 20 -> 10 -> 10 -> 20 -> 10
        let graph =
            TransitionGraph::from_series(&reference(&[0.01, 0.02, 0.01, 0.01, 0.02, 0.01]))
                .unwrap();

        assert_eq!(graph.states().collect::<Vec<_>>(), vec![10, 20]);
        let edges = graph.edges(10).unwrap();
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].target, 10);
        assert!((edges[0].probability - 1.0 / 3.0).abs() < 1e-12);
        assert!((edges[1].probability - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(
            graph.edges(20).unwrap(),
            &[Edge {
                target: 10,
                probability: 1.0
            }]
        );
    }

    #[test]
    fn test_prunes_terminal_states_transitively() {
        // 10 <-> 20 cycle, then a tail 20 -> 30 -> 40 where 40 never has a successor
        let graph = TransitionGraph::from_series(&reference(&[
            0.01, 0.02, 0.01, 0.02, 0.03, 0.04,
        ]))
        .unwrap();

        assert_eq!(graph.states().collect::<Vec<_>>(), vec![10, 20]);
        for state in graph.states() {
            let edges = graph.edges(state).unwrap();
            let total: f64 = edges.iter().map(|e| e.probability).sum();
            assert!((total - 1.0).abs() < 1e-9);
            assert!(edges.iter().all(|e| graph.edges(e.target).is_some()));
        }
    }

    #[test]
    fn test_acyclic_series_is_empty_model() {
        let err = TransitionGraph::from_series(&reference(&[0.01, 0.02, 0.03]));
        assert_eq!(err, Err(ScenarioError::EmptyModel));
        let err = TransitionGraph::from_series(&reference(&[0.01]));
        assert_eq!(err, Err(ScenarioError::EmptyModel));
    }

    #[test]
    fn test_walk_emits_horizon_steps_on_live_states() {
        let values = [0.01, -0.02, 0.03, 0.01, -0.02, 0.01, 0.03, -0.02];
        let mut provider =
            MarkovBootstrap::new(&reference(&values), horizon(), StdRng::seed_from_u64(42))
                .unwrap();

        let live: Vec<i64> = provider.graph().states().collect();
        let mut steps = 0;
        while provider.advance().is_some() {
            assert!(live.contains(&provider.state()));
            steps += 1;
        }
        assert_eq!(steps, 360);
        assert_eq!(provider.advance(), None);
    }

    #[test]
    fn test_factor_is_name_independent() {
        let mut provider = MarkovBootstrap::new(
            &reference(&[0.012, 0.012, 0.012]),
            horizon(),
            StdRng::seed_from_u64(42),
        )
        .unwrap();
        provider.advance();
        assert_eq!(provider.state(), 12);
        assert!((provider.relative_return("ANY").unwrap() - 1.012).abs() < 1e-12);
        assert_eq!(
            provider.relative_return("OTHER").unwrap(),
            provider.relative_return("ANY").unwrap()
        );
    }

    fn graph_of(states: Vec<(i64, Vec<(i64, f64)>)>) -> TransitionGraph {
        TransitionGraph {
            states: states
                .into_iter()
                .map(|(state, edges)| {
                    let edges = edges
                        .into_iter()
                        .map(|(target, probability)| Edge {
                            target,
                            probability,
                        })
                        .collect();
                    (state, edges)
                })
                .collect(),
        }
    }

    #[test]
    fn test_successor_rejects_under_normalized_edges() {
        let graph = graph_of(vec![(1, vec![(1, 0.25), (2, 0.25)]), (2, vec![(1, 1.0)])]);
        assert_eq!(graph.successor(1, 0.1), Some(1));
        assert_eq!(graph.successor(1, 0.4), Some(2));
        assert_eq!(graph.successor(1, 0.9), None);
        assert_eq!(graph.successor(3, 0.1), None);
    }

    #[test]
    fn test_successor_absorbs_rounding_shortfall() {
        let graph = graph_of(vec![(1, vec![(1, 0.5), (2, 0.5 - 1e-12)]), (2, vec![(1, 1.0)])]);
        assert_eq!(graph.successor(1, 1.0 - 1e-13), Some(2));
    }

    #[test]
    #[should_panic(expected = "markov walk stranded at state 1")]
    fn test_walk_halts_on_uncovered_draw() {
        let graph = Arc::new(graph_of(vec![(1, vec![(1, 0.0)])]));
        let mut provider =
            MarkovBootstrap::from_graph(graph, horizon(), StdRng::seed_from_u64(1)).unwrap();
        provider.advance();
    }

    #[test]
    fn test_same_seed_same_walk() {
        let values = [0.01, -0.02, 0.03, 0.01, -0.02, 0.01, 0.03, -0.02];
        let graph = Arc::new(TransitionGraph::from_series(&reference(&values)).unwrap());
        let walk = |seed| {
            let mut p =
                MarkovBootstrap::from_graph(Arc::clone(&graph), horizon(), StdRng::seed_from_u64(seed))
                    .unwrap();
            let mut states = Vec::new();
            while p.advance().is_some() {
                states.push(p.state());
            }
            states
        };
        assert_eq!(walk(3), walk(3));
    }
}
