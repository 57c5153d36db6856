//! The greedy hill-climbing driver.

use bnforge_core::{BayesianNetwork, Result};
use bnforge_scoring::Score;
use tracing::{debug, info};

use super::{SearchOptions, SearchStatistics, StopReason, StructureConstraints};
use crate::operator::{LocalScoreCache, Operator, OperatorPool, OperatorTabuSet};
use crate::restrictions::{force_restrictions, resolve, resolve_type_whitelist};

/// Greedy hill climbing over an [`OperatorPool`].
///
/// Each step applies the legal operator with the largest training delta.
/// The search owns the model for its whole duration and hands it back when
/// it stops.
///
/// # Example
///
/// ```
/// use bnforge_core::{BayesianNetwork, DataFrame, NetworkType};
/// use bnforge_scoring::Bic;
/// use bnforge_solver::{
///     GreedyHillClimbing, OperatorPool, OperatorSetType, SearchOptions, StructureConstraints,
/// };
///
/// let x: Vec<f64> = (0..50).map(|i| i as f64).collect();
/// let y: Vec<f64> = x.iter().map(|v| 3.0 * v + (v * 7.0).sin()).collect();
/// let df = DataFrame::new(vec![("x", x), ("y", y)]).unwrap();
///
/// let start = BayesianNetwork::new(NetworkType::Gaussian, &["x", "y"]).unwrap();
/// let mut pool = OperatorPool::from_types(&[OperatorSetType::Arcs]).unwrap();
/// let mut hc = GreedyHillClimbing::new();
/// let model = hc
///     .estimate(
///         &mut pool,
///         &Bic::new(df),
///         start,
///         &StructureConstraints::new(),
///         &SearchOptions::new(),
///     )
///     .unwrap();
///
/// assert_eq!(model.num_arcs(), 1);
/// ```
#[derive(Debug, Default)]
pub struct GreedyHillClimbing {
    statistics: Option<SearchStatistics>,
}

impl GreedyHillClimbing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Statistics of the most recent completed search.
    pub fn last_statistics(&self) -> Option<&SearchStatistics> {
        self.statistics.as_ref()
    }

    /// Validates the inputs and prepares `pool` for searching from `start`.
    fn init(
        &self,
        pool: &mut OperatorPool,
        score: &dyn Score,
        start: BayesianNetwork,
        constraints: &StructureConstraints,
        options: &SearchOptions,
    ) -> Result<BayesianNetwork> {
        score.validate(&start)?;
        let restrictions = resolve(
            &start,
            &constraints.arc_blacklist,
            &constraints.arc_whitelist,
            &constraints.edge_blacklist,
            &constraints.edge_whitelist,
        )?;
        let permitted = resolve_type_whitelist(&start, &constraints.type_whitelist)?;

        let mut model = start;
        force_restrictions(&mut model, &restrictions)?;
        model.force_type_whitelist(&permitted)?;

        pool.set_restrictions(&restrictions);
        pool.set_max_indegree(options.max_indegree);
        pool.set_type_whitelist(&permitted);
        pool.validate(&model)?;
        pool.cache_scores(&model, score);

        let operators: Vec<String> = pool.set_types().iter().map(ToString::to_string).collect();
        info!(
            event = "search_start",
            nodes = model.nodes().count(),
            score_type = %score.score_type(),
            operators = %operators.join(","),
            max_indegree = options.max_indegree,
            max_iters = options.max_iters,
            epsilon = options.epsilon,
            patience = options.patience,
        );
        Ok(model)
    }

    /// Climbs the training score until no operator improves it by more than
    /// `epsilon` or `max_iters` operators were applied.
    ///
    /// # Errors
    ///
    /// Fails before any search work if the score cannot evaluate `start`,
    /// the constraints do not resolve, or an operator set does not fit the
    /// network class.
    pub fn estimate(
        &mut self,
        pool: &mut OperatorPool,
        score: &dyn Score,
        start: BayesianNetwork,
        constraints: &StructureConstraints,
        options: &SearchOptions,
    ) -> Result<BayesianNetwork> {
        self.statistics = None;
        let mut model = self.init(pool, score, start, constraints, options)?;
        let max_iters = options.iteration_limit();
        let mut current = pool.local_scores().sum();
        let mut iterations = 0;

        let stop_reason = loop {
            if iterations >= max_iters {
                break StopReason::MaxIterations;
            }
            let Some(op) = pool.find_max(&model, options.epsilon, None) else {
                break StopReason::NoImprovingOperator;
            };
            pool.apply(&mut model, score, &op)?;
            iterations += 1;
            current += op.delta();
            log_step(options.verbose, iterations, &op, &model, current, None);
        };

        let statistics = SearchStatistics {
            iterations,
            evaluations: pool.evaluations(),
            stop_reason,
            score: pool.local_scores().sum(),
            validation_score: None,
        };
        log_end(&statistics);
        self.statistics = Some(statistics);
        Ok(model)
    }

    /// Climbs the training score of `score` while tracking `validation`.
    ///
    /// After every applied operator the validation score of the model is
    /// compared against the best seen so far. A strict improvement records
    /// the model, restores the patience and clears the tabu set. Otherwise
    /// the operator undoing the move becomes tabu and one unit of patience is
    /// spent; a non-improving step with no patience left stops the search.
    /// With `patience = p` the search therefore stops on the `p + 1`-th
    /// consecutive non-improving step; `p = 0` stops on the first.
    /// The search also stops like [`estimate`](Self::estimate).
    ///
    /// Every exit returns the model with the best validation score, which is
    /// never worse than the start model's.
    pub fn estimate_validation(
        &mut self,
        pool: &mut OperatorPool,
        score: &dyn Score,
        validation: &dyn Score,
        start: BayesianNetwork,
        constraints: &StructureConstraints,
        options: &SearchOptions,
    ) -> Result<BayesianNetwork> {
        self.statistics = None;
        validation.validate(&start)?;
        let mut model = self.init(pool, score, start, constraints, options)?;
        let max_iters = options.iteration_limit();

        let mut validation_cache = LocalScoreCache::new(&model, validation);
        let mut best_validation = validation_cache.sum();
        let mut best_model = model.clone();
        let mut best_score = pool.local_scores().sum();
        let mut remaining_patience = options.patience;
        let mut tabu = OperatorTabuSet::new();
        let mut current = best_score;
        let mut iterations = 0;

        let stop_reason = loop {
            if iterations >= max_iters {
                break StopReason::MaxIterations;
            }
            let Some(op) = pool.find_max(&model, options.epsilon, Some(&tabu)) else {
                break StopReason::NoImprovingOperator;
            };
            let opposite = op.opposite(&model);
            pool.apply(&mut model, score, &op)?;
            validation_cache.update(&model, validation, &op.nodes_changed());
            iterations += 1;
            current += op.delta();

            let validation_score = validation_cache.sum();
            log_step(
                options.verbose,
                iterations,
                &op,
                &model,
                current,
                Some(validation_score),
            );

            if validation_score > best_validation {
                best_validation = validation_score;
                best_model = model.clone();
                best_score = pool.local_scores().sum();
                remaining_patience = options.patience;
                tabu.clear();
            } else {
                if remaining_patience == 0 {
                    break StopReason::PatienceExhausted;
                }
                remaining_patience -= 1;
                tabu.insert(&opposite);
            }
        };

        let statistics = SearchStatistics {
            iterations,
            evaluations: pool.evaluations(),
            stop_reason,
            score: best_score,
            validation_score: Some(best_validation),
        };
        log_end(&statistics);
        self.statistics = Some(statistics);
        Ok(best_model)
    }
}

fn log_step(
    verbose: u8,
    iteration: usize,
    op: &Operator,
    model: &BayesianNetwork,
    score: f64,
    validation: Option<f64>,
) {
    let operator = op.describe(model);
    if verbose > 0 {
        info!(
            event = "step",
            iteration = iteration,
            operator = %operator,
            delta = op.delta(),
            score = score,
            validation = ?validation,
        );
    } else {
        debug!(
            event = "step",
            iteration = iteration,
            operator = %operator,
            delta = op.delta(),
            score = score,
            validation = ?validation,
        );
    }
}

fn log_end(statistics: &SearchStatistics) {
    info!(
        event = "search_end",
        iterations = statistics.iterations,
        evaluations = statistics.evaluations,
        score = statistics.score,
        validation = ?statistics.validation_score,
        reason = %statistics.stop_reason,
    );
}
