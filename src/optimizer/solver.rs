//! Solves a [SelectionModel] with good_lp's microlp backend.
//!
//! With a time limit the model is solved on its own thread and the caller waits
//! on a channel until the deadline. An expired solve is abandoned: the thread
//! finishes in the background and its answer is discarded.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use good_lp::{
    constraint, microlp, variable, variables, Expression, ResolutionError, Solution, SolverModel,
    Variable,
};
use serde::Serialize;
use tracing::{debug, warn};

use crate::optimizer::model::{Evaluation, SelectionModel};

/// Binary variables above this value count as selected.
pub const SELECTION_THRESHOLD: f64 = 0.5;

/// Why a solve ended without a proven optimum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum SolveStatus {
    Infeasible,
    Unbounded,
    TimedOut,
    Failed(String),
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Infeasible => write!(f, "infeasible"),
            Self::Unbounded => write!(f, "unbounded"),
            Self::TimedOut => write!(f, "time limit reached"),
            Self::Failed(reason) => write!(f, "solver failed: {reason}"),
        }
    }
}

impl From<ResolutionError> for SolveStatus {
    fn from(err: ResolutionError) -> Self {
        match err {
            ResolutionError::Infeasible => Self::Infeasible,
            ResolutionError::Unbounded => Self::Unbounded,
            other => Self::Failed(other.to_string()),
        }
    }
}

/// Variable values read back from an optimal solve.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSolution {
    /// Candidate positions whose `x_i` exceeded [SELECTION_THRESHOLD], ascending.
    pub selected: Vec<usize>,
    /// Solver value of the `excess` deviation variable.
    pub excess: f64,
    /// Solver value of the `deficit` deviation variable.
    pub deficit: f64,
}

impl RawSolution {
    /// True when the solver's deviation variables agree with the deviations
    /// implied by the realized cost of `evaluation`.
    pub fn deviations_match(&self, evaluation: &Evaluation, tolerance: f64) -> bool {
        (self.excess - evaluation.excess).abs() <= tolerance
            && (self.deficit - evaluation.deficit).abs() <= tolerance
    }
}

/// Anything that can turn a [SelectionModel] into an optimal selection.
pub trait ModelSolver {
    fn solve(&self, model: &SelectionModel) -> Result<RawSolution, SolveStatus>;
}

/// Pure-Rust branch-and-bound solver with an optional wall-clock limit.
///
/// microlp cannot be interrupted. When the limit expires, [ModelSolver::solve]
/// returns [SolveStatus::TimedOut] at once, but the solve thread keeps running
/// (and using a core) until microlp finishes on its own. In a scenario batch
/// that thread competes with the remaining solves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MicrolpSolver {
    pub time_limit: Option<Duration>,
}

impl MicrolpSolver {
    pub fn new(time_limit: Option<Duration>) -> Self {
        Self { time_limit }
    }
}

impl ModelSolver for MicrolpSolver {
    fn solve(&self, model: &SelectionModel) -> Result<RawSolution, SolveStatus> {
        match self.time_limit {
            None => solve_guarded(model),
            Some(limit) => solve_with_deadline(model.clone(), limit),
        }
    }
}

fn solve_guarded(model: &SelectionModel) -> Result<RawSolution, SolveStatus> {
    catch_unwind(AssertUnwindSafe(|| solve_blocking(model)))
        .unwrap_or_else(|_| Err(SolveStatus::Failed("solver panicked".to_string())))
}

fn solve_with_deadline(model: SelectionModel, limit: Duration) -> Result<RawSolution, SolveStatus> {
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name("microlp-solve".into())
        .spawn(move || {
            // The receiver is gone when the deadline already passed.
            let _ = tx.send(solve_guarded(&model));
        })
        .map_err(|err| SolveStatus::Failed(format!("could not spawn solver thread: {err}")))?;

    match rx.recv_timeout(limit) {
        Ok(result) => result,
        Err(mpsc::RecvTimeoutError::Timeout) => {
            warn!(limit_secs = limit.as_secs_f64(), "solve abandoned at time limit");
            Err(SolveStatus::TimedOut)
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => {
            Err(SolveStatus::Failed("solver thread exited without a result".to_string()))
        }
    }
}

fn weighted_sum(vars: &[Variable], weights: &[f64]) -> Expression {
    vars.iter()
        .zip(weights)
        .fold(Expression::from(0.0), |acc, (x, w)| acc + *w * *x)
}

fn solve_blocking(model: &SelectionModel) -> Result<RawSolution, SolveStatus> {
    let mut vars = variables!();
    let xs: Vec<Variable> = (0..model.candidate_count())
        .map(|i| vars.add(variable().binary().name(format!("x_{i}"))))
        .collect();
    let excess = vars.add(variable().min(0.0).name("excess"));
    let deficit = vars.add(variable().min(0.0).name("deficit"));

    let spend = weighted_sum(&xs, &model.costs);
    let capacity = weighted_sum(&xs, &model.capacities);
    let count = xs.iter().fold(Expression::from(0.0), |acc, x| acc + *x);
    let objective = spend.clone() + model.excess_penalty * excess;

    debug!(
        candidates = xs.len(),
        budget = model.budget,
        min_capacity = model.min_capacity,
        min_properties = model.min_properties,
        "solving selection model"
    );

    let solution = vars
        .minimise(objective)
        .using(microlp)
        .with(constraint!(capacity >= model.min_capacity))
        .with(constraint!(count >= model.min_properties))
        .with(constraint!(spend + deficit - excess == model.budget))
        .solve()?;

    let selected = xs
        .iter()
        .enumerate()
        .filter(|(_, x)| solution.value(**x) > SELECTION_THRESHOLD)
        .map(|(i, _)| i)
        .collect();

    Ok(RawSolution {
        selected,
        excess: solution.value(excess).max(0.0),
        deficit: solution.value(deficit).max(0.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(costs: &[f64], capacities: &[f64], budget: f64, min_capacity: f64, min_properties: f64) -> SelectionModel {
        SelectionModel {
            costs: costs.to_vec(),
            capacities: capacities.to_vec(),
            budget,
            min_capacity,
            min_properties,
            excess_penalty: 1.0,
        }
    }

    #[test]
    fn picks_cheapest_combination_meeting_capacity() {
        let m = model(&[100.0, 200.0, 300.0], &[10.0, 20.0, 30.0], 250.0, 20.0, 1.0);
        let raw = MicrolpSolver::default().solve(&m).expect("optimal");
        assert_eq!(raw.selected, vec![1]);
        assert!((raw.deficit - 50.0).abs() < 1e-6);
        assert!(raw.excess.abs() < 1e-6);
    }

    #[test]
    fn reports_infeasible_when_count_floor_exceeds_candidates() {
        let m = model(&[100.0, 200.0], &[10.0, 20.0], 500.0, 0.0, 3.0);
        let err = MicrolpSolver::default().solve(&m).unwrap_err();
        assert_eq!(err, SolveStatus::Infeasible);
    }

    #[test]
    fn time_limited_solve_returns_same_answer() {
        let m = model(&[100.0, 200.0, 300.0], &[10.0, 20.0, 30.0], 250.0, 40.0, 1.0);
        let unlimited = MicrolpSolver::default().solve(&m).expect("optimal");
        let limited = MicrolpSolver::new(Some(Duration::from_secs(30)))
            .solve(&m)
            .expect("optimal");
        assert_eq!(unlimited, limited);
    }

    #[test]
    fn expired_time_limit_reports_timed_out() {
        let costs: Vec<f64> = (0..60).map(|i| 80.0 + ((i * 37) % 400) as f64).collect();
        let capacities: Vec<f64> = (0..60).map(|i| 1.0 + (i % 8) as f64).collect();
        let m = SelectionModel {
            costs,
            capacities,
            budget: 2_000.0,
            min_capacity: 97.0,
            min_properties: 13.0,
            excess_penalty: 1.0,
        };
        let err = MicrolpSolver::new(Some(Duration::from_nanos(1)))
            .solve(&m)
            .unwrap_err();
        assert_eq!(err, SolveStatus::TimedOut);
    }

    #[test]
    fn deviations_match_within_tolerance() {
        let m = model(&[100.0, 200.0], &[10.0, 20.0], 250.0, 0.0, 0.0);
        let evaluation = m.evaluate(&[1]);
        let exact = RawSolution {
            selected: vec![1],
            excess: 0.0,
            deficit: 50.0 + 1e-9,
        };
        let degenerate = RawSolution {
            selected: vec![1],
            excess: 10.0,
            deficit: 60.0,
        };
        assert!(exact.deviations_match(&evaluation, 1e-6));
        assert!(!degenerate.deviations_match(&evaluation, 1e-6));
    }

    #[test]
    fn status_display_is_readable() {
        assert_eq!(SolveStatus::TimedOut.to_string(), "time limit reached");
        assert_eq!(
            SolveStatus::from(ResolutionError::Infeasible),
            SolveStatus::Infeasible
        );
    }
}
