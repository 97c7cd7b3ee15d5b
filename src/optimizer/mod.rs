pub mod filter;
pub mod model;
pub mod selection;
pub mod solver;

use rayon::prelude::*;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{ConfigError, ScenarioConfig, SolverSettings};
use crate::data::listing::Listing;
use crate::optimizer::filter::RatingFilter;
use crate::optimizer::model::SelectionModel;
use crate::optimizer::selection::Selection;
use crate::optimizer::solver::{MicrolpSolver, ModelSolver, SolveStatus};
use crate::parallel::WorkerPool;

/// Recoverable reasons a scenario produced no selection.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error(transparent)]
    InvalidScenario(#[from] ConfigError),

    #[error("no listing clears the rating filter")]
    NoCandidates,

    #[error("candidates sleep {available} guests in total, scenario needs {required}")]
    InsufficientAggregateCapacity { available: f64, required: f64 },

    #[error("no optimal solution: {0}")]
    NoOptimalSolution(SolveStatus),
}

impl ScenarioError {
    /// Stable short code used in reports.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidScenario(_) => "invalid_scenario",
            Self::NoCandidates => "no_candidates",
            Self::InsufficientAggregateCapacity { .. } => "insufficient_aggregate_capacity",
            Self::NoOptimalSolution(SolveStatus::TimedOut) => "timed_out",
            Self::NoOptimalSolution(_) => "no_optimal_solution",
        }
    }
}

/// A solved scenario together with the inputs the solver saw.
#[derive(Debug, Clone)]
pub struct ScenarioOutcome {
    pub scenario: ScenarioConfig,
    pub selection: Selection,
    /// Listings that passed the rating filter, in table order.
    pub candidates: Vec<Listing>,
    pub model: SelectionModel,
}

pub type ScenarioResult = Result<ScenarioOutcome, ScenarioError>;

/// Solve one scenario over `listings` with the default microlp solver.
pub fn solve_scenario(
    listings: &[Listing],
    scenario: &ScenarioConfig,
    settings: &SolverSettings,
) -> ScenarioResult {
    solve_scenario_with(listings, scenario, &MicrolpSolver::new(settings.time_limit()))
}

/// Filter, pre-check, formulate and solve one scenario with `solver`.
/// The pre-checks run before the solver and short-circuit it.
pub fn solve_scenario_with<S: ModelSolver + ?Sized>(
    listings: &[Listing],
    scenario: &ScenarioConfig,
    solver: &S,
) -> ScenarioResult {
    scenario.validate()?;

    let candidates = RatingFilter::for_scenario(scenario).apply(listings);
    info!(
        scenario = %scenario.name,
        candidates = candidates.len(),
        listings = listings.len(),
        "rating filter applied"
    );
    if candidates.is_empty() {
        warn!(scenario = %scenario.name, "no candidates left after rating filter");
        return Err(ScenarioError::NoCandidates);
    }

    let model = SelectionModel::from_candidates(&candidates, scenario);
    let available = model.available_capacity();
    if available < scenario.min_capacity {
        warn!(
            scenario = %scenario.name,
            available,
            required = scenario.min_capacity,
            "candidates cannot reach the capacity floor"
        );
        return Err(ScenarioError::InsufficientAggregateCapacity {
            available,
            required: scenario.min_capacity,
        });
    }

    let raw = solver.solve(&model).map_err(|status| {
        warn!(scenario = %scenario.name, %status, "solve ended without an optimum");
        ScenarioError::NoOptimalSolution(status)
    })?;
    if !model.is_feasible(&raw.selected) {
        warn!(scenario = %scenario.name, "solver returned a selection below the floors");
        return Err(ScenarioError::NoOptimalSolution(SolveStatus::Failed(
            "selection violates the capacity or count floor".to_string(),
        )));
    }
    let selection = Selection::from_raw(&model, &candidates, &raw);
    info!(
        scenario = %scenario.name,
        selected = selection.selected_count,
        total_cost = selection.total_cost,
        objective = selection.objective_value,
        "scenario solved"
    );

    Ok(ScenarioOutcome {
        scenario: scenario.clone(),
        selection,
        candidates,
        model,
    })
}

/// Solve every scenario against the same table. Results keep the input order.
pub fn solve_scenarios(
    listings: &[Listing],
    scenarios: &[ScenarioConfig],
    settings: &SolverSettings,
) -> Vec<ScenarioResult> {
    let pool = WorkerPool::with_workers(settings.workers);
    pool.install(|| {
        scenarios
            .par_iter()
            .map(|scenario| solve_scenario(listings, scenario, settings))
            .collect()
    })
}
