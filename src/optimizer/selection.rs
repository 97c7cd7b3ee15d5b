use serde::Serialize;
use tracing::debug;

use crate::data::listing::Listing;
use crate::optimizer::model::SelectionModel;
use crate::optimizer::solver::RawSolution;

/// Allowed gap between solver deviation values and the recomputed ones.
pub const DEVIATION_TOLERANCE: f64 = 1e-6;

/// Listings chosen by an optimal solve and the figures they achieve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selection {
    pub objective_value: f64,
    pub total_cost: f64,
    /// Spend above the budget.
    pub excess: f64,
    /// Budget left unspent.
    pub deficit: f64,
    pub selected_count: usize,
    pub total_capacity: f64,
    /// Mean overall rating of the selected listings; 0 when nothing is selected.
    pub average_rating: f64,
    /// Selected listings in table order.
    pub listings: Vec<Listing>,
}

impl Selection {
    /// Build from solver output. Money figures are recomputed from the chosen
    /// prices so they do not carry solver round-off. With a zero excess penalty
    /// the solver may hold both deviations positive; the recomputed values win.
    pub fn from_raw(model: &SelectionModel, candidates: &[Listing], raw: &RawSolution) -> Self {
        let evaluation = model.evaluate(&raw.selected);
        if !raw.deviations_match(&evaluation, DEVIATION_TOLERANCE) {
            debug!(
                solver_excess = raw.excess,
                solver_deficit = raw.deficit,
                excess = evaluation.excess,
                deficit = evaluation.deficit,
                "solver deviations differ from realized cost; using realized values"
            );
        }
        let listings: Vec<Listing> = raw
            .selected
            .iter()
            .map(|&i| candidates[i].clone())
            .collect();
        let average_rating = if listings.is_empty() {
            0.0
        } else {
            listings.iter().map(|l| l.rating).sum::<f64>() / listings.len() as f64
        };

        Self {
            objective_value: evaluation.objective_value,
            total_cost: evaluation.total_cost,
            excess: evaluation.excess,
            deficit: evaluation.deficit,
            selected_count: evaluation.selected_count,
            total_capacity: evaluation.total_capacity,
            average_rating,
            listings,
        }
    }

    pub fn indices(&self) -> Vec<usize> {
        self.listings.iter().map(|l| l.index).collect()
    }
}
