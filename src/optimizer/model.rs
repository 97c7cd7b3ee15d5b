//! Solver-independent formulation of the listing selection program.
//!
//! For candidates `i` with price `c_i` and capacity `k_i`, binary `x_i`, and
//! non-negative `excess` / `deficit`:
//!
//! ```text
//! minimise   Σ c_i x_i + penalty · excess
//! subject to Σ k_i x_i              >= min_capacity
//!            Σ x_i                  >= min_properties
//!            Σ c_i x_i + deficit - excess = budget
//! ```
//!
//! Only spending above the budget is penalised; spending below it is free.

use serde::Serialize;

use crate::config::ScenarioConfig;
use crate::data::listing::Listing;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionModel {
    /// `c_i`, one per candidate.
    pub costs: Vec<f64>,
    /// `k_i`, one per candidate.
    pub capacities: Vec<f64>,
    pub budget: f64,
    pub min_capacity: f64,
    /// Floor on the number of selected candidates.
    pub min_properties: f64,
    pub excess_penalty: f64,
}

/// Objective terms and constraint left-hand sides for one concrete selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Evaluation {
    pub total_cost: f64,
    pub total_capacity: f64,
    pub selected_count: usize,
    pub excess: f64,
    pub deficit: f64,
    pub objective_value: f64,
}

impl SelectionModel {
    pub fn from_candidates(candidates: &[Listing], scenario: &ScenarioConfig) -> Self {
        Self {
            costs: candidates.iter().map(|l| l.price).collect(),
            capacities: candidates.iter().map(|l| f64::from(l.accommodates)).collect(),
            budget: scenario.budget,
            min_capacity: scenario.min_capacity,
            min_properties: f64::from(scenario.min_properties),
            excess_penalty: scenario.excess_penalty,
        }
    }

    /// Number of binary selection variables.
    pub fn candidate_count(&self) -> usize {
        self.costs.len()
    }

    /// Combined capacity of every candidate.
    pub fn available_capacity(&self) -> f64 {
        self.capacities.iter().sum()
    }

    /// Evaluate a selection given as candidate positions.
    /// `excess` and `deficit` take the values the balance constraint forces
    /// when at most one of them is non-zero.
    pub fn evaluate(&self, selected: &[usize]) -> Evaluation {
        let total_cost: f64 = selected.iter().map(|&i| self.costs[i]).sum();
        let total_capacity: f64 = selected.iter().map(|&i| self.capacities[i]).sum();
        let excess = (total_cost - self.budget).max(0.0);
        let deficit = (self.budget - total_cost).max(0.0);
        Evaluation {
            total_cost,
            total_capacity,
            selected_count: selected.len(),
            excess,
            deficit,
            objective_value: total_cost + self.excess_penalty * excess,
        }
    }

    /// True when the selection meets the capacity and count floors.
    pub fn is_feasible(&self, selected: &[usize]) -> bool {
        let evaluation = self.evaluate(selected);
        evaluation.total_capacity >= self.min_capacity
            && evaluation.selected_count as f64 >= self.min_properties
    }
}
