//! Caller-facing rendering of scenario results.

use std::fmt::Write as _;

use serde::Serialize;

use crate::config::{ScenarioConfig, ScenarioMode};
use crate::optimizer::selection::Selection;
use crate::optimizer::ScenarioResult;

pub const STATUS_OPTIMAL: &str = "optimal";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedListing {
    pub index: usize,
    pub name: String,
    pub listing_url: String,
    pub price: f64,
    pub accommodates: u32,
    pub rating: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionSummary {
    pub objective_value: f64,
    pub total_cost: f64,
    pub excess: f64,
    pub deficit: f64,
    pub selected_count: usize,
    pub total_capacity: f64,
    pub average_rating: f64,
    pub listings: Vec<SelectedListing>,
}

impl From<&Selection> for SelectionSummary {
    fn from(selection: &Selection) -> Self {
        Self {
            objective_value: selection.objective_value,
            total_cost: selection.total_cost,
            excess: selection.excess,
            deficit: selection.deficit,
            selected_count: selection.selected_count,
            total_capacity: selection.total_capacity,
            average_rating: selection.average_rating,
            listings: selection
                .listings
                .iter()
                .map(|l| SelectedListing {
                    index: l.index,
                    name: l.name.clone(),
                    listing_url: l.listing_url.clone(),
                    price: l.price,
                    accommodates: l.accommodates,
                    rating: l.rating,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioReport {
    pub scenario: String,
    pub mode: ScenarioMode,
    pub budget: f64,
    /// `optimal` or the failure code.
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<SelectionSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl ScenarioReport {
    pub fn new(scenario: &ScenarioConfig, result: &ScenarioResult) -> Self {
        let base = Self {
            scenario: scenario.name.clone(),
            mode: scenario.mode,
            budget: scenario.budget,
            status: STATUS_OPTIMAL.to_string(),
            candidate_count: None,
            selection: None,
            failure: None,
        };
        match result {
            Ok(outcome) => Self {
                candidate_count: Some(outcome.candidates.len()),
                selection: Some(SelectionSummary::from(&outcome.selection)),
                ..base
            },
            Err(err) => Self {
                status: err.code().to_string(),
                failure: Some(err.to_string()),
                ..base
            },
        }
    }

    pub fn is_optimal(&self) -> bool {
        self.status == STATUS_OPTIMAL
    }
}

/// One report per scenario, paired positionally with `results`.
pub fn build_reports(scenarios: &[ScenarioConfig], results: &[ScenarioResult]) -> Vec<ScenarioReport> {
    scenarios
        .iter()
        .zip(results)
        .map(|(scenario, result)| ScenarioReport::new(scenario, result))
        .collect()
}

pub fn render_json(reports: &[ScenarioReport]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(reports)
}

/// Tab-separated summary, one row per scenario.
pub fn render_table(reports: &[ScenarioReport]) -> String {
    let mut out = String::from(
        "scenario\tstatus\tselected\ttotal_cost\texcess\tdeficit\tcapacity\tavg_rating\n",
    );
    for report in reports {
        match &report.selection {
            Some(s) => {
                let _ = writeln!(
                    out,
                    "{}\t{}\t{}\t{:.2}\t{:.2}\t{:.2}\t{}\t{:.3}",
                    report.scenario,
                    report.status,
                    s.selected_count,
                    s.total_cost,
                    s.excess,
                    s.deficit,
                    s.total_capacity,
                    s.average_rating
                );
            }
            None => {
                let _ = writeln!(out, "{}\t{}\t-\t-\t-\t-\t-\t-", report.scenario, report.status);
            }
        }
    }
    out
}
