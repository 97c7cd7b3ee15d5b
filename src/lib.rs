//! Pick short-term-rental listings that satisfy budget, capacity and rating
//! targets by solving a small binary program per scenario.

pub mod cli;
pub mod config;
pub mod data;
pub mod optimizer;
pub mod parallel;
pub mod report;

pub use config::{ScenarioConfig, ScenarioFile, ScenarioMode, SolverSettings};
pub use data::{load_listings, Listing};
pub use optimizer::{solve_scenario, solve_scenarios, ScenarioError, ScenarioOutcome, ScenarioResult};
