//! Routing policy, cost model and decision records

mod config;
mod decision;
mod policy;

pub use config::RoutingConfig;
pub use decision::{Attempt, AttemptOutcome, RoutingDecision, RoutingOutcome};
pub use policy::{CostTable, RoutingPolicy};
