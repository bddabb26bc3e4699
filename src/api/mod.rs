//! Client for the planner backend.
//!
//! All outgoing requests go through [`PlannerApi`]. Screens hold it as
//! `Arc<dyn PlannerApi>` so tests can swap in an in-memory backend.

mod client;
#[cfg(test)]
pub mod mock;
mod wire;

pub use client::{HttpApi, PlannerApi};
