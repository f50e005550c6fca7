//! upkeep-planner core
//!
//! Priority-driven maintenance routing: locations lose cleanliness over
//! time, a dynamic priority ranks them, and a daily scheduler routes through
//! the most urgent ones with a priority-weighted shortest path search.

pub mod config;
pub mod defaults;
pub mod error;
pub mod graph;
pub mod pathfinder;
pub mod registry;
pub mod scheduler;
pub mod snapshot;
pub mod traits;
