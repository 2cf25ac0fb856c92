//! API handlers for the Towaba backend

mod analytics;
mod campaign;
mod payment;
mod period;
mod vote;

pub use analytics::*;
pub use campaign::*;
pub use payment::*;
pub use period::*;
pub use vote::*;
