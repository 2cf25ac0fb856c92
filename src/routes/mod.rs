//! Route definitions for the Towaba API

mod analytics;
mod campaign;
mod payment;
mod period;
mod vote;

pub use analytics::analytics_routes;
pub use campaign::campaign_routes;
pub use payment::payment_routes;
pub use period::{cron_routes, period_routes};
pub use vote::vote_routes;
