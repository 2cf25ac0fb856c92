//! Cross-domain services

mod analytics;

pub use analytics::{AnalyticsService, DashboardReport};
