pub mod analytics_service;
pub mod chart_service;
pub mod projection_service;
pub mod sync_service;
