pub mod analytics;
pub mod chart;
pub mod market;
pub mod mutation;
pub mod notice;
pub mod projection;
pub mod purchase;
pub mod range_filter;
pub mod selection;
pub mod settings;
pub mod state;
pub mod table;
pub mod ticker;
