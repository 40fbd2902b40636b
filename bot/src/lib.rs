pub mod api;
pub mod config;
pub mod events;
pub mod logging;
pub mod messages;
pub mod staleness;
