//! Survey funnel — multi-step qualification wizard with webhook delivery.

pub mod config;
pub mod error;
pub mod terminal;
pub mod transport;
pub mod wizard;
