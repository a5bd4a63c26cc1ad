//! CLI module for agrimarket

pub mod app;
pub mod commands;

pub use app::AgriMarketApp;
pub use commands::{BoundsMode, Cli, Commands};
