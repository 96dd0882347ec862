pub mod app;
pub mod config;
pub mod dashboard;
pub mod engine;
pub mod shared;
pub mod tui;
