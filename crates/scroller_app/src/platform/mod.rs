mod app;
mod config;
mod logging;
mod persistence;
mod ui;

pub use app::run_app;
