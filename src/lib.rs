//! GitHub MVP prompt generator: a thin proxy and page in front of an
//! external repository-analysis backend.

pub mod analytics;
pub mod cli;
pub mod config;
pub mod error;
pub mod gateway;
pub mod model;
pub mod shell;
pub mod ui;
pub mod utils;
pub mod web;
