//! SCREENER: multi-timeframe Ichimoku + MACD equity screener.
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod indicators;
pub mod data;
pub mod universe;
pub mod strategy;
pub mod engine;
pub mod dashboard;
