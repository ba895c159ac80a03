//! Educational electricity demand response simulator.
//!
//! A static [`catalog`] of customer classes, technologies and rate plans, and
//! an hourly [`sim::engine::Engine`] that prices, curtails and scores each hour.

/// Customer classes, DR technologies and rate plans.
pub mod catalog;
pub mod config;
pub mod error;
pub mod io;
/// Simulation engine, pricing, load, events, and presenters.
pub mod sim;

#[cfg(feature = "api")]
pub mod api;
#[cfg(feature = "tui")]
pub mod tui;
