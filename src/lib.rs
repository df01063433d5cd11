//! gamblebot: NFL 2+ touchdown probabilities against sportsbook prices
//!
//! This library provides the core components for:
//! - Weekly player stats and injury reports from nflverse
//! - Usage and scoring feature aggregation
//! - Eligibility filtering (position, usage, injury)
//! - Empirical-Bayes shrinkage and a Poisson 2+ TD model
//! - 2+ TD line classification and best-price selection from The Odds API
//! - Edge and fractional-Kelly stake sizing
//! - Append-only prediction logging and evaluation
//! - Console, CSV and HTML reports

pub mod cli;
pub mod config;
pub mod data;
pub mod edge;
pub mod error;
pub mod filter;
pub mod injury;
pub mod ledger;
pub mod model;
pub mod odds;
pub mod pipeline;
pub mod player;
pub mod report;
pub mod stats;
pub mod telemetry;
