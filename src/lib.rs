//! # Scout Agent
//!
//! An esports opponent scouting service with AI-assisted counter-strategy
//! generation.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (match records, profiles, briefs)
//! - **fetch**: Bounded-concurrency match telemetry fetching with caching
//! - **aggregate**: Order-independent statistical accumulators
//! - **classify**: Deterministic threshold rules producing profiles
//! - **composition**: Composition archetype analysis and counter tables
//! - **strategy**: Counter-strategy synthesis with rule-based fallback
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod aggregate;
pub mod api;
pub mod classify;
pub mod composition;
pub mod config;
pub mod fetch;
pub mod models;
pub mod service;
pub mod strategy;

pub use models::*;
