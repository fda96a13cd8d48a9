//! Core types and trait definitions for the workload assessment engine.
//!
//! The engine turns a day's raw activity counts into a weighted score and a
//! five-level [`ActivityWeight`](weight::ActivityWeight). Counting and
//! persistence are reached through the [`FactorSource`](source::FactorSource)
//! and [`AssessmentStore`](store::AssessmentStore) ports; this crate has no
//! database or HTTP dependencies.

// Native `async fn` in traits; the port traits spell out their `Send` bounds.
#![allow(async_fn_in_trait)]

pub mod assessment;
pub mod config;
pub mod error;
pub mod factor;
pub mod factor_set;
pub mod snapshot;
pub mod source;
pub mod store;
pub mod taxonomy;
pub mod threshold;
pub mod weight;

#[cfg(test)]
mod testing;

pub use error::{Error, Result};
