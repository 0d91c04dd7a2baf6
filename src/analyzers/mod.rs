//! Per-account and cross-account views over filtered datasets.
//!
//! Every function here is pure: it reads a dataset and returns a view
//! structure for the rendering layer. Nothing mutates the input.

pub mod compare;
pub mod hashtags;
pub mod mentions;
pub mod stats;
pub mod timeseries;
pub mod types;
pub mod utility;
