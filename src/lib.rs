//! MedCopy - persona-driven medical marketing copy
//!
//! Turns a persona definition and a topic into platform-ready copy through a
//! generative model, with optional thought distillation, persona drift
//! checking and spreadsheet persistence of the results.

pub mod ai;
pub mod app;
pub mod compose;
pub mod config;
pub mod error;
pub mod mode;
pub mod models;
pub mod normalize;
pub mod presets;
pub mod prompts;
pub mod session;
pub mod sheets;

pub use error::{Error, Result};
