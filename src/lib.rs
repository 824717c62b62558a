//! Berichtsheft generator: turns per-day activity notes into German
//! training-report entries through an LLM provider.

pub mod api;
pub mod client;
pub mod config;
pub mod inference;
pub mod model;
pub mod orchestrator;
pub mod progress;
pub mod prompts;
pub mod wizard;
