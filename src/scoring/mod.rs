//! Priority scoring.
//!
//! Components are normalized to [0, 1], combined under a [`Strategy`]'s
//! fixed weights, explained, and sorted by the [`ScoringEngine`].

pub mod components;
pub mod engine;
pub mod explain;
pub mod strategy;

pub use components::Components;
pub use engine::{resolve_strategy, Analysis, ScoringEngine, DEFAULT_SUGGEST_LIMIT};
pub use strategy::{Strategy, Weights};
