//! Integration test suite for taskrank.
//!
//! These tests drive the public API the way the CLI does: parse a batch
//! document, pick a strategy, score against a pinned reference date, and
//! inspect the resulting ranking and warnings.
//!
//! # Test Categories
//!
//! - `analyze_e2e`: Full analyze pipeline from JSON to ranked output
//! - `cycles`: Circular and dangling dependency handling
//! - `suggest`: Top-N suggestions, including query-string input
//! - `concurrency`: Independent requests scored in parallel


mod analyze_e2e;
mod cycles;
mod suggest;
