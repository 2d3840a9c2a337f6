//! Pure domain logic for the complaint triage & analytics engine.
//!
//! Nothing in this crate touches the database or the network. Every
//! function operates on an immutable snapshot of complaint records that
//! the caller fetched from the store, and an explicit evaluation time
//! `now` — there is no hidden clock state, so identical inputs always
//! produce identical outputs.

pub mod analytics;
pub mod classifier;
pub mod complaint;
pub mod error;
pub mod escalation;
pub mod geo;
pub mod types;
