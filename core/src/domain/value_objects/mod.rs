//! Value objects describing the outcome of gateway and auth calls.

pub mod outcome;

pub use outcome::{ApiOutcome, LoginOutcome, PendingStep, RegisterOutcome};
