//! Lobsim Core Domain
//!
//! Pure domain types for the lobsim order-flow simulator.
//! This crate contains no I/O and is 100% unit testable.

pub mod dimension;
pub mod event;

// Re-export commonly used types at crate root
pub use dimension::Dimension;
pub use event::{Event, EventKind, Side};
