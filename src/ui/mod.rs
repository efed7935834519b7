//! Terminal feedback helpers

pub mod progress;
