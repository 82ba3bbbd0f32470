pub mod error;
pub mod lifecycle;
pub mod notes;
pub mod schedule;
