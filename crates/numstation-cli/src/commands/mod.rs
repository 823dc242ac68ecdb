//! CLI command implementations

pub mod concat;
pub mod doctor;
pub mod samples;
