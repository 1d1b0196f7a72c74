//! CLI command implementations.

pub mod common;
pub mod info;
pub mod random;
pub mod synth;
pub mod version;
