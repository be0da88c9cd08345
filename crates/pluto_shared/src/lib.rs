//! Shared primitives used across the Pluto CSS engine crates.

pub mod byte_stream;
pub mod config;
pub mod errors;
