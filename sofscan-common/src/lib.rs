//! Helpers shared by the sofscan crates

pub mod utils;
