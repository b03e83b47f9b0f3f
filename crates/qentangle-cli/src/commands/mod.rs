//! CLI command implementations.

pub mod bb84;
pub mod bell;
pub mod common;
pub mod teleport;
