//! Identity provider implementations

pub mod azure;

mod common;

pub use common::*;
