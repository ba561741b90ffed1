//! Runtime module
//!
//! Application lifecycle and execution modes.

pub mod lifetime;
pub mod modes;
