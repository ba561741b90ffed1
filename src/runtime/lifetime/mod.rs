//! Application lifecycle management
//!
//! Startup wiring shared by the server and CLI modes.

pub mod startup;
