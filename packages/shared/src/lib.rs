//! Utilities shared by the Hanashi server and client binaries.

pub mod logger;
pub mod time;
