//! StrataDB Server Library
//!
//! This library exposes server modules for integration testing.

pub mod lifecycle;
