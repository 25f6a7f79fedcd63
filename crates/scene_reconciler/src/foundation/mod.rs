//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the reconciler:
//! - Math types backing the settable property values
//! - Handle types for the object and node arenas
//! - Logging utilities

pub mod math;
pub mod collections;
pub mod logging;
