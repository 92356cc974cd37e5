//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the crate:
//! - Math types for pen positions, vertices and label transforms
//! - Logging utilities

pub mod math;
pub mod logging;
