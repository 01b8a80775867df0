//! Configuration module for PiggyBank
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::PiggyPaths;
pub use settings::{FanoutPolicy, Settings};
