//! PiggyBank - household expense splitting from the terminal
//!
//! Members of a shared household record expenses, split them equally among
//! the household's members, settle their shares and produce PDF reports of
//! what they owed over a period.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (users, households, expenses, shares, reports)
//! - `storage`: Store traits and the JSON file storage layer
//! - `services`: Business logic layer
//! - `reports`: Share breakdowns and PDF rendering
//! - `audit`: Audit logging system
//! - `export`: CSV export
//!
//! # Example
//!
//! ```rust,ignore
//! use piggybank::config::{paths::PiggyPaths, settings::Settings};
//! use piggybank::services::split;
//!
//! let paths = PiggyPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod observability;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{PiggyError, PiggyResult};
