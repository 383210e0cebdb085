//! Langpack library exports
//!
//! Discovers, installs, updates, activates and removes translation packages
//! for a host application's core, plugins and themes.

pub mod catalog;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod store;

pub use error::{LangpackError, Result};
