//! Data models for the canonical metadata document.

mod document;
mod site_config;

pub use document::*;
pub use site_config::*;
