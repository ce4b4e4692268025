//! URL handling module for Kensaku
//!
//! This module derives a crawl job's site key from its seed URL and resolves
//! discovered links against that site, dropping anything that leaves it.

mod domain;
mod normalize;

// Re-export main functions
pub use domain::{canonical_seed, site_of};
pub use normalize::process_url;
