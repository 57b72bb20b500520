//! Crawler module for fetching and extracting directory resources
//!
//! This module contains the core pipeline, including:
//! - HTTP fetching without retries
//! - HTML and JSON extraction into records
//! - The fetch-or-cache coordinator that memoizes both

mod coordinator;
mod fetcher;
mod parser;

pub use coordinator::Coordinator;
pub use fetcher::{build_http_client, Fetcher};
pub use parser::{
    parse_nearby_place, parse_nearby_results, parse_site_detail, parse_state_directory,
    parse_state_site_list,
};
