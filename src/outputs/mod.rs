//! Output generation.
//!
//! The scraper core stops at an ordered `Vec<ContentRecord>`; rendering is
//! owned by the report renderer, which reads the JSON written here.
//!
//! # Submodules
//!
//! - [`json`]: Writes the aggregated records, with the report title and date, to one JSON file

pub mod json;
