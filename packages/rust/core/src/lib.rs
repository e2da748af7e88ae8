//! Content pipeline and domain logic for Pagesmith.
//!
//! This crate turns the site's data files into HTML: it resolves each record
//! against scraped metadata, renders cards, and splices them into the marker
//! regions of the site's pages (e.g., [`pipeline::build_site`]).

pub mod cards;
pub mod content;
pub mod dates;
pub mod pages;
pub mod pipeline;
pub mod slug;
pub mod splice;
pub mod writing;
