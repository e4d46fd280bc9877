//! The library code for the `runeseries` series page generator. A series is a
//! named group of blog posts meant to be read in sequence; each series gets
//! one page listing its posts. Building the pages breaks down into three
//! steps:
//!
//! 1. Parsing posts from source files on disk ([`crate::parser`])
//! 2. Querying the posts of each series ([`crate::query`]): posts tagged with
//!    the pinned tag first, then the rest, each group newest first
//! 3. Rendering each [`crate::series::SeriesPage`] through the series template
//!    and writing the result to disk ([`crate::write`])
//!
//! [`crate::build::build_series`] runs all three for a loaded
//! [`crate::config::Config`].

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod config;
pub mod date;
pub mod excerpt;
pub mod parser;
pub mod post;
pub mod query;
pub mod series;
pub mod theme;
pub mod value;
pub mod write;
