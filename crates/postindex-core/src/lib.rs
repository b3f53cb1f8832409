//! Postindex Core Library
//!
//! Build-time post extraction and index generation for a static blog, plus
//! the in-memory search engine that ranks posts against a query.

pub mod cache;
pub mod config;
pub mod error;
pub mod format;
pub mod index;
pub mod logging;
pub mod post;
pub mod search;
pub mod text;
