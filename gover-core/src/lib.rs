#![doc = "gover-core: scraping pipeline for Go release notes."]

//! This crate resolves the latest Go 1.x release, fetches the release history
//! and every minor release's notes from go.dev, and merges them into ordered
//! [`model::VersionData`] records.
//!
//! # Usage
//! Build a [`config::ScrapeConfig`], wrap a [`fetch::HttpFetcher`] (or any
//! [`contract::PageFetcher`]) in an `Arc` and call [`pipeline::scrape`].

pub mod aggregate;
pub mod config;
pub mod contract;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod history;
pub mod model;
pub mod pages;
pub mod pipeline;
pub mod rate_limit;
pub mod resolve;
