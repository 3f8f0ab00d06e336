//! Catalog loading: directory listings, per-album metadata and the worker
//! thread that keeps network traffic off the UI loop.
//!
//! The server is nothing more than a static file tree rendered as HTML
//! directory listings; everything here consumes that listing format.

mod client;
mod listing;
mod model;
mod worker;

pub use client::FetchError;
pub use model::Album;
pub use worker::{CatalogCmd, CatalogEvent, CatalogHandle, spawn_catalog_worker};
