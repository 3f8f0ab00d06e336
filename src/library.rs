//! The track registry: the in-memory catalog of currently loaded tracks.
//!
//! Identifiers map to playable sources (remote paths scoped to the active
//! folder, or session-owned copies of local files) and the ordered server
//! sequence drives next/previous navigation.

mod model;
mod registry;

pub use model::*;
pub use registry::Registry;
