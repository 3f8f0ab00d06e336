//! Application module: the session model shared by the TUI and runtime.
//!
//! `App` owns the track registry, the album catalog and the playback state
//! machine; every control-surface action funnels through its methods, which
//! return the `AudioCmd`s the runtime dispatches to the audio thread.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
