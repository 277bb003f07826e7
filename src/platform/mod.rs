// JobTimeline - platform/mod.rs
//
// Platform abstraction layer: config file location and loading, file reads.
// Must NOT depend on: app.

pub mod config;
pub mod fs;
