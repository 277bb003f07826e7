// JobTimeline - core/mod.rs
//
// Core business logic layer.
// Must NOT depend on: platform or app. Reads no file contents.

pub mod catalog;
pub mod discovery;
pub mod extract;
pub mod model;
pub mod report;
pub mod timeline;
