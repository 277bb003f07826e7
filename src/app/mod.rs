// JobTimeline - app/mod.rs
//
// Application layer: orchestration of a report run.
// Dependencies: core and platform layers.

pub mod pipeline;
