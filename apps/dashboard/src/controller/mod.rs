//! Controller layer: backend events and input-to-command orchestration.

pub mod events;
pub mod orchestration;
