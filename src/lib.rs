// Cross-platform input devices and action dispatch

pub mod core;
pub mod engine;
