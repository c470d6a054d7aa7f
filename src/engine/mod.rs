// Engine modules: input clock and input system

pub mod clock;
pub mod input;
