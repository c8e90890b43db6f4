pub mod color;
pub mod ramp;
