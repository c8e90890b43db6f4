pub mod adjust;
pub mod loader;
pub mod resize;
