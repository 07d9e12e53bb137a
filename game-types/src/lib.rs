pub mod overlay;
pub mod platform;

// Re-export all types
pub use overlay::*;
pub use platform::*;
