pub mod commands;
pub mod hint;
pub mod recent;
pub mod reveal;
pub mod scoring;
pub mod selector;
pub mod session;

// Re-export main components
pub use commands::*;
pub use hint::*;
pub use recent::*;
pub use reveal::*;
pub use scoring::*;
pub use selector::*;
pub use session::*;
