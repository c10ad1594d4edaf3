//! Request handlers.

pub mod analysis;
pub mod files;
pub mod health;

pub use analysis::*;
pub use files::*;
pub use health::*;
