pub mod context;
pub mod cors;

pub use context::*;
pub use cors::*;
