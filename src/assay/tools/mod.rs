pub mod aggregate;
pub mod annotate;
pub mod error;
pub mod io;
pub mod model;
pub mod pipeline;
pub mod plate;
pub mod split;
pub mod well;

pub use error::{Result, ToolError};
