//! Tool definitions module.
//!
//! Each tool is defined in its own file and exposes a `descriptor()`
//! constructor consumed by the registry.

pub mod divide;
pub mod multiply;

pub use divide::DivideNumbersTool;
pub use multiply::MultiplyNumbersTool;
