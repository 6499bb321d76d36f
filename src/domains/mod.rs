//! Domain modules containing business logic.
//!
//! Each domain owns its types, errors and registration.

pub mod tools;
