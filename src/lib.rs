//! Client registry of a sports complex.
//!
//! - `validate` holds the form rules (required fields, age bounds, phone
//!   format) and the phone display formatter
//! - `sv` services are the only code talking to the database
//! - `workflow::Editor` saves a client and its subscription as one unit
//!
//! Storage is SQLite through SeaORM; the schema lives in the `migration`
//! crate.

pub mod config;
pub mod entity;
pub mod error;
pub mod prelude;
pub mod state;
pub mod sv;
pub mod utils;
pub mod validate;
pub mod workflow;

#[cfg(test)]
mod test_utils;

pub use error::{Error, Result};
