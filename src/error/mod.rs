//! Error types.
//!
//! Runtime failures are [`Message`]s collected in a [`MessageSet`] inside an
//! invalid outcome. Construction failures are [`BuildError`]s.

mod build_error;
mod message;

pub use build_error::{
    BuildError, CannotProcessOpenApi, CannotProcessSpecification, InvalidProcessorArguments,
};
pub use message::{Message, MessageSet};
