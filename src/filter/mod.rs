//! Filters: chain steps that may transform the value they receive.
//!
//! Every filter reports its messages at the root path; the processor running
//! the chain moves them under its own field path.

mod request;
mod shape;
mod string;
mod types;

pub use request::{HttpParameters, MatchPath};
pub use shape::{Gather, Rename};
pub use string::{Explode, Implode, JsonDecode};
pub use types::{ToBool, ToFloat, ToInt, ToNumber, ToStr};
