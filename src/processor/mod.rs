//! Processor tree nodes.
//!
//! A [`Processor`] owns one named (or indexed) piece of data. Containers such
//! as [`FieldSet`] and [`Collection`] hand each child the value it owns
//! together with the container's path, so every message a child reports
//! carries the full path from the root of the tree.
//!
//! Trees are built once and are immutable afterwards; every node is `Send +
//! Sync` and a single tree can serve any number of threads.

mod collection;
mod combinators;
mod field;
mod field_set;
mod json;
mod request;

use std::fmt;

use serde_json::Value;

use crate::error::Message;
use crate::outcome::{type_name, Outcome};
use crate::path::FieldPath;

pub use collection::Collection;
pub use combinators::{AllOf, AnyOf, Nullable, OneOf};
pub use field::Field;
pub use field_set::{AfterSet, BeforeSet, DefaultProcessor, FieldSet, Member};
pub use json::Json;
pub use request::{Method, RawRequest, RequestProcessor};

/// A node in a processor tree.
pub trait Processor: Send + Sync + fmt::Debug {
    /// The key this processor owns in its parent. May be empty.
    fn processes(&self) -> &str;

    /// Processes `value`, the data found under [`processes`](Self::processes)
    /// in the parent at `parent`.
    fn process(&self, parent: &FieldPath, value: Value) -> Outcome;
}

impl<P: Processor + ?Sized> Processor for Box<P> {
    fn processes(&self) -> &str {
        (**self).processes()
    }

    fn process(&self, parent: &FieldPath, value: Value) -> Outcome {
        (**self).process(parent, value)
    }
}

/// The outcome for a container handed a value of the wrong shape.
pub(crate) fn wrong_shape(path: &FieldPath, processor: &str, expected: &str, value: Value) -> Outcome {
    let given = type_name(&value);
    Outcome::fail(
        value,
        Message::new(
            path.clone(),
            format!(
                "Value passed to {} must be {}, {} passed instead",
                processor, expected, given
            ),
        )
        .with_code("invalid_type")
        .with_arg(given),
    )
}
