//! Validators: chain steps that judge a value without changing it.

mod collection;
mod fieldset;
mod numeric;
mod string;
mod types;
mod utility;

pub(crate) use collection::same_value;
pub use collection::{Contained, Count, Identical, Unique};
pub use fieldset::{FixedFields, RequiredFields};
pub use numeric::{Maximum, Minimum, MultipleOf};
pub use string::{Length, Pattern};
pub use types::{IsBool, IsFloat, IsInt, IsList, IsMap, IsNumber, IsString};
pub use utility::{Fails, Indifferent, Passes};
