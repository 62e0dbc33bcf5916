use serde_json::Value;
use tracing::trace;

use crate::outcome::Outcome;
use crate::path::FieldPath;
use crate::processor::{wrong_shape, AfterSet, BeforeSet, Processor};

/// Processes a list item by item.
///
/// Same protocol as [`FieldSet`](super::FieldSet): the before set runs over
/// the whole list, then the item processor over each item with the item's
/// index pushed onto the path, then the after set.
///
/// # Example
///
/// ```rust
/// use sluice::chain::Step;
/// use sluice::filter::ToInt;
/// use sluice::processor::{Collection, Field, Processor};
/// use sluice::validator::IsInt;
/// use sluice::FieldPath;
/// use serde_json::json;
///
/// let ids = Collection::new("ids")
///     .with_each(Field::new("", vec![Step::filter(ToInt), Step::validator(IsInt)]));
///
/// let outcome = ids.process(&FieldPath::root(), json!(["1", "x"]));
/// assert_eq!(outcome.value(), &json!([1, "x"]));
/// assert_eq!(outcome.messages().unwrap().first().path.to_string(), "ids[1]");
/// ```
#[derive(Debug)]
pub struct Collection {
    processes: String,
    before: Option<BeforeSet>,
    each: Option<Box<dyn Processor>>,
    after: Option<AfterSet>,
}

impl Collection {
    pub fn new(processes: impl Into<String>) -> Self {
        Self {
            processes: processes.into(),
            before: None,
            each: None,
            after: None,
        }
    }

    pub fn with_before(mut self, before: BeforeSet) -> Self {
        self.before = Some(before);
        self
    }

    /// Sets the processor applied to every item.
    pub fn with_each(mut self, processor: impl Processor + 'static) -> Self {
        self.each = Some(Box::new(processor));
        self
    }

    pub fn with_after(mut self, after: AfterSet) -> Self {
        self.after = Some(after);
        self
    }
}

impl Processor for Collection {
    fn processes(&self) -> &str {
        &self.processes
    }

    fn process(&self, parent: &FieldPath, value: Value) -> Outcome {
        let path = parent.push_field(self.processes.as_str());

        let mut acc = match &self.before {
            Some(before) => before.run(&path, value),
            None => Outcome::no_result(value),
        };

        let mut items = match acc.value_mut().take() {
            Value::Array(items) => items,
            other => {
                trace!(path = %path, "collection received a non-list value");
                if !acc.is_valid() {
                    return acc.with_value(other);
                }
                return acc.merge(wrong_shape(&path, "Collection", "a list", other));
            }
        };

        if let Some(each) = &self.each {
            for (index, item) in items.iter_mut().enumerate() {
                let mut produced = each.process(&path.push_index(index), item.take());
                *item = produced.value_mut().take();
                acc = acc.absorb(produced);
            }
        }

        let value = Value::Array(items);
        match &self.after {
            Some(after) => acc.merge(after.run(&path, value)),
            None => acc.with_value(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::Step;
    use crate::filter::ToStr;
    use crate::outcome::Status;
    use crate::processor::Field;
    use crate::validator::{Count, Fails, IsList};
    use serde_json::json;

    #[test]
    fn test_rejects_non_lists() {
        let collection = Collection::new("a").with_each(Field::new("", vec![Step::validator(Fails)]));
        for value in [json!({"a": 1}), json!("a,b"), json!(1), Value::Null] {
            let outcome = collection.process(&FieldPath::root(), value.clone());
            assert_eq!(outcome.value(), &value);
            let messages = outcome.messages().unwrap();
            assert_eq!(messages.len(), 1);
            assert_eq!(messages.first().code, "invalid_type");
        }
    }

    #[test]
    fn test_items_are_processed_in_place() {
        let collection = Collection::new("a").with_each(Field::new("", vec![Step::filter(ToStr)]));
        let outcome = collection.process(&FieldPath::root(), json!([1, 2]));
        assert_eq!(outcome, Outcome::no_result(json!(["1", "2"])));
    }

    #[test]
    fn test_before_and_after_sets() {
        let collection = Collection::new("a")
            .with_before(BeforeSet::new(vec![Step::validator(IsList)]))
            .with_after(AfterSet::new(vec![Step::validator(Count::new(3, None))]));
        let outcome = collection.process(&FieldPath::from_field("query"), json!([1, 2]));
        assert_eq!(outcome.status(), Status::Invalid);
        let message = outcome.messages().unwrap().first();
        assert_eq!(message.path.to_string(), "query.a");
        assert_eq!(message.code, "too_few");
    }
}
