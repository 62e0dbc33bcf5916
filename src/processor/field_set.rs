use serde_json::Value;
use tracing::trace;

use crate::chain::{Chain, Step};
use crate::error::InvalidProcessorArguments;
use crate::outcome::Outcome;
use crate::path::FieldPath;
use crate::processor::{wrong_shape, Field, Processor};

/// A chain run over a whole container before its children.
#[derive(Debug, Default)]
pub struct BeforeSet(Chain);

impl BeforeSet {
    pub fn new(steps: Vec<Step>) -> Self {
        Self(Chain::new(steps))
    }

    pub(crate) fn run(&self, path: &FieldPath, value: Value) -> Outcome {
        self.0.run(value).prefixed(path)
    }
}

/// A chain run over a whole container after its children.
#[derive(Debug, Default)]
pub struct AfterSet(Chain);

impl AfterSet {
    pub fn new(steps: Vec<Step>) -> Self {
        Self(Chain::new(steps))
    }

    pub(crate) fn run(&self, path: &FieldPath, value: Value) -> Outcome {
        self.0.run(value).prefixed(path)
    }
}

/// Processes every key of a mapping not claimed by a named field.
#[derive(Debug)]
pub struct DefaultProcessor(Box<dyn Processor>);

impl DefaultProcessor {
    pub fn new(processor: impl Processor + 'static) -> Self {
        Self(Box::new(processor))
    }

    /// A default processor that runs `steps` over each unclaimed value.
    pub fn from_steps(steps: Vec<Step>) -> Self {
        Self::new(Field::new("", steps))
    }
}

/// One child handed to [`FieldSet::from_members`].
#[derive(Debug)]
pub enum Member {
    Before(BeforeSet),
    After(AfterSet),
    Default(DefaultProcessor),
    Field(Box<dyn Processor>),
}

impl Member {
    pub fn field(processor: impl Processor + 'static) -> Self {
        Member::Field(Box::new(processor))
    }
}

/// Processes a mapping field by field.
///
/// Execution order is fixed: the [`BeforeSet`] runs over the whole mapping,
/// then each named field in declaration order over the value under its key,
/// then the [`DefaultProcessor`] over each remaining key, then the
/// [`AfterSet`] over the whole mapping. Every child's output is written back
/// into the mapping before the next child runs.
///
/// Fields only run for keys that are present; use
/// [`RequiredFields`](crate::validator::RequiredFields) in the before set to
/// demand a key.
///
/// # Example
///
/// ```rust
/// use sluice::chain::Step;
/// use sluice::filter::ToInt;
/// use sluice::processor::{BeforeSet, Field, FieldSet, Processor};
/// use sluice::validator::{IsInt, RequiredFields};
/// use sluice::FieldPath;
/// use serde_json::json;
///
/// let pet = FieldSet::new("pet")
///     .with_before(BeforeSet::new(vec![Step::validator(RequiredFields::new(["id"]))]))
///     .field(Field::new("id", vec![Step::filter(ToInt), Step::validator(IsInt)]));
///
/// let outcome = pet.process(&FieldPath::root(), json!({"id": "7"}));
/// assert!(outcome.is_valid());
/// assert_eq!(outcome.value(), &json!({"id": 7}));
///
/// let outcome = pet.process(&FieldPath::root(), json!({}));
/// assert_eq!(outcome.messages().unwrap().first().path.to_string(), "pet.id");
/// ```
#[derive(Debug)]
pub struct FieldSet {
    processes: String,
    before: Option<BeforeSet>,
    fields: Vec<Box<dyn Processor>>,
    default: Option<DefaultProcessor>,
    after: Option<AfterSet>,
}

impl FieldSet {
    pub fn new(processes: impl Into<String>) -> Self {
        Self {
            processes: processes.into(),
            before: None,
            fields: Vec::new(),
            default: None,
            after: None,
        }
    }

    /// Partitions `members` into their slots.
    ///
    /// # Errors
    ///
    /// Fails if more than one before set, after set or default processor is
    /// given.
    pub fn from_members(
        processes: impl Into<String>,
        members: Vec<Member>,
    ) -> Result<Self, InvalidProcessorArguments> {
        let mut set = Self::new(processes);
        for member in members {
            match member {
                Member::Before(before) => {
                    if set.before.replace(before).is_some() {
                        return Err(InvalidProcessorArguments::MultipleBeforeSets);
                    }
                }
                Member::After(after) => {
                    if set.after.replace(after).is_some() {
                        return Err(InvalidProcessorArguments::MultipleAfterSets);
                    }
                }
                Member::Default(default) => {
                    if set.default.replace(default).is_some() {
                        return Err(InvalidProcessorArguments::MultipleDefaultProcessors);
                    }
                }
                Member::Field(field) => set.fields.push(field),
            }
        }
        Ok(set)
    }

    pub fn with_before(mut self, before: BeforeSet) -> Self {
        self.before = Some(before);
        self
    }

    pub fn with_after(mut self, after: AfterSet) -> Self {
        self.after = Some(after);
        self
    }

    pub fn with_default(mut self, default: DefaultProcessor) -> Self {
        self.default = Some(default);
        self
    }

    /// Appends a named field.
    pub fn field(mut self, processor: impl Processor + 'static) -> Self {
        self.fields.push(Box::new(processor));
        self
    }

    fn claims(&self, key: &str) -> bool {
        self.fields.iter().any(|field| field.processes() == key)
    }
}

impl Processor for FieldSet {
    fn processes(&self) -> &str {
        &self.processes
    }

    fn process(&self, parent: &FieldPath, value: Value) -> Outcome {
        let path = parent.push_field(self.processes.as_str());

        let mut acc = match &self.before {
            Some(before) => before.run(&path, value),
            None => Outcome::no_result(value),
        };

        let mut map = match acc.value_mut().take() {
            Value::Object(map) => map,
            other => {
                trace!(path = %path, "field set received a non-object value");
                if !acc.is_valid() {
                    return acc.with_value(other);
                }
                return acc.merge(wrong_shape(&path, "FieldSet", "an object", other));
            }
        };

        for field in &self.fields {
            if let Some(slot) = map.get_mut(field.processes()) {
                let mut produced = field.process(&path, slot.take());
                *slot = produced.value_mut().take();
                acc = acc.absorb(produced);
            }
        }

        if let Some(DefaultProcessor(default)) = &self.default {
            let unclaimed: Vec<String> = map.keys().filter(|key| !self.claims(key)).cloned().collect();
            for key in unclaimed {
                if let Some(slot) = map.get_mut(&key) {
                    let mut produced = default.process(&path.push_field(key.as_str()), slot.take());
                    *slot = produced.value_mut().take();
                    acc = acc.absorb(produced);
                }
            }
        }

        let value = Value::Object(map);
        match &self.after {
            Some(after) => acc.merge(after.run(&path, value)),
            None => acc.with_value(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::ToStr;
    use crate::outcome::Status;
    use crate::validator::{Fails, Passes};
    use serde_json::json;

    #[test]
    fn test_empty_field_set_has_no_opinion() {
        let set = FieldSet::new("a");
        assert_eq!(
            set.process(&FieldPath::root(), json!({})),
            Outcome::no_result(json!({}))
        );
    }

    #[test]
    fn test_only_present_fields_run() {
        let set = FieldSet::new("a").field(Field::new("b", vec![Step::validator(Fails)]));
        assert_eq!(set.process(&FieldPath::root(), json!({"c": 1})).status(), Status::NoResult);
        assert_eq!(set.process(&FieldPath::root(), json!({"b": 1})).status(), Status::Invalid);
    }

    #[test]
    fn test_default_processor_messages_carry_key() {
        let set = FieldSet::new("a").with_default(DefaultProcessor::from_steps(vec![Step::validator(Fails)]));
        let outcome = set.process(&FieldPath::root(), json!({"x": 1}));
        assert_eq!(outcome.messages().unwrap().first().path.to_string(), "a.x");
    }

    #[test]
    fn test_default_processor_transforms_unclaimed_keys() {
        let set = FieldSet::new("a")
            .field(Field::new("b", vec![Step::validator(Passes)]))
            .with_default(DefaultProcessor::from_steps(vec![Step::filter(ToStr)]));
        let outcome = set.process(&FieldPath::root(), json!({"b": 1, "c": 2}));
        assert_eq!(outcome.value(), &json!({"b": 1, "c": "2"}));
        assert_eq!(outcome.status(), Status::Valid);
    }

    #[test]
    fn test_from_members_rejects_second_default() {
        let result = FieldSet::from_members(
            "a",
            vec![
                Member::Default(DefaultProcessor::from_steps(Vec::new())),
                Member::Default(DefaultProcessor::from_steps(Vec::new())),
            ],
        );
        assert_eq!(
            result.unwrap_err(),
            InvalidProcessorArguments::MultipleDefaultProcessors
        );
    }
}
