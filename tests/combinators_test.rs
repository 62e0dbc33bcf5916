use sluice::chain::Step;
use sluice::filter::{ToInt, ToNumber};
use sluice::processor::{AllOf, AnyOf, Field, FieldSet, Nullable, OneOf, Processor};
use sluice::validator::{IsInt, IsNumber, IsString, Minimum};
use sluice::{FieldPath, Outcome, Status};
use serde_json::{json, Value};

fn field(name: &str, steps: Vec<Step>) -> Box<dyn Processor> {
    Box::new(Field::new(name, steps))
}

fn id() -> OneOf {
    OneOf::new(
        "id",
        vec![
            field("id", vec![Step::validator(IsInt)]),
            field("id", vec![Step::validator(IsNumber)]),
            field("id", vec![Step::validator(IsString)]),
        ],
    )
}

// ====== OneOf ======

#[test]
fn test_one_of_single_match() {
    assert_eq!(
        id().process(&FieldPath::root(), json!("abc")),
        Outcome::valid(json!("abc"))
    );
    assert_eq!(
        id().process(&FieldPath::root(), json!(1.5)),
        Outcome::valid(json!(1.5))
    );
}

#[test]
fn test_one_of_ambiguous_match() {
    let outcome = id().process(&FieldPath::from_field("query"), json!(5));
    assert_eq!(outcome.status(), Status::Invalid);

    let messages = outcome.messages().unwrap();
    assert_eq!(messages.len(), 1);
    let message = messages.first();
    assert_eq!(message.path.to_string(), "query.id");
    assert_eq!(message.code, "one_of_multiple_matched");
    assert_eq!(message.args, vec!["Branch-1", "Branch-2"]);
    assert_eq!(
        message.message,
        "Value matched 2 branches (Branch-1, Branch-2), expected exactly one"
    );
}

#[test]
fn test_one_of_no_match_keeps_branch_messages() {
    let outcome = id().process(&FieldPath::root(), json!([1]));
    let messages = outcome.messages().unwrap();
    assert_eq!(messages.len(), 4);
    assert_eq!(messages.with_code("invalid_type").len(), 3);
    assert_eq!(messages.with_code("one_of_none_matched").len(), 1);
    assert_eq!(outcome.value(), &json!([1]));
}

// ====== AnyOf ======

#[test]
fn test_any_of_uses_first_accepting_branch() {
    let amount = AnyOf::new(
        "amount",
        vec![
            field("amount", vec![Step::validator(IsInt)]),
            field("amount", vec![Step::filter(ToNumber), Step::validator(IsNumber)]),
        ],
    );
    assert_eq!(
        amount.process(&FieldPath::root(), json!(7)),
        Outcome::valid(json!(7))
    );
    assert_eq!(
        amount.process(&FieldPath::root(), json!("7.5")),
        Outcome::valid(json!(7.5))
    );
    assert!(!amount.process(&FieldPath::root(), json!("seven")).is_valid());
}

// ====== AllOf ======

#[test]
fn test_all_of_accumulates_and_merges() {
    let pet = AllOf::new(
        "pet",
        vec![
            Box::new(FieldSet::new("pet").field(Field::new(
                "age",
                vec![Step::filter(ToInt), Step::validator(Minimum::inclusive(0.0))],
            ))),
            Box::new(FieldSet::new("pet").field(Field::new(
                "weight",
                vec![Step::filter(ToNumber), Step::validator(Minimum::exclusive(0.0))],
            ))),
        ],
    );

    let outcome = pet.process(&FieldPath::root(), json!({"age": "3", "weight": "4.5"}));
    assert_eq!(outcome, Outcome::valid(json!({"age": 3, "weight": 4.5})));

    let outcome = pet.process(&FieldPath::root(), json!({"age": "-1", "weight": "0"}));
    let paths: Vec<String> = outcome
        .messages()
        .unwrap()
        .iter()
        .map(|message| message.path.to_string())
        .collect();
    assert_eq!(paths, vec!["pet.age", "pet.weight"]);
}

// ====== Nullable ======

#[test]
fn test_nullable_wraps_any_processor() {
    let maybe_id = Nullable::new(id());
    assert_eq!(
        maybe_id.process(&FieldPath::root(), Value::Null),
        Outcome::valid(Value::Null)
    );
    assert!(!maybe_id.process(&FieldPath::root(), json!(5)).is_valid());
}
