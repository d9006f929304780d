//! Dispatching with `-name value` notation.

use std::cell::RefCell;
use std::rc::Rc;

use bindery::{
    ActionDescriptor, BindError, BoundArgs, Dispatcher, Notation, ParameterDescriptor,
    RecordingMessenger, Value, ValueType,
};
use insta::assert_snapshot;

type Calls = Rc<RefCell<Vec<Vec<Value>>>>;

fn dispatcher(actions: Vec<ActionDescriptor>) -> (Dispatcher, Calls, RecordingMessenger) {
    let calls = Calls::default();
    let output = RecordingMessenger::new();
    let mut builder = Dispatcher::builder()
        .program("tool")
        .notation(Notation::Positional)
        .messenger(output.clone());
    for action in actions {
        let calls = calls.clone();
        builder = builder.action(action, move |args: &BoundArgs| {
            calls.borrow_mut().push(args.values().to_vec())
        });
    }
    (builder.build().unwrap(), calls, output)
}

fn copy_action() -> ActionDescriptor {
    ActionDescriptor::new("copy")
        .description("Copies a file")
        .parameter(ParameterDescriptor::new("source", ValueType::String).description("file to copy"))
        .parameter(ParameterDescriptor::new("target", ValueType::String))
        .parameter(
            ParameterDescriptor::new("retries", ValueType::Int)
                .optional(3)
                .alt_names(["r"]),
        )
}

#[test]
fn test_optional_pair_before_required_values() {
    let action = ActionDescriptor::new("m")
        .parameter(ParameterDescriptor::new("required", ValueType::String))
        .parameter(ParameterDescriptor::new("optional", ValueType::String).optional("none"));
    let (mut dispatcher, calls, _) = dispatcher(vec![action]);
    dispatcher
        .run_with(["-optional", "optional_value", "value"])
        .unwrap();
    assert_eq!(
        calls.borrow()[0],
        vec![Value::from("value"), Value::from("optional_value")]
    );
}

#[test]
fn test_alt_names_defaults_and_duplicates() {
    let (mut dispatcher, calls, _) = dispatcher(vec![copy_action()]);
    dispatcher.run_with(["a", "b"]).unwrap();
    dispatcher.run_with(["-r", "1", "-R", "2", "-nope", "x", "a", "b"]).unwrap();
    assert_eq!(calls.borrow()[0][2], Value::Int(3));
    assert_eq!(calls.borrow()[1][2], Value::Int(2));
}

#[test]
fn test_missing_trailing_values_fail() {
    let (mut dispatcher, calls, output) = dispatcher(vec![copy_action()]);
    let result = dispatcher.run_with(["a"]).unwrap();
    assert_eq!(result.error(), Some(&BindError::MissingRequired));
    assert!(calls.borrow().is_empty());
    assert_eq!(output.lines(), vec!["Error: Not all required parameters are set"]);
}

#[test]
fn test_multi_action_positional() {
    let (mut dispatcher, calls, _) = dispatcher(vec![
        copy_action(),
        ActionDescriptor::new("remove").parameter(ParameterDescriptor::new("path", ValueType::String)),
    ]);
    let result = dispatcher.run_with(["copy", "-retries", "0", "a", "b"]).unwrap();
    assert_eq!(result.action(), Some("copy"));
    assert_eq!(
        calls.borrow()[0],
        vec![Value::from("a"), Value::from("b"), Value::Int(0)]
    );
}

#[test]
fn test_positional_help() {
    let (mut dispatcher, _, output) = dispatcher(vec![copy_action()]);
    assert!(dispatcher.run_with(["help"]).unwrap().is_help());
    assert_snapshot!(output.output(), @r"
    Copies a file
    usage: tool [-retries number] source target
        source             file to copy
        [-retries number]
            default value: 3
    ");
}
