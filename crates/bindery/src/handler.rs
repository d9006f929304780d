//! Action handler types.
//!
//! A handler is the body of an action. It receives the bound arguments and
//! returns `anyhow::Result<()>`. Errors from handlers are not diagnostics:
//! the dispatcher hands them back to the caller untouched, so their concrete
//! type survives (`err.downcast_ref::<MyError>()`).
//!
//! Closures are the common case:
//!
//! ```rust
//! use bindery::{BoundArgs, FnHandler, Handler, Value};
//!
//! let mut greet = FnHandler::new(|args: &BoundArgs| -> anyhow::Result<()> {
//!     let name: String = args.get("name")?;
//!     println!("hello {name}");
//!     Ok(())
//! });
//!
//! let args = BoundArgs::new("greet", vec!["name".into()], vec![Value::from("ada")]);
//! assert!(greet.invoke(&args).is_ok());
//! ```

use crate::error::ArgumentError;
use crate::value::{FromValue, Value};

/// Arguments bound to one action, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundArgs {
    action: String,
    names: Vec<String>,
    values: Vec<Value>,
}

impl BoundArgs {
    pub fn new(action: impl Into<String>, names: Vec<String>, values: Vec<Value>) -> Self {
        Self {
            action: action.into(),
            names,
            values,
        }
    }

    /// Declared name of the invoked action.
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Reads the parameter called `name` (ignoring case) as `T`.
    pub fn get<T: FromValue>(&self, name: &str) -> Result<T, ArgumentError> {
        let value = self
            .lookup(name)
            .ok_or_else(|| ArgumentError::UnknownArgument(name.to_string()))?;
        T::from_value(value).ok_or_else(|| ArgumentError::TypeMismatch {
            name: name.to_string(),
            expected: T::EXPECTED,
            found: value.kind(),
        })
    }

    pub fn lookup(&self, name: &str) -> Option<&Value> {
        let name = name.to_lowercase();
        self.names
            .iter()
            .position(|n| n.to_lowercase() == name)
            .and_then(|i| self.values.get(i))
    }

    pub fn value(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Conversion of a handler's return value into `anyhow::Result<()>`.
///
/// Lets closures return either nothing or any `Result<(), E>` whose error
/// converts into `anyhow::Error`.
pub trait IntoActionResult {
    fn into_action_result(self) -> anyhow::Result<()>;
}

impl IntoActionResult for () {
    fn into_action_result(self) -> anyhow::Result<()> {
        Ok(())
    }
}

impl<E> IntoActionResult for Result<(), E>
where
    E: Into<anyhow::Error>,
{
    fn into_action_result(self) -> anyhow::Result<()> {
        self.map_err(Into::into)
    }
}

/// Body of an action.
///
/// Takes `&mut self` so handlers can keep state between invocations.
pub trait Handler {
    fn invoke(&mut self, args: &BoundArgs) -> anyhow::Result<()>;
}

/// Implements [`Handler`] for an `FnMut` closure.
pub struct FnHandler<F, R> {
    f: F,
    _phantom: std::marker::PhantomData<fn() -> R>,
}

impl<F, R> FnHandler<F, R>
where
    F: FnMut(&BoundArgs) -> R,
    R: IntoActionResult,
{
    pub fn new(f: F) -> Self {
        Self {
            f,
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<F, R> Handler for FnHandler<F, R>
where
    F: FnMut(&BoundArgs) -> R,
    R: IntoActionResult,
{
    fn invoke(&mut self, args: &BoundArgs) -> anyhow::Result<()> {
        (self.f)(args).into_action_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("custom failure")]
    struct CustomError;

    fn args() -> BoundArgs {
        BoundArgs::new(
            "run",
            vec!["Count".into(), "label".into(), "maybe".into()],
            vec![Value::Int(3), Value::from("x"), Value::Null],
        )
    }

    #[test]
    fn test_get_typed_values() {
        let args = args();
        assert_eq!(args.get::<i32>("count").unwrap(), 3);
        assert_eq!(args.get::<String>("LABEL").unwrap(), "x");
        assert_eq!(args.get::<Option<i32>>("maybe").unwrap(), None);
    }

    #[test]
    fn test_get_unknown_argument() {
        let err = args().get::<i32>("missing").unwrap_err();
        assert_eq!(err.to_string(), "action has no parameter named 'missing'");
    }

    #[test]
    fn test_get_type_mismatch() {
        let err = args().get::<bool>("count").unwrap_err();
        assert_eq!(
            err.to_string(),
            "parameter 'count' holds a int value, which can not be read as bool"
        );
    }

    #[test]
    fn test_positional_access() {
        let args = args();
        assert_eq!(args.len(), 3);
        assert_eq!(args.value(1), Some(&Value::from("x")));
        assert_eq!(args.value(9), None);
        assert_eq!(args.action(), "run");
    }

    #[test]
    fn test_fn_handler_unit_return() {
        let mut calls = 0;
        {
            let mut handler = FnHandler::new(|_args: &BoundArgs| calls += 1);
            handler.invoke(&args()).unwrap();
            handler.invoke(&args()).unwrap();
        }
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_fn_handler_keeps_error_type() {
        let mut handler = FnHandler::new(|_args: &BoundArgs| Err::<(), _>(CustomError));
        let err = handler.invoke(&args()).unwrap_err();
        assert!(err.downcast_ref::<CustomError>().is_some());
    }
}
