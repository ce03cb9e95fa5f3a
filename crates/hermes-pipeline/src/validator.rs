//! Input validation capability.

use crate::input::Input;
use hermes_core::BoxError;
use std::any::type_name;
use std::marker::PhantomData;

/// Checks a fully decoded input before the application sees it.
///
/// The error's message is sent to the client unchanged.
pub trait Validator: Send + Sync + 'static {
    /// Validates the input.
    fn validate(&self, input: &dyn Input) -> Result<(), BoxError>;
}

/// A validator over the type-erased input.
pub struct FnValidator<F>(F);

impl<F> FnValidator<F>
where
    F: Fn(&dyn Input) -> Result<(), BoxError> + Send + Sync + 'static,
{
    /// Wraps a closure.
    pub const fn new(func: F) -> Self {
        Self(func)
    }
}

impl<F> Validator for FnValidator<F>
where
    F: Fn(&dyn Input) -> Result<(), BoxError> + Send + Sync + 'static,
{
    fn validate(&self, input: &dyn Input) -> Result<(), BoxError> {
        (self.0)(input)
    }
}

/// A validator for one concrete input type.
///
/// Inputs of any other type are rejected.
///
/// ```
/// use hermes_pipeline::{TypedValidator, Validator};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Default, Serialize, Deserialize)]
/// struct Signup {
///     email: String,
/// }
///
/// let validator = TypedValidator::new(|signup: &Signup| {
///     if signup.email.contains('@') {
///         Ok(())
///     } else {
///         Err("email must contain '@'".into())
///     }
/// });
///
/// let input = Signup { email: "nobody".into() };
/// let err = validator.validate(&input).unwrap_err();
/// assert_eq!(err.to_string(), "email must contain '@'");
/// ```
pub struct TypedValidator<T, F> {
    func: F,
    _input: PhantomData<fn(&T)>,
}

impl<T, F> TypedValidator<T, F>
where
    T: 'static,
    F: Fn(&T) -> Result<(), BoxError> + Send + Sync + 'static,
{
    /// Wraps a closure over `T`.
    pub const fn new(func: F) -> Self {
        Self {
            func,
            _input: PhantomData,
        }
    }
}

impl<T, F> Validator for TypedValidator<T, F>
where
    T: 'static,
    F: Fn(&T) -> Result<(), BoxError> + Send + Sync + 'static,
{
    fn validate(&self, input: &dyn Input) -> Result<(), BoxError> {
        match input.downcast_ref::<T>() {
            Some(typed) => (self.func)(typed),
            None => Err(format!(
                "validator expects {} but received {}",
                type_name::<T>(),
                input.type_name()
            )
            .into()),
        }
    }
}
