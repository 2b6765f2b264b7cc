//! Environment values handed to transition handlers.
//!
//! A handler names what it needs through its `Deps` type; the executor pulls
//! those values out of a [`Services`] container before the handler runs.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;

/// Typed container of environment values, keyed by type.
///
/// # Example
///
/// ```rust
/// use entity_states::effects::Services;
///
/// struct Clock(u64);
///
/// let services = Services::new().with(Clock(42));
/// assert_eq!(services.get::<Clock>().map(|c| c.0), Some(42));
/// assert!(services.get::<String>().is_none());
/// ```
#[derive(Default)]
pub struct Services {
    values: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Services {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value, replacing any previous value of the same type.
    pub fn with<T: Any + Send + Sync>(mut self, value: T) -> Self {
        self.insert(value);
        self
    }

    /// Add a value, returning the one it replaced.
    pub fn insert<T: Any + Send + Sync>(&mut self, value: T) -> Option<T> {
        self.values
            .insert(TypeId::of::<T>(), Box::new(value))
            .and_then(|old| old.downcast::<T>().ok())
            .map(|old| *old)
    }

    pub fn get<T: Any>(&self) -> Option<&T> {
        self.values
            .get(&TypeId::of::<T>())
            .and_then(|value| value.downcast_ref::<T>())
    }

    pub fn contains<T: Any>(&self) -> bool {
        self.values.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for Services {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Services")
            .field("len", &self.values.len())
            .finish()
    }
}

/// A required value was not present in [`Services`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingDependency {
    pub dependency: &'static str,
}

/// Values that can be pulled out of [`Services`].
///
/// Implemented for `()`, `&T`, `Option<&T>`, and tuples of up to four of
/// those. `&T` is required; `Option<&T>` is not.
pub trait FromServices<'s>: Sized {
    fn from_services(services: &'s Services) -> Result<Self, MissingDependency>;
}

impl<'s> FromServices<'s> for () {
    fn from_services(_: &'s Services) -> Result<Self, MissingDependency> {
        Ok(())
    }
}

impl<'s, T: Any + Send + Sync> FromServices<'s> for &'s T {
    fn from_services(services: &'s Services) -> Result<Self, MissingDependency> {
        services.get::<T>().ok_or(MissingDependency {
            dependency: type_name::<T>(),
        })
    }
}

impl<'s, T: Any + Send + Sync> FromServices<'s> for Option<&'s T> {
    fn from_services(services: &'s Services) -> Result<Self, MissingDependency> {
        Ok(services.get::<T>())
    }
}

macro_rules! tuple_from_services {
    ($($name:ident),+) => {
        impl<'s, $($name: FromServices<'s>),+> FromServices<'s> for ($($name,)+) {
            fn from_services(services: &'s Services) -> Result<Self, MissingDependency> {
                Ok(($($name::from_services(services)?,)+))
            }
        }
    };
}

tuple_from_services!(A);
tuple_from_services!(A, B);
tuple_from_services!(A, B, C);
tuple_from_services!(A, B, C, D);

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Mailer(&'static str);

    #[derive(Debug, PartialEq)]
    struct Ledger(u32);

    #[test]
    fn insert_replaces_by_type() {
        let mut services = Services::new();
        assert_eq!(services.insert(Ledger(1)), None);
        assert_eq!(services.insert(Ledger(2)), Some(Ledger(1)));
        assert_eq!(services.get::<Ledger>(), Some(&Ledger(2)));
        assert_eq!(services.len(), 1);
    }

    #[test]
    fn required_dependency_resolves() {
        let services = Services::new().with(Mailer("smtp"));
        let mailer = <&Mailer>::from_services(&services).unwrap();
        assert_eq!(mailer, &Mailer("smtp"));
    }

    #[test]
    fn missing_required_dependency_is_reported() {
        let services = Services::new();
        let err = <&Mailer>::from_services(&services).unwrap_err();
        assert!(err.dependency.ends_with("Mailer"));
    }

    #[test]
    fn optional_dependency_may_be_absent() {
        let services = Services::new();
        let ledger = <Option<&Ledger>>::from_services(&services).unwrap();
        assert!(ledger.is_none());
    }

    #[test]
    fn tuples_fail_on_first_missing_value() {
        let services = Services::new().with(Mailer("smtp"));

        let (mailer, ledger) = <(&Mailer, Option<&Ledger>)>::from_services(&services).unwrap();
        assert_eq!(mailer.0, "smtp");
        assert!(ledger.is_none());

        let err = <(&Mailer, &Ledger)>::from_services(&services).unwrap_err();
        assert!(err.dependency.ends_with("Ledger"));
    }
}
