//! The module seam: each arithmetic module exposes a finite, ordered set
//! of named operations with fixed arity.
//!
//! Modules may hold `Arc` references to the modules they depend on
//! (constructor injection); they never reference the group that registers
//! them. Global index assignment happens at group construction, not here.

use std::fmt;
use std::sync::Arc;

use crate::error::DomainError;
use crate::value::Value;

/// Implementation of one operation: exactly `arity` raw strings in, a
/// domain value or a domain failure out.
pub type Callable = Arc<dyn Fn(&[String]) -> Result<Value, DomainError> + Send + Sync>;

/// One `(name, arity, callable)` triple declared by a module.
///
/// Indices are left unassigned at this level; the group renumbers
/// operations globally in registration order.
#[derive(Clone)]
pub struct OperationSpec {
    pub(crate) name: &'static str,
    pub(crate) arity: usize,
    pub(crate) callable: Callable,
}

impl OperationSpec {
    /// Declares an operation with an explicit arity.
    ///
    /// The callable may index `args` freely up to `arity`: the group
    /// validates the argument count before it ever invokes the callable.
    #[must_use]
    pub fn new(name: &'static str, arity: usize, callable: Callable) -> Self {
        Self {
            name,
            arity,
            callable,
        }
    }

    /// Declares a one-argument operation.
    pub fn unary<F>(name: &'static str, f: F) -> Self
    where
        F: Fn(&str) -> Result<Value, DomainError> + Send + Sync + 'static,
    {
        Self::new(name, 1, Arc::new(move |args| f(&args[0])))
    }

    /// Declares a two-argument operation.
    pub fn binary<F>(name: &'static str, f: F) -> Self
    where
        F: Fn(&str, &str) -> Result<Value, DomainError> + Send + Sync + 'static,
    {
        Self::new(name, 2, Arc::new(move |args| f(&args[0], &args[1])))
    }

    /// The operation name, unique within its module.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The exact number of positional arguments the operation requires.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.arity
    }
}

impl fmt::Debug for OperationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationSpec")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// A cohesive set of related operations, registrable with a
/// [`ModuleGroup`](crate::ModuleGroup).
pub trait NumberModule: Send + Sync {
    /// Short module name used in logs (e.g. `"natural"`, `"rational"`).
    fn name(&self) -> &'static str;

    /// The ordered operation list. Declaration order becomes part of the
    /// published index contract once the module is registered in a group.
    fn operations(self: Arc<Self>) -> Vec<OperationSpec>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Natural;

    #[test]
    fn unary_spec_has_arity_one() {
        let spec = OperationSpec::unary("touch", |a| {
            Ok(Value::Natural(a.parse::<Natural>()?))
        });
        assert_eq!(spec.name(), "touch");
        assert_eq!(spec.arity(), 1);

        let out = (spec.callable)(&["5".to_string()]).unwrap();
        assert_eq!(out, Value::Natural(Natural(5)));
    }

    #[test]
    fn binary_spec_has_arity_two() {
        let spec = OperationSpec::binary("pair", |a, b| {
            let a = a.parse::<Natural>()?;
            let b = b.parse::<Natural>()?;
            Ok(Value::Bool(a == b))
        });
        assert_eq!(spec.arity(), 2);

        let out = (spec.callable)(&["3".to_string(), "3".to_string()]).unwrap();
        assert_eq!(out, Value::Bool(true));
    }

    #[test]
    fn callable_surfaces_domain_errors() {
        let spec = OperationSpec::unary("parse", |a| {
            Ok(Value::Natural(a.parse::<Natural>()?))
        });
        let err = (spec.callable)(&["nope".to_string()]).unwrap_err();
        assert!(err.message().contains("not a natural numeral"));
    }
}
