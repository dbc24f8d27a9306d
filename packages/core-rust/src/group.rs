//! The module group: a flat, globally indexed operation registry and the
//! dispatch entry point.
//!
//! Global indices are assigned once, at construction, in module
//! registration order and then declaration order within a module. The
//! index↔name pairing is a published contract for the lifetime of a
//! running process; it changes only when registration order changes
//! (i.e. on redeploy). Both lookup paths are O(1): the registry is built
//! once and never mutated, so concurrent calls need no synchronization.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::error::DispatchError;
use crate::identifier::Identifier;
use crate::integer::IntegerModule;
use crate::module::{Callable, NumberModule};
use crate::natural::NaturalModule;
use crate::polynomial::PolynomialModule;
use crate::rational::RationalModule;
use crate::value::Value;

// ---------------------------------------------------------------------------
// MethodDescriptor
// ---------------------------------------------------------------------------

/// Registry entry describing one callable unit: its name, its global
/// index, its arity, and the callable itself.
#[derive(Clone)]
pub struct MethodDescriptor {
    name: &'static str,
    index: usize,
    arity: usize,
    callable: Callable,
}

impl MethodDescriptor {
    /// The globally unique operation name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The global index, stable for the process lifetime.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// The exact number of positional arguments required.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.arity
    }
}

impl fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("name", &self.name)
            .field("index", &self.index)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// ModuleGroup
// ---------------------------------------------------------------------------

/// The aggregated, globally indexed registry of all modules' operations.
///
/// Immutable after construction. `resolve` and `call` are pure functions
/// of `(registry, identifier, args)`; the group holds no cross-call state.
pub struct ModuleGroup {
    methods: Vec<MethodDescriptor>,
    by_name: HashMap<&'static str, usize>,
}

impl ModuleGroup {
    /// Builds the registry from modules in registration order.
    ///
    /// # Panics
    ///
    /// Panics when two modules declare the same operation name; duplicate
    /// names would make the name→index contract ambiguous, and the
    /// registry is assembled from a fixed module set at startup.
    #[must_use]
    pub fn new(modules: &[Arc<dyn NumberModule>]) -> Self {
        let mut methods = Vec::new();
        let mut by_name = HashMap::new();

        for module in modules {
            let specs = Arc::clone(module).operations();
            debug!(
                module = module.name(),
                operations = specs.len(),
                first_index = methods.len(),
                "registering module"
            );
            for spec in specs {
                let index = methods.len();
                assert!(
                    by_name.insert(spec.name, index).is_none(),
                    "duplicate operation name: {}",
                    spec.name
                );
                methods.push(MethodDescriptor {
                    name: spec.name,
                    index,
                    arity: spec.arity,
                    callable: spec.callable,
                });
            }
        }

        Self { methods, by_name }
    }

    /// The full ordered descriptor list; indices are exactly `0..len()`.
    #[must_use]
    pub fn methods(&self) -> &[MethodDescriptor] {
        &self.methods
    }

    /// Total operation count across all registered modules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// True when no module contributed any operation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Resolves an identifier to its descriptor.
    ///
    /// # Errors
    ///
    /// Returns `UnknownIdentifier` when neither map has a match.
    pub fn resolve(&self, identifier: &Identifier) -> Result<&MethodDescriptor, DispatchError> {
        let found = match identifier {
            Identifier::Index(index) => usize::try_from(*index)
                .ok()
                .and_then(|index| self.methods.get(index)),
            Identifier::Name(name) => self
                .by_name
                .get(name.as_str())
                .map(|&index| &self.methods[index]),
        };
        found.ok_or_else(|| DispatchError::UnknownIdentifier {
            attempted: identifier.clone(),
        })
    }

    /// Resolves, validates the argument count, and invokes the operation.
    ///
    /// The arity check runs before any argument decoding, so module code
    /// never sees an argument list of the wrong length.
    ///
    /// # Errors
    ///
    /// `UnknownIdentifier` when nothing matches, `InvalidArguments` on an
    /// arity mismatch, `Domain` when the module rejects an argument or
    /// fails to compute.
    pub fn call(&self, identifier: &Identifier, args: &[String]) -> Result<Value, DispatchError> {
        let descriptor = self.resolve(identifier)?;
        if args.len() != descriptor.arity {
            return Err(DispatchError::InvalidArguments {
                expected: descriptor.arity,
                actual: args.len(),
            });
        }
        trace!(
            operation = descriptor.name,
            index = descriptor.index,
            "dispatching"
        );
        Ok((descriptor.callable)(args)?)
    }

    /// Parses raw identifier text and dispatches in one step.
    ///
    /// # Errors
    ///
    /// `MalformedIdentifier` for unparseable text, then everything
    /// [`call`](Self::call) can return.
    pub fn call_str(&self, identifier: &str, args: &[String]) -> Result<Value, DispatchError> {
        self.call(&identifier.parse()?, args)
    }
}

impl fmt::Debug for ModuleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleGroup")
            .field("operations", &self.methods.len())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Standard wiring
// ---------------------------------------------------------------------------

/// Builds the standard four-module group with its dependency wiring:
/// natural → integer → rational → polynomial, registered in that order.
#[must_use]
pub fn standard_group() -> ModuleGroup {
    let natural = Arc::new(NaturalModule::new());
    let integer = Arc::new(IntegerModule::new(Arc::clone(&natural)));
    let rational = Arc::new(RationalModule::new(
        Arc::clone(&natural),
        Arc::clone(&integer),
    ));
    let polynomial = Arc::new(PolynomialModule::new(
        Arc::clone(&natural),
        Arc::clone(&integer),
        Arc::clone(&rational),
    ));

    let modules: Vec<Arc<dyn NumberModule>> = vec![natural, integer, rational, polynomial];
    ModuleGroup::new(&modules)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;
    use crate::module::OperationSpec;
    use crate::value::Integer;

    /// Minimal module with a two-argument `add`.
    struct AddModule;

    impl NumberModule for AddModule {
        fn name(&self) -> &'static str {
            "add-module"
        }

        fn operations(self: Arc<Self>) -> Vec<OperationSpec> {
            vec![OperationSpec::binary("add", |a, b| {
                let a: Integer = a.parse()?;
                let b: Integer = b.parse()?;
                Ok(Value::Integer(Integer(a.0 + b.0)))
            })]
        }
    }

    /// Minimal module with a one-argument `negate`.
    struct NegateModule;

    impl NumberModule for NegateModule {
        fn name(&self) -> &'static str {
            "negate-module"
        }

        fn operations(self: Arc<Self>) -> Vec<OperationSpec> {
            vec![OperationSpec::unary("negate", |a| {
                let a: Integer = a.parse()?;
                Ok(Value::Integer(Integer(-a.0)))
            })]
        }
    }

    fn two_module_group() -> ModuleGroup {
        let modules: Vec<Arc<dyn NumberModule>> =
            vec![Arc::new(AddModule), Arc::new(NegateModule)];
        ModuleGroup::new(&modules)
    }

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn indices_follow_registration_then_declaration_order() {
        let group = two_module_group();
        let methods = group.methods();
        assert_eq!(methods.len(), 2);
        assert_eq!((methods[0].name(), methods[0].index()), ("add", 0));
        assert_eq!((methods[1].name(), methods[1].index()), ("negate", 1));
    }

    #[test]
    fn call_by_name_and_by_index_reach_the_same_operation() {
        let group = two_module_group();
        let by_name = group.call_str("add", &args(&["2", "3"])).unwrap();
        let by_index = group.call_str("0", &args(&["2", "3"])).unwrap();
        assert_eq!(by_name, Value::Integer(Integer(5)));
        assert_eq!(by_name, by_index);
    }

    #[test]
    fn scenario_from_the_published_contract() {
        let group = two_module_group();

        assert_eq!(
            group.call_str("add", &args(&["2", "3"])).unwrap(),
            Value::Integer(Integer(5))
        );
        assert_eq!(
            group.call_str("1", &args(&["4"])).unwrap(),
            Value::Integer(Integer(-4))
        );
        assert_eq!(
            group.call_str("add", &args(&["2"])).unwrap_err(),
            DispatchError::InvalidArguments {
                expected: 2,
                actual: 1
            }
        );
        assert_eq!(
            group.call_str("subtract", &args(&[])).unwrap_err(),
            DispatchError::UnknownIdentifier {
                attempted: Identifier::Name("subtract".to_string())
            }
        );
    }

    #[test]
    fn out_of_range_index_is_unknown_not_invalid() {
        let group = two_module_group();
        assert!(matches!(
            group.call_str("99", &args(&[])),
            Err(DispatchError::UnknownIdentifier { .. })
        ));
    }

    #[test]
    fn malformed_identifier_is_reported_before_lookup() {
        let group = two_module_group();
        assert!(matches!(
            group.call_str("  ", &args(&[])),
            Err(DispatchError::MalformedIdentifier { .. })
        ));
        assert!(matches!(
            group.call_str("no such op", &args(&[])),
            Err(DispatchError::MalformedIdentifier { .. })
        ));
    }

    #[test]
    fn arity_mismatch_never_invokes_the_callable() {
        static INVOKED: AtomicBool = AtomicBool::new(false);

        struct ProbeModule;

        impl NumberModule for ProbeModule {
            fn name(&self) -> &'static str {
                "probe"
            }

            fn operations(self: Arc<Self>) -> Vec<OperationSpec> {
                vec![OperationSpec::binary("probe", |_, _| {
                    INVOKED.store(true, Ordering::SeqCst);
                    Ok(Value::Bool(true))
                })]
            }
        }

        let modules: Vec<Arc<dyn NumberModule>> = vec![Arc::new(ProbeModule)];
        let group = ModuleGroup::new(&modules);

        for wrong in [0usize, 1, 3] {
            let supplied = vec!["1".to_string(); wrong];
            let err = group.call_str("probe", &supplied).unwrap_err();
            assert_eq!(
                err,
                DispatchError::InvalidArguments {
                    expected: 2,
                    actual: wrong
                }
            );
        }
        assert!(!INVOKED.load(Ordering::SeqCst));
    }

    #[test]
    fn all_digit_name_is_shadowed_by_index_form() {
        struct DigitNameModule;

        impl NumberModule for DigitNameModule {
            fn name(&self) -> &'static str {
                "digit-name"
            }

            fn operations(self: Arc<Self>) -> Vec<OperationSpec> {
                vec![
                    OperationSpec::unary("first", |_| Ok(Value::Bool(false))),
                    OperationSpec::unary("0", |_| Ok(Value::Bool(true))),
                ]
            }
        }

        let modules: Vec<Arc<dyn NumberModule>> = vec![Arc::new(DigitNameModule)];
        let group = ModuleGroup::new(&modules);

        // "0" resolves as index 0 -- the operation named "0" (at index 1)
        // is unreachable by name.
        let resolved = group.resolve(&"0".parse().unwrap()).unwrap();
        assert_eq!(resolved.name(), "first");
        assert_eq!(
            group.call_str("0", &args(&["x"])).unwrap(),
            Value::Bool(false)
        );
    }

    #[test]
    #[should_panic(expected = "duplicate operation name: dup")]
    fn duplicate_names_across_modules_panic_at_construction() {
        struct Dup;

        impl NumberModule for Dup {
            fn name(&self) -> &'static str {
                "dup"
            }

            fn operations(self: Arc<Self>) -> Vec<OperationSpec> {
                vec![OperationSpec::unary("dup", |_| Ok(Value::Bool(true)))]
            }
        }

        let modules: Vec<Arc<dyn NumberModule>> = vec![Arc::new(Dup), Arc::new(Dup)];
        let _ = ModuleGroup::new(&modules);
    }

    #[test]
    fn repeated_calls_are_idempotent() {
        let group = two_module_group();
        let first = group.call_str("add", &args(&["20", "22"])).unwrap();
        let second = group.call_str("add", &args(&["20", "22"])).unwrap();
        assert_eq!(first, second);
        assert_eq!(group.len(), 2);
    }

    // -----------------------------------------------------------------------
    // Standard group
    // -----------------------------------------------------------------------

    #[test]
    fn standard_group_registers_modules_in_dependency_order() {
        let group = standard_group();
        assert_eq!(group.len(), 40);

        let methods = group.methods();
        assert_eq!(methods[0].name(), "natural_compare");
        assert_eq!(methods[10].name(), "integer_abs");
        assert_eq!(methods[20].name(), "rational_reduce");
        assert_eq!(methods[28].name(), "polynomial_add");
    }

    #[test]
    fn standard_group_indices_are_a_permutation_of_zero_to_n() {
        let group = standard_group();
        let indices: HashSet<usize> = group.methods().iter().map(MethodDescriptor::index).collect();
        assert_eq!(indices.len(), group.len());
        assert!(indices.iter().all(|&index| index < group.len()));
    }

    #[test]
    fn standard_group_name_and_index_resolve_identically() {
        let group = standard_group();
        for descriptor in group.methods() {
            let by_name = group
                .resolve(&descriptor.name().parse().unwrap())
                .unwrap();
            let by_index = group
                .resolve(&descriptor.index().to_string().parse().unwrap())
                .unwrap();
            assert_eq!(by_name.index(), descriptor.index());
            assert_eq!(by_index.name(), descriptor.name());
            assert_eq!(by_name.arity(), by_index.arity());
        }
    }

    #[test]
    fn standard_group_end_to_end_calls() {
        let group = standard_group();

        assert_eq!(
            group
                .call_str("natural_add", &args(&["2", "3"]))
                .unwrap()
                .to_string(),
            "5"
        );
        assert_eq!(
            group
                .call_str("rational_add", &args(&["1/6", "1/4"]))
                .unwrap()
                .to_string(),
            "5/12"
        );
        assert_eq!(
            group
                .call_str("polynomial_derivative", &args(&["3,-1/2,7"]))
                .unwrap()
                .to_string(),
            "6,-1/2"
        );
        assert!(matches!(
            group.call_str("natural_divide", &args(&["1", "0"])),
            Err(DispatchError::Domain(_))
        ));
    }
}
