//! Natural-number operations.
//!
//! The root of the module dependency graph: every other arithmetic module
//! composes natural magnitudes from here. All arithmetic is checked;
//! results that do not fit `u64` fail as domain errors.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::error::DomainError;
use crate::module::{NumberModule, OperationSpec};
use crate::value::{Integer, Natural, Value};

/// Operations on natural numbers. Stateless; other modules hold it via `Arc`.
#[derive(Debug, Default)]
pub struct NaturalModule;

impl NaturalModule {
    /// Creates the module.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Three-way comparison as −1 / 0 / 1.
    #[must_use]
    pub fn compare(&self, a: Natural, b: Natural) -> Integer {
        Integer(match a.cmp(&b) {
            Ordering::Less => -1,
            Ordering::Equal => 0,
            Ordering::Greater => 1,
        })
    }

    /// `a + 1`.
    ///
    /// # Errors
    ///
    /// Fails when the successor exceeds `u64::MAX`.
    pub fn increment(&self, a: Natural) -> Result<Natural, DomainError> {
        a.0.checked_add(1)
            .map(Natural)
            .ok_or_else(|| DomainError::new("natural overflow in increment"))
    }

    /// `a + b`.
    ///
    /// # Errors
    ///
    /// Fails on overflow.
    pub fn add(&self, a: Natural, b: Natural) -> Result<Natural, DomainError> {
        a.0.checked_add(b.0)
            .map(Natural)
            .ok_or_else(|| DomainError::new("natural overflow in addition"))
    }

    /// `a − b`.
    ///
    /// # Errors
    ///
    /// Fails when `b > a`: naturals are not closed under subtraction.
    pub fn subtract(&self, a: Natural, b: Natural) -> Result<Natural, DomainError> {
        a.0.checked_sub(b.0)
            .map(Natural)
            .ok_or_else(|| {
                DomainError::new(format!("natural subtraction underflow: {b} > {a}"))
            })
    }

    /// `a · b`.
    ///
    /// # Errors
    ///
    /// Fails on overflow.
    pub fn multiply(&self, a: Natural, b: Natural) -> Result<Natural, DomainError> {
        a.0.checked_mul(b.0)
            .map(Natural)
            .ok_or_else(|| DomainError::new("natural overflow in multiplication"))
    }

    /// Truncating quotient `⌊a / b⌋`.
    ///
    /// # Errors
    ///
    /// Fails when `b` is zero.
    pub fn divide(&self, a: Natural, b: Natural) -> Result<Natural, DomainError> {
        a.0.checked_div(b.0)
            .map(Natural)
            .ok_or_else(|| DomainError::new("natural division by zero"))
    }

    /// Remainder `a mod b`.
    ///
    /// # Errors
    ///
    /// Fails when `b` is zero.
    pub fn remainder(&self, a: Natural, b: Natural) -> Result<Natural, DomainError> {
        a.0.checked_rem(b.0)
            .map(Natural)
            .ok_or_else(|| DomainError::new("natural division by zero"))
    }

    /// Greatest common divisor; `gcd(0, 0) = 0`.
    #[must_use]
    pub fn gcd(&self, a: Natural, b: Natural) -> Natural {
        let (mut a, mut b) = (a.0, b.0);
        while b != 0 {
            (a, b) = (b, a % b);
        }
        Natural(a)
    }

    /// Least common multiple; `lcm(a, 0) = lcm(0, b) = 0`.
    ///
    /// # Errors
    ///
    /// Fails on overflow.
    pub fn lcm(&self, a: Natural, b: Natural) -> Result<Natural, DomainError> {
        if a.0 == 0 || b.0 == 0 {
            return Ok(Natural(0));
        }
        let g = self.gcd(a, b);
        // a/g is exact; the overflow check is only needed for the product.
        (a.0 / g.0)
            .checked_mul(b.0)
            .map(Natural)
            .ok_or_else(|| DomainError::new("natural overflow in lcm"))
    }
}

impl NumberModule for NaturalModule {
    fn name(&self) -> &'static str {
        "natural"
    }

    fn operations(self: Arc<Self>) -> Vec<OperationSpec> {
        let compare = Arc::clone(&self);
        let increment = Arc::clone(&self);
        let add = Arc::clone(&self);
        let subtract = Arc::clone(&self);
        let multiply = Arc::clone(&self);
        let divide = Arc::clone(&self);
        let remainder = Arc::clone(&self);
        let gcd = Arc::clone(&self);
        let lcm = self;

        vec![
            OperationSpec::binary("natural_compare", move |a, b| {
                Ok(Value::Integer(compare.compare(a.parse()?, b.parse()?)))
            }),
            OperationSpec::unary("natural_is_zero", |a| {
                Ok(Value::Bool(a.parse::<Natural>()? == Natural(0)))
            }),
            OperationSpec::unary("natural_increment", move |a| {
                Ok(Value::Natural(increment.increment(a.parse()?)?))
            }),
            OperationSpec::binary("natural_add", move |a, b| {
                Ok(Value::Natural(add.add(a.parse()?, b.parse()?)?))
            }),
            OperationSpec::binary("natural_subtract", move |a, b| {
                Ok(Value::Natural(subtract.subtract(a.parse()?, b.parse()?)?))
            }),
            OperationSpec::binary("natural_multiply", move |a, b| {
                Ok(Value::Natural(multiply.multiply(a.parse()?, b.parse()?)?))
            }),
            OperationSpec::binary("natural_divide", move |a, b| {
                Ok(Value::Natural(divide.divide(a.parse()?, b.parse()?)?))
            }),
            OperationSpec::binary("natural_remainder", move |a, b| {
                Ok(Value::Natural(remainder.remainder(a.parse()?, b.parse()?)?))
            }),
            OperationSpec::binary("natural_gcd", move |a, b| {
                Ok(Value::Natural(gcd.gcd(a.parse()?, b.parse()?)))
            }),
            OperationSpec::binary("natural_lcm", move |a, b| {
                Ok(Value::Natural(lcm.lcm(a.parse()?, b.parse()?)?))
            }),
        ]
    }
}
