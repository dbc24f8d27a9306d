//! Signed-integer operations, layered over the natural module.
//!
//! Multiplication and division go through natural magnitudes with the sign
//! recombined afterwards; addition and subtraction use checked `i64`
//! arithmetic directly.

use std::sync::Arc;

use crate::error::DomainError;
use crate::module::{NumberModule, OperationSpec};
use crate::natural::NaturalModule;
use crate::value::{Integer, Natural, Value};

/// Operations on signed integers. Depends on [`NaturalModule`].
#[derive(Debug)]
pub struct IntegerModule {
    natural: Arc<NaturalModule>,
}

impl IntegerModule {
    /// Creates the module with its injected dependency.
    #[must_use]
    pub fn new(natural: Arc<NaturalModule>) -> Self {
        Self { natural }
    }

    /// Absolute value as a natural. Total: `|i64::MIN|` fits in `u64`.
    #[must_use]
    pub fn abs(&self, a: Integer) -> Natural {
        Natural(a.0.unsigned_abs())
    }

    /// Sign as −1 / 0 / 1.
    #[must_use]
    pub fn sign(&self, a: Integer) -> Integer {
        Integer(a.0.signum())
    }

    /// `−a`.
    ///
    /// # Errors
    ///
    /// Fails for `i64::MIN`, whose negation is unrepresentable.
    pub fn negate(&self, a: Integer) -> Result<Integer, DomainError> {
        a.0.checked_neg()
            .map(Integer)
            .ok_or_else(|| DomainError::new("integer overflow in negation"))
    }

    /// Widening conversion from a natural.
    ///
    /// # Errors
    ///
    /// Fails when `n > i64::MAX`.
    pub fn from_natural(&self, n: Natural) -> Result<Integer, DomainError> {
        i64::try_from(n.0)
            .map(Integer)
            .map_err(|_| DomainError::new(format!("natural {n} out of integer range")))
    }

    /// Narrowing conversion to a natural.
    ///
    /// # Errors
    ///
    /// Fails for negative integers.
    pub fn to_natural(&self, a: Integer) -> Result<Natural, DomainError> {
        u64::try_from(a.0)
            .map(Natural)
            .map_err(|_| DomainError::new(format!("negative integer {a} is not a natural")))
    }

    /// Rebuilds a signed integer from a sign and a natural magnitude.
    ///
    /// # Errors
    ///
    /// Fails when the magnitude exceeds the signed range (`2^63` when
    /// negative, `2^63 − 1` otherwise).
    pub fn from_signed_magnitude(
        &self,
        negative: bool,
        magnitude: Natural,
    ) -> Result<Integer, DomainError> {
        if negative {
            if magnitude.0 > 1 << 63 {
                return Err(DomainError::new("integer overflow in sign recombination"));
            }
            // magnitude <= 2^63, so two's-complement negation is exact
            // (2^63 maps to i64::MIN).
            Ok(Integer((magnitude.0 as i64).wrapping_neg()))
        } else {
            i64::try_from(magnitude.0)
                .map(Integer)
                .map_err(|_| DomainError::new("integer overflow in sign recombination"))
        }
    }

    /// `a + b`.
    ///
    /// # Errors
    ///
    /// Fails on overflow.
    pub fn add(&self, a: Integer, b: Integer) -> Result<Integer, DomainError> {
        a.0.checked_add(b.0)
            .map(Integer)
            .ok_or_else(|| DomainError::new("integer overflow in addition"))
    }

    /// `a − b`.
    ///
    /// # Errors
    ///
    /// Fails on overflow.
    pub fn subtract(&self, a: Integer, b: Integer) -> Result<Integer, DomainError> {
        a.0.checked_sub(b.0)
            .map(Integer)
            .ok_or_else(|| DomainError::new("integer overflow in subtraction"))
    }

    /// `a · b`, composed from natural magnitudes.
    ///
    /// # Errors
    ///
    /// Fails when the product leaves the signed range.
    pub fn multiply(&self, a: Integer, b: Integer) -> Result<Integer, DomainError> {
        let magnitude = self.natural.multiply(self.abs(a), self.abs(b))?;
        self.from_signed_magnitude((a.0 < 0) != (b.0 < 0) && magnitude.0 != 0, magnitude)
    }

    /// Truncating quotient, composed from natural magnitudes.
    ///
    /// # Errors
    ///
    /// Fails when `b` is zero or the quotient is unrepresentable.
    pub fn divide(&self, a: Integer, b: Integer) -> Result<Integer, DomainError> {
        if b.0 == 0 {
            return Err(DomainError::new("integer division by zero"));
        }
        let magnitude = self.natural.divide(self.abs(a), self.abs(b))?;
        self.from_signed_magnitude((a.0 < 0) != (b.0 < 0) && magnitude.0 != 0, magnitude)
    }

    /// Remainder with the sign of the dividend: `a − b·(a/b)`.
    ///
    /// # Errors
    ///
    /// Fails when `b` is zero.
    pub fn remainder(&self, a: Integer, b: Integer) -> Result<Integer, DomainError> {
        if b.0 == 0 {
            return Err(DomainError::new("integer division by zero"));
        }
        let magnitude = self.natural.remainder(self.abs(a), self.abs(b))?;
        self.from_signed_magnitude(a.0 < 0 && magnitude.0 != 0, magnitude)
    }
}

impl NumberModule for IntegerModule {
    fn name(&self) -> &'static str {
        "integer"
    }

    fn operations(self: Arc<Self>) -> Vec<OperationSpec> {
        let abs = Arc::clone(&self);
        let sign = Arc::clone(&self);
        let negate = Arc::clone(&self);
        let from_natural = Arc::clone(&self);
        let to_natural = Arc::clone(&self);
        let add = Arc::clone(&self);
        let subtract = Arc::clone(&self);
        let multiply = Arc::clone(&self);
        let divide = Arc::clone(&self);
        let remainder = self;

        vec![
            OperationSpec::unary("integer_abs", move |a| {
                Ok(Value::Natural(abs.abs(a.parse()?)))
            }),
            OperationSpec::unary("integer_sign", move |a| {
                Ok(Value::Integer(sign.sign(a.parse()?)))
            }),
            OperationSpec::unary("integer_negate", move |a| {
                Ok(Value::Integer(negate.negate(a.parse()?)?))
            }),
            OperationSpec::unary("integer_from_natural", move |a| {
                Ok(Value::Integer(from_natural.from_natural(a.parse()?)?))
            }),
            OperationSpec::unary("integer_to_natural", move |a| {
                Ok(Value::Natural(to_natural.to_natural(a.parse()?)?))
            }),
            OperationSpec::binary("integer_add", move |a, b| {
                Ok(Value::Integer(add.add(a.parse()?, b.parse()?)?))
            }),
            OperationSpec::binary("integer_subtract", move |a, b| {
                Ok(Value::Integer(subtract.subtract(a.parse()?, b.parse()?)?))
            }),
            OperationSpec::binary("integer_multiply", move |a, b| {
                Ok(Value::Integer(multiply.multiply(a.parse()?, b.parse()?)?))
            }),
            OperationSpec::binary("integer_divide", move |a, b| {
                Ok(Value::Integer(divide.divide(a.parse()?, b.parse()?)?))
            }),
            OperationSpec::binary("integer_remainder", move |a, b| {
                Ok(Value::Integer(remainder.remainder(a.parse()?, b.parse()?)?))
            }),
        ]
    }
}
