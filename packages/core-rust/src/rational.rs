//! Rational-number operations, layered over the natural and integer modules.
//!
//! Inputs may arrive unreduced (`"2/4"`); every operation returns its
//! result in lowest terms, reduced through the natural module's gcd.
//! Sums use the lcm common denominator rather than the plain product to
//! keep intermediates small.

use std::sync::Arc;

use crate::error::DomainError;
use crate::integer::IntegerModule;
use crate::module::{NumberModule, OperationSpec};
use crate::natural::NaturalModule;
use crate::value::{Integer, Natural, Rational, Value};

/// Operations on exact fractions. Depends on [`NaturalModule`] and
/// [`IntegerModule`].
#[derive(Debug)]
pub struct RationalModule {
    natural: Arc<NaturalModule>,
    integer: Arc<IntegerModule>,
}

impl RationalModule {
    /// Creates the module with its injected dependencies.
    #[must_use]
    pub fn new(natural: Arc<NaturalModule>, integer: Arc<IntegerModule>) -> Self {
        Self { natural, integer }
    }

    /// Lowest terms. Zero normalizes to `0/1`.
    #[must_use]
    pub fn reduce(&self, q: Rational) -> Rational {
        if q.is_zero() {
            return Rational::zero();
        }
        let g = self
            .natural
            .gcd(Natural(q.numerator().unsigned_abs()), Natural(q.denominator()));
        // g >= 1: the denominator is nonzero.
        let magnitude = q.numerator().unsigned_abs() / g.0;
        let den = q.denominator() / g.0;
        // magnitude <= |numerator| <= 2^63, so recombination cannot fail.
        let num = if q.numerator() < 0 {
            (magnitude as i64).wrapping_neg()
        } else {
            magnitude as i64
        };
        Rational::new(num, den).unwrap_or_else(|_| Rational::zero())
    }

    /// True when the fraction is a whole number.
    #[must_use]
    pub fn is_integer(&self, q: Rational) -> bool {
        self.reduce(q).denominator() == 1
    }

    /// `a/1`.
    #[must_use]
    pub fn from_integer(&self, a: Integer) -> Rational {
        Rational::from_int(a.0)
    }

    /// The whole number a fraction denotes.
    ///
    /// # Errors
    ///
    /// Fails when the reduced denominator is not 1.
    pub fn to_integer(&self, q: Rational) -> Result<Integer, DomainError> {
        let reduced = self.reduce(q);
        if reduced.denominator() == 1 {
            Ok(Integer(reduced.numerator()))
        } else {
            Err(DomainError::new(format!("{reduced} is not an integer")))
        }
    }

    /// Exact sum over the lcm common denominator, reduced.
    ///
    /// # Errors
    ///
    /// Fails on overflow of the bounded representation.
    pub fn add(&self, a: Rational, b: Rational) -> Result<Rational, DomainError> {
        let den = self
            .natural
            .lcm(Natural(a.denominator()), Natural(b.denominator()))?;
        let scale_a = self.integer.from_natural(Natural(den.0 / a.denominator()))?;
        let scale_b = self.integer.from_natural(Natural(den.0 / b.denominator()))?;
        let num_a = self.integer.multiply(Integer(a.numerator()), scale_a)?;
        let num_b = self.integer.multiply(Integer(b.numerator()), scale_b)?;
        let num = self.integer.add(num_a, num_b)?;
        Ok(self.reduce(Rational::new(num.0, den.0)?))
    }

    /// Exact difference, reduced.
    ///
    /// # Errors
    ///
    /// Fails on overflow of the bounded representation.
    pub fn subtract(&self, a: Rational, b: Rational) -> Result<Rational, DomainError> {
        let negated = self.integer.negate(Integer(b.numerator()))?;
        self.add(a, Rational::new(negated.0, b.denominator())?)
    }

    /// Exact product, reduced.
    ///
    /// # Errors
    ///
    /// Fails on overflow of the bounded representation.
    pub fn multiply(&self, a: Rational, b: Rational) -> Result<Rational, DomainError> {
        // Reducing first keeps the cross products as small as possible.
        let (a, b) = (self.reduce(a), self.reduce(b));
        let num = self
            .integer
            .multiply(Integer(a.numerator()), Integer(b.numerator()))?;
        let den = self
            .natural
            .multiply(Natural(a.denominator()), Natural(b.denominator()))?;
        Ok(self.reduce(Rational::new(num.0, den.0)?))
    }

    /// Exact quotient, reduced.
    ///
    /// # Errors
    ///
    /// Fails when the divisor is zero or on overflow.
    pub fn divide(&self, a: Rational, b: Rational) -> Result<Rational, DomainError> {
        if b.is_zero() {
            return Err(DomainError::new("rational division by zero"));
        }
        let num = self
            .integer
            .from_signed_magnitude(b.numerator() < 0, Natural(b.denominator()))?;
        let reciprocal = Rational::new(num.0, b.numerator().unsigned_abs())?;
        self.multiply(a, reciprocal)
    }
}

impl NumberModule for RationalModule {
    fn name(&self) -> &'static str {
        "rational"
    }

    fn operations(self: Arc<Self>) -> Vec<OperationSpec> {
        let reduce = Arc::clone(&self);
        let is_integer = Arc::clone(&self);
        let from_integer = Arc::clone(&self);
        let to_integer = Arc::clone(&self);
        let add = Arc::clone(&self);
        let subtract = Arc::clone(&self);
        let multiply = Arc::clone(&self);
        let divide = self;

        vec![
            OperationSpec::unary("rational_reduce", move |a| {
                Ok(Value::Rational(reduce.reduce(a.parse()?)))
            }),
            OperationSpec::unary("rational_is_integer", move |a| {
                Ok(Value::Bool(is_integer.is_integer(a.parse()?)))
            }),
            OperationSpec::unary("rational_from_integer", move |a| {
                Ok(Value::Rational(from_integer.from_integer(a.parse()?)))
            }),
            OperationSpec::unary("rational_to_integer", move |a| {
                Ok(Value::Integer(to_integer.to_integer(a.parse()?)?))
            }),
            OperationSpec::binary("rational_add", move |a, b| {
                Ok(Value::Rational(add.add(a.parse()?, b.parse()?)?))
            }),
            OperationSpec::binary("rational_subtract", move |a, b| {
                Ok(Value::Rational(subtract.subtract(a.parse()?, b.parse()?)?))
            }),
            OperationSpec::binary("rational_multiply", move |a, b| {
                Ok(Value::Rational(multiply.multiply(a.parse()?, b.parse()?)?))
            }),
            OperationSpec::binary("rational_divide", move |a, b| {
                Ok(Value::Rational(divide.divide(a.parse()?, b.parse()?)?))
            }),
        ]
    }
}
