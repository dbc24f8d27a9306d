//! Polynomial operations over rational coefficients.
//!
//! Coefficient arithmetic goes through the rational module; degree and
//! shift exponents go through the natural and integer modules. Euclidean
//! division underpins remainder and gcd; the gcd is normalized monic.

use std::sync::Arc;

use crate::error::DomainError;
use crate::integer::IntegerModule;
use crate::module::{NumberModule, OperationSpec};
use crate::natural::NaturalModule;
use crate::rational::RationalModule;
use crate::value::{Natural, Polynomial, Rational, Value};

/// Cap on result degree for shift operations. Keeps a single request from
/// allocating coefficient vectors of astronomical length.
const MAX_SHIFT_DEGREE: u64 = 1 << 16;

/// Operations on polynomials. Depends on all three scalar modules.
#[derive(Debug)]
pub struct PolynomialModule {
    natural: Arc<NaturalModule>,
    integer: Arc<IntegerModule>,
    rational: Arc<RationalModule>,
}

impl PolynomialModule {
    /// Creates the module with its injected dependencies.
    #[must_use]
    pub fn new(
        natural: Arc<NaturalModule>,
        integer: Arc<IntegerModule>,
        rational: Arc<RationalModule>,
    ) -> Self {
        Self {
            natural,
            integer,
            rational,
        }
    }

    /// Coefficient-wise sum.
    ///
    /// # Errors
    ///
    /// Fails on coefficient overflow.
    pub fn add(&self, a: &Polynomial, b: &Polynomial) -> Result<Polynomial, DomainError> {
        let len = a.coeffs().len().max(b.coeffs().len());
        let mut coeffs = Vec::with_capacity(len);
        for k in 0..len {
            let ca = a.coeffs().get(k).copied().unwrap_or_else(Rational::zero);
            let cb = b.coeffs().get(k).copied().unwrap_or_else(Rational::zero);
            coeffs.push(self.rational.add(ca, cb)?);
        }
        Ok(Polynomial::from_coeffs(coeffs))
    }

    /// Coefficient-wise difference.
    ///
    /// # Errors
    ///
    /// Fails on coefficient overflow.
    pub fn subtract(&self, a: &Polynomial, b: &Polynomial) -> Result<Polynomial, DomainError> {
        let len = a.coeffs().len().max(b.coeffs().len());
        let mut coeffs = Vec::with_capacity(len);
        for k in 0..len {
            let ca = a.coeffs().get(k).copied().unwrap_or_else(Rational::zero);
            let cb = b.coeffs().get(k).copied().unwrap_or_else(Rational::zero);
            coeffs.push(self.rational.subtract(ca, cb)?);
        }
        Ok(Polynomial::from_coeffs(coeffs))
    }

    /// Convolution product.
    ///
    /// # Errors
    ///
    /// Fails on coefficient overflow.
    pub fn multiply(&self, a: &Polynomial, b: &Polynomial) -> Result<Polynomial, DomainError> {
        if a.is_zero() || b.is_zero() {
            return Ok(Polynomial::zero());
        }
        let len = a.coeffs().len() + b.coeffs().len() - 1;
        let mut coeffs = vec![Rational::zero(); len];
        for (i, &ca) in a.coeffs().iter().enumerate() {
            for (j, &cb) in b.coeffs().iter().enumerate() {
                let term = self.rational.multiply(ca, cb)?;
                coeffs[i + j] = self.rational.add(coeffs[i + j], term)?;
            }
        }
        Ok(Polynomial::from_coeffs(coeffs))
    }

    /// `p · q` for a rational scalar `q`.
    ///
    /// # Errors
    ///
    /// Fails on coefficient overflow.
    pub fn scale(&self, p: &Polynomial, q: Rational) -> Result<Polynomial, DomainError> {
        let coeffs = p
            .coeffs()
            .iter()
            .map(|&c| self.rational.multiply(c, q))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Polynomial::from_coeffs(coeffs))
    }

    /// `p · x^k`.
    ///
    /// # Errors
    ///
    /// Fails when the result degree exceeds the shift cap.
    pub fn shift(&self, p: &Polynomial, k: Natural) -> Result<Polynomial, DomainError> {
        if p.is_zero() {
            return Ok(Polynomial::zero());
        }
        let result_degree = self.natural.add(Natural(p.degree()), k)?;
        if result_degree.0 > MAX_SHIFT_DEGREE {
            return Err(DomainError::new(format!(
                "shift result degree {result_degree} exceeds the cap of {MAX_SHIFT_DEGREE}"
            )));
        }
        let k = k.0 as usize;
        let mut coeffs = vec![Rational::zero(); k + p.coeffs().len()];
        coeffs[k..].copy_from_slice(p.coeffs());
        Ok(Polynomial::from_coeffs(coeffs))
    }

    /// The degree as a natural; 0 for constants and the zero polynomial.
    #[must_use]
    pub fn degree(&self, p: &Polynomial) -> Natural {
        Natural(p.degree())
    }

    /// The leading coefficient; 0 for the zero polynomial.
    #[must_use]
    pub fn leading(&self, p: &Polynomial) -> Rational {
        p.leading()
    }

    /// The formal derivative.
    ///
    /// # Errors
    ///
    /// Fails on coefficient overflow.
    pub fn derivative(&self, p: &Polynomial) -> Result<Polynomial, DomainError> {
        let mut coeffs = Vec::with_capacity(p.coeffs().len().saturating_sub(1));
        for (power, &c) in p.coeffs().iter().enumerate().skip(1) {
            let power = self.integer.from_natural(Natural(power as u64))?;
            let factor = self.rational.from_integer(power);
            coeffs.push(self.rational.multiply(c, factor)?);
        }
        Ok(Polynomial::from_coeffs(coeffs))
    }

    /// Euclidean quotient and remainder: `a = q·b + r` with
    /// `deg r < deg b` (or `r = 0`).
    ///
    /// # Errors
    ///
    /// Fails when `b` is zero or on coefficient overflow.
    pub fn divide_with_remainder(
        &self,
        a: &Polynomial,
        b: &Polynomial,
    ) -> Result<(Polynomial, Polynomial), DomainError> {
        if b.is_zero() {
            return Err(DomainError::new("polynomial division by zero"));
        }
        let divisor_degree = b.coeffs().len() - 1;
        let leading = b.leading();
        let mut remainder = a.clone();
        let mut quotient = vec![
            Rational::zero();
            a.coeffs().len().saturating_sub(divisor_degree)
        ];

        while !remainder.is_zero() && remainder.coeffs().len() - 1 >= divisor_degree {
            let shift = remainder.coeffs().len() - 1 - divisor_degree;
            let factor = self.rational.divide(remainder.leading(), leading)?;
            quotient[shift] = factor;

            let scaled = self.scale(b, factor)?;
            let aligned = self.shift(&scaled, Natural(shift as u64))?;
            remainder = self.subtract(&remainder, &aligned)?;
        }

        Ok((Polynomial::from_coeffs(quotient), remainder))
    }

    /// Monic greatest common divisor; `gcd(0, 0) = 0`.
    ///
    /// # Errors
    ///
    /// Fails on coefficient overflow.
    pub fn gcd(&self, a: &Polynomial, b: &Polynomial) -> Result<Polynomial, DomainError> {
        let mut a = a.clone();
        let mut b = b.clone();
        while !b.is_zero() {
            let (_, r) = self.divide_with_remainder(&a, &b)?;
            a = b;
            b = r;
        }
        if a.is_zero() {
            return Ok(a);
        }
        // Normalize monic so the result is unique.
        let inverse = self.rational.divide(Rational::from_int(1), a.leading())?;
        self.scale(&a, inverse)
    }

    /// Evaluates `p` at a rational point via Horner's scheme.
    ///
    /// # Errors
    ///
    /// Fails on coefficient overflow.
    pub fn evaluate(&self, p: &Polynomial, x: Rational) -> Result<Rational, DomainError> {
        let mut acc = Rational::zero();
        for &c in p.coeffs().iter().rev() {
            acc = self.rational.add(self.rational.multiply(acc, x)?, c)?;
        }
        Ok(self.rational.reduce(acc))
    }
}

impl NumberModule for PolynomialModule {
    fn name(&self) -> &'static str {
        "polynomial"
    }

    fn operations(self: Arc<Self>) -> Vec<OperationSpec> {
        let add = Arc::clone(&self);
        let subtract = Arc::clone(&self);
        let multiply = Arc::clone(&self);
        let scale = Arc::clone(&self);
        let shift = Arc::clone(&self);
        let degree = Arc::clone(&self);
        let leading = Arc::clone(&self);
        let derivative = Arc::clone(&self);
        let divide = Arc::clone(&self);
        let remainder = Arc::clone(&self);
        let gcd = Arc::clone(&self);
        let evaluate = self;

        vec![
            OperationSpec::binary("polynomial_add", move |a, b| {
                Ok(Value::Polynomial(add.add(&a.parse()?, &b.parse()?)?))
            }),
            OperationSpec::binary("polynomial_subtract", move |a, b| {
                Ok(Value::Polynomial(subtract.subtract(&a.parse()?, &b.parse()?)?))
            }),
            OperationSpec::binary("polynomial_multiply", move |a, b| {
                Ok(Value::Polynomial(multiply.multiply(&a.parse()?, &b.parse()?)?))
            }),
            OperationSpec::binary("polynomial_scale", move |a, b| {
                Ok(Value::Polynomial(scale.scale(&a.parse()?, b.parse()?)?))
            }),
            OperationSpec::binary("polynomial_shift", move |a, b| {
                Ok(Value::Polynomial(shift.shift(&a.parse()?, b.parse()?)?))
            }),
            OperationSpec::unary("polynomial_degree", move |a| {
                Ok(Value::Natural(degree.degree(&a.parse()?)))
            }),
            OperationSpec::unary("polynomial_leading", move |a| {
                Ok(Value::Rational(leading.leading(&a.parse()?)))
            }),
            OperationSpec::unary("polynomial_derivative", move |a| {
                Ok(Value::Polynomial(derivative.derivative(&a.parse()?)?))
            }),
            OperationSpec::binary("polynomial_divide", move |a, b| {
                let (quotient, _) = divide.divide_with_remainder(&a.parse()?, &b.parse()?)?;
                Ok(Value::Polynomial(quotient))
            }),
            OperationSpec::binary("polynomial_remainder", move |a, b| {
                let (_, rem) = remainder.divide_with_remainder(&a.parse()?, &b.parse()?)?;
                Ok(Value::Polynomial(rem))
            }),
            OperationSpec::binary("polynomial_gcd", move |a, b| {
                Ok(Value::Polynomial(gcd.gcd(&a.parse()?, &b.parse()?)?))
            }),
            OperationSpec::binary("polynomial_evaluate", move |a, b| {
                Ok(Value::Rational(evaluate.evaluate(&a.parse()?, b.parse()?)?))
            }),
        ]
    }
}
