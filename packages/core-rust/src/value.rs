//! Exact-arithmetic domain values exchanged across the dispatch boundary.
//!
//! Arguments arrive as raw strings and results leave as a [`Value`]; the
//! `FromStr` / `Display` pairs on each type are inverse of one another so
//! a displayed result can be fed back in as an argument.
//!
//! All representations are bounded (`u64` / `i64` limbs). Parse failures
//! and range overflows surface as [`DomainError`].

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::DomainError;

// ---------------------------------------------------------------------------
// Natural
// ---------------------------------------------------------------------------

/// A natural number in `0..=u64::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Natural(pub u64);

impl FromStr for Natural {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::new(format!("not a natural numeral: {text:?}")));
        }
        text.parse::<u64>()
            .map(Natural)
            .map_err(|_| DomainError::new(format!("natural numeral out of range: {text:?}")))
    }
}

impl fmt::Display for Natural {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Integer
// ---------------------------------------------------------------------------

/// A signed integer in `i64::MIN..=i64::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Integer(pub i64);

impl FromStr for Integer {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let digits = text
            .strip_prefix(['+', '-'])
            .unwrap_or(text);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::new(format!("not an integer numeral: {text:?}")));
        }
        text.parse::<i64>()
            .map(Integer)
            .map_err(|_| DomainError::new(format!("integer numeral out of range: {text:?}")))
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Rational
// ---------------------------------------------------------------------------

/// An exact fraction with the sign carried on the numerator.
///
/// The denominator is nonzero by construction. Values are not implicitly
/// reduced: reduction belongs to the rational module, which returns every
/// operation result in lowest terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rational {
    num: i64,
    den: u64,
}

impl Rational {
    /// Creates a fraction `num/den`.
    ///
    /// # Errors
    ///
    /// Fails when `den` is zero.
    pub fn new(num: i64, den: u64) -> Result<Self, DomainError> {
        if den == 0 {
            return Err(DomainError::new("rational with zero denominator"));
        }
        Ok(Self { num, den })
    }

    /// The canonical zero, `0/1`.
    #[must_use]
    pub fn zero() -> Self {
        Self { num: 0, den: 1 }
    }

    /// A whole number `n/1`.
    #[must_use]
    pub fn from_int(n: i64) -> Self {
        Self { num: n, den: 1 }
    }

    /// The signed numerator.
    #[must_use]
    pub fn numerator(&self) -> i64 {
        self.num
    }

    /// The (nonzero) denominator.
    #[must_use]
    pub fn denominator(&self) -> u64 {
        self.den
    }

    /// True when the fraction equals zero, reduced or not.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.num == 0
    }
}

impl FromStr for Rational {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        match text.split_once('/') {
            None => Ok(Self::from_int(text.parse::<Integer>()?.0)),
            Some((num, den)) => {
                let num = num.parse::<Integer>()?.0;
                let den = den.parse::<Natural>()?.0;
                Self::new(num, den).map_err(|_| {
                    DomainError::new(format!("not a rational numeral: {text:?}"))
                })
            }
        }
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

// ---------------------------------------------------------------------------
// Polynomial
// ---------------------------------------------------------------------------

/// A polynomial in one variable with rational coefficients.
///
/// Coefficients are stored lowest-degree-first with no trailing zeros; the
/// zero polynomial is the empty coefficient vector. The textual form lists
/// coefficients highest-degree-first, comma-separated: `"3,-1/2,7"` is
/// 3x² − x/2 + 7.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Polynomial {
    coeffs: Vec<Rational>,
}

impl Polynomial {
    /// Builds a polynomial from lowest-degree-first coefficients, dropping
    /// zero coefficients above the leading term.
    #[must_use]
    pub fn from_coeffs(mut coeffs: Vec<Rational>) -> Self {
        while coeffs.last().is_some_and(Rational::is_zero) {
            coeffs.pop();
        }
        Self { coeffs }
    }

    /// The zero polynomial.
    #[must_use]
    pub fn zero() -> Self {
        Self { coeffs: Vec::new() }
    }

    /// True for the zero polynomial.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// Lowest-degree-first coefficient slice. Empty for zero.
    #[must_use]
    pub fn coeffs(&self) -> &[Rational] {
        &self.coeffs
    }

    /// The degree; 0 for constants and for the zero polynomial.
    #[must_use]
    pub fn degree(&self) -> u64 {
        self.coeffs.len().saturating_sub(1) as u64
    }

    /// The leading coefficient; 0 for the zero polynomial.
    #[must_use]
    pub fn leading(&self) -> Rational {
        self.coeffs.last().copied().unwrap_or_else(Rational::zero)
    }
}

impl FromStr for Polynomial {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.is_empty() {
            return Err(DomainError::new("empty polynomial literal"));
        }
        let mut coeffs = text
            .split(',')
            .map(str::parse::<Rational>)
            .collect::<Result<Vec<_>, _>>()?;
        coeffs.reverse();
        Ok(Self::from_coeffs(coeffs))
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.coeffs.is_empty() {
            return f.write_str("0");
        }
        for (position, coeff) in self.coeffs.iter().rev().enumerate() {
            if position > 0 {
                f.write_str(",")?;
            }
            write!(f, "{coeff}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Value
// ---------------------------------------------------------------------------

/// The result of a dispatched operation.
///
/// The transport layer serializes the `Display` form; the variant tells
/// which domain the result belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Value {
    /// A natural number.
    Natural(Natural),
    /// A signed integer.
    Integer(Integer),
    /// An exact fraction.
    Rational(Rational),
    /// A polynomial with rational coefficients.
    Polynomial(Polynomial),
    /// A truth value (predicates such as `natural_is_zero`).
    Bool(bool),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Natural(n) => write!(f, "{n}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Rational(q) => write!(f, "{q}"),
            Self::Polynomial(p) => write!(f, "{p}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn natural_parses_digits_only() {
        assert_eq!("17".parse::<Natural>().unwrap(), Natural(17));
        assert!("-1".parse::<Natural>().is_err());
        assert!("+1".parse::<Natural>().is_err());
        assert!("1.5".parse::<Natural>().is_err());
        assert!("".parse::<Natural>().is_err());
    }

    #[test]
    fn natural_rejects_out_of_range() {
        assert!("18446744073709551616".parse::<Natural>().is_err());
    }

    #[test]
    fn integer_parses_signed_forms() {
        assert_eq!("-5".parse::<Integer>().unwrap(), Integer(-5));
        assert_eq!("+5".parse::<Integer>().unwrap(), Integer(5));
        assert_eq!("0".parse::<Integer>().unwrap(), Integer(0));
        assert!("-".parse::<Integer>().is_err());
        assert!("5a".parse::<Integer>().is_err());
    }

    #[test]
    fn rational_parses_both_forms() {
        let q = "3/4".parse::<Rational>().unwrap();
        assert_eq!((q.numerator(), q.denominator()), (3, 4));
        let whole = "-7".parse::<Rational>().unwrap();
        assert_eq!((whole.numerator(), whole.denominator()), (-7, 1));
    }

    #[test]
    fn rational_rejects_zero_denominator() {
        assert!("1/0".parse::<Rational>().is_err());
        assert!(Rational::new(1, 0).is_err());
    }

    #[test]
    fn rational_rejects_signed_denominator() {
        assert!("1/-2".parse::<Rational>().is_err());
    }

    #[test]
    fn rational_parse_does_not_reduce() {
        let q = "2/4".parse::<Rational>().unwrap();
        assert_eq!((q.numerator(), q.denominator()), (2, 4));
    }

    #[test]
    fn rational_display_omits_unit_denominator() {
        assert_eq!(Rational::from_int(-3).to_string(), "-3");
        assert_eq!(Rational::new(1, 2).unwrap().to_string(), "1/2");
    }

    #[test]
    fn polynomial_parses_highest_degree_first() {
        let p = "3,-1/2,7".parse::<Polynomial>().unwrap();
        assert_eq!(p.degree(), 2);
        assert_eq!(p.coeffs()[0], Rational::from_int(7));
        assert_eq!(p.coeffs()[2], Rational::from_int(3));
        assert_eq!(p.leading(), Rational::from_int(3));
    }

    #[test]
    fn polynomial_drops_leading_zero_coefficients() {
        let p = "0,0,5".parse::<Polynomial>().unwrap();
        assert_eq!(p.degree(), 0);
        assert_eq!(p.to_string(), "5");
    }

    #[test]
    fn polynomial_zero_has_degree_zero() {
        let p = "0".parse::<Polynomial>().unwrap();
        assert!(p.is_zero());
        assert_eq!(p.degree(), 0);
        assert_eq!(p.to_string(), "0");
        assert_eq!(p.leading(), Rational::zero());
    }

    #[test]
    fn polynomial_display_round_trips() {
        let text = "1,0,-2/3";
        let p = text.parse::<Polynomial>().unwrap();
        assert_eq!(p.to_string(), text);
        assert_eq!(p.to_string().parse::<Polynomial>().unwrap(), p);
    }

    #[test]
    fn polynomial_rejects_garbage() {
        assert!("1,,2".parse::<Polynomial>().is_err());
        assert!("x+1".parse::<Polynomial>().is_err());
        assert!("".parse::<Polynomial>().is_err());
    }

    #[test]
    fn value_display_matches_inner_display() {
        assert_eq!(Value::Natural(Natural(9)).to_string(), "9");
        assert_eq!(Value::Integer(Integer(-4)).to_string(), "-4");
        assert_eq!(
            Value::Rational(Rational::new(1, 3).unwrap()).to_string(),
            "1/3"
        );
        assert_eq!(Value::Bool(true).to_string(), "true");
    }
}
