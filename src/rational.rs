//! Arbitrary-precision rational numbers.
//!
//! [Rational] keeps a machine-word fast path and transparently falls back to
//! multi-precision arithmetic on overflow. Every value is fully normalized:
//! the denominator is positive, numerator and denominator are coprime, and
//! zero is always represented as `0/1`, so structural equality is value
//! equality.

use std::{
    fmt::{self, Display, Formatter},
    ops::{Add, Mul, Neg, Sub},
    str::FromStr,
};

use rug::{
    ops::Pow, Integer as MultiPrecisionInteger, Rational as MultiPrecisionRational,
};

use crate::utils;

/// Errors raised by rational construction, arithmetic and parsing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RationalError {
    /// A zero denominator was constructed or a division by zero was requested.
    DivisionByZero,
    /// A numeric literal was empty or malformed.
    Parse(String),
}

impl Display for RationalError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            RationalError::DivisionByZero => write!(f, "Division by zero"),
            RationalError::Parse(s) => write!(f, "Could not parse rational: {}", s),
        }
    }
}

impl std::error::Error for RationalError {}

/// A rational number in lowest terms with a positive denominator.
///
/// The `Large` variant is only held when the value does not fit the small
/// representation, so the derived equality and hash are canonical.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Rational {
    Natural(i64, i64),
    Large(MultiPrecisionRational),
}

impl Rational {
    /// Create a normalized rational from a numerator and denominator.
    /// Returns `DivisionByZero` when `den` is zero.
    pub fn new(num: i64, den: i64) -> Result<Rational, RationalError> {
        if den == 0 {
            return Err(RationalError::DivisionByZero);
        }
        Ok(Self::normalized(num, den))
    }

    /// Create a normalized rational from multi-precision parts.
    /// Returns `DivisionByZero` when `den` is zero.
    pub fn from_big(
        num: MultiPrecisionInteger,
        den: MultiPrecisionInteger,
    ) -> Result<Rational, RationalError> {
        if den == 0 {
            return Err(RationalError::DivisionByZero);
        }
        Ok(Self::from_large(MultiPrecisionRational::from((num, den))))
    }

    pub fn zero() -> Rational {
        Rational::Natural(0, 1)
    }

    pub fn one() -> Rational {
        Rational::Natural(1, 1)
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        matches!(self, Rational::Natural(0, _))
    }

    #[inline]
    pub fn is_one(&self) -> bool {
        matches!(self, Rational::Natural(1, 1))
    }

    pub fn is_negative(&self) -> bool {
        match self {
            Rational::Natural(n, _) => *n < 0,
            Rational::Large(r) => r.cmp0() == std::cmp::Ordering::Less,
        }
    }

    pub fn abs(&self) -> Rational {
        if self.is_negative() {
            -self
        } else {
            self.clone()
        }
    }

    pub fn numerator(&self) -> MultiPrecisionInteger {
        match self {
            Rational::Natural(n, _) => (*n).into(),
            Rational::Large(r) => r.numer().clone(),
        }
    }

    pub fn denominator(&self) -> MultiPrecisionInteger {
        match self {
            Rational::Natural(_, d) => (*d).into(),
            Rational::Large(r) => r.denom().clone(),
        }
    }

    /// The multiplicative inverse. Returns `DivisionByZero` for zero.
    pub fn inv(&self) -> Result<Rational, RationalError> {
        if self.is_zero() {
            return Err(RationalError::DivisionByZero);
        }
        match self {
            &Rational::Natural(n, d) => Ok(Self::normalized(d, n)),
            Rational::Large(r) => Ok(Self::from_large(r.clone().recip())),
        }
    }

    /// Divide by `rhs`. Returns `DivisionByZero` when `rhs` is zero.
    pub fn div(&self, rhs: &Rational) -> Result<Rational, RationalError> {
        Ok(self * &rhs.inv()?)
    }

    /// Normalize a small fraction, falling back to the multi-precision
    /// representation when a sign flip or reduction overflows.
    fn normalized(num: i64, den: i64) -> Rational {
        debug_assert!(den != 0);
        let g = utils::gcd_signed(num, den);
        if g <= i64::MAX as u64 {
            let g = g as i64;
            let (n, d) = (num / g, den / g);
            if d > 0 {
                return Rational::Natural(n, d);
            }
            if let (Some(n), Some(d)) = (n.checked_neg(), d.checked_neg()) {
                return Rational::Natural(n, d);
            }
        }
        Self::from_large(MultiPrecisionRational::from((num, den)))
    }

    /// Downcast a multi-precision rational to the small representation when
    /// both parts fit in machine words.
    pub(crate) fn from_large(r: MultiPrecisionRational) -> Rational {
        if let (Some(n), Some(d)) = (r.numer().to_i64(), r.denom().to_i64()) {
            Rational::Natural(n, d)
        } else {
            Rational::Large(r)
        }
    }

    fn to_large(&self) -> MultiPrecisionRational {
        match self {
            &Rational::Natural(n, d) => MultiPrecisionRational::from((n, d)),
            Rational::Large(r) => r.clone(),
        }
    }
}

impl Default for Rational {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<i64> for Rational {
    #[inline]
    fn from(value: i64) -> Self {
        Rational::Natural(value, 1)
    }
}

impl From<i32> for Rational {
    #[inline]
    fn from(value: i32) -> Self {
        Rational::Natural(value as i64, 1)
    }
}

impl From<(i64, i64)> for Rational {
    /// Construct a normalized fraction. Panics when the denominator is zero.
    fn from((num, den): (i64, i64)) -> Self {
        if den == 0 {
            panic!("The denominator cannot be zero");
        }
        Rational::normalized(num, den)
    }
}

impl Add<&Rational> for &Rational {
    type Output = Rational;

    fn add(self, rhs: &Rational) -> Rational {
        if let (&Rational::Natural(n1, d1), &Rational::Natural(n2, d2)) = (self, rhs) {
            if let (Some(a), Some(b), Some(den)) =
                (n1.checked_mul(d2), n2.checked_mul(d1), d1.checked_mul(d2))
            {
                if let Some(num) = a.checked_add(b) {
                    return Rational::normalized(num, den);
                }
            }
        }
        Rational::from_large(self.to_large() + rhs.to_large())
    }
}

impl Sub<&Rational> for &Rational {
    type Output = Rational;

    fn sub(self, rhs: &Rational) -> Rational {
        if let (&Rational::Natural(n1, d1), &Rational::Natural(n2, d2)) = (self, rhs) {
            if let (Some(a), Some(b), Some(den)) =
                (n1.checked_mul(d2), n2.checked_mul(d1), d1.checked_mul(d2))
            {
                if let Some(num) = a.checked_sub(b) {
                    return Rational::normalized(num, den);
                }
            }
        }
        Rational::from_large(self.to_large() - rhs.to_large())
    }
}

impl Mul<&Rational> for &Rational {
    type Output = Rational;

    fn mul(self, rhs: &Rational) -> Rational {
        if let (&Rational::Natural(n1, d1), &Rational::Natural(n2, d2)) = (self, rhs) {
            if let (Some(num), Some(den)) = (n1.checked_mul(n2), d1.checked_mul(d2)) {
                return Rational::normalized(num, den);
            }
        }
        Rational::from_large(self.to_large() * rhs.to_large())
    }
}

impl Neg for &Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        match self {
            &Rational::Natural(n, d) => {
                if let Some(n) = n.checked_neg() {
                    Rational::Natural(n, d)
                } else {
                    Rational::from_large(-self.to_large())
                }
            }
            Rational::Large(r) => Rational::from_large(-r.clone()),
        }
    }
}

impl Neg for Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        -&self
    }
}

impl FromStr for Rational {
    type Err = RationalError;

    /// Parse an integer (`-12`), decimal (`3.1400`) or fraction (`7/-2`)
    /// literal. The decimal form becomes `n / 10^k` with `k` the number of
    /// fractional digits; the fraction form normalizes the denominator sign.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(RationalError::Parse("empty input".into()));
        }

        if let Some((num, den)) = s.split_once('/') {
            if den.contains('/') {
                return Err(RationalError::Parse(format!("malformed fraction: {}", s)));
            }
            return Rational::from_big(parse_integer(num.trim())?, parse_integer(den.trim())?);
        }

        if let Some((whole, frac)) = s.split_once('.') {
            if frac.contains('.') {
                return Err(RationalError::Parse(format!("malformed decimal: {}", s)));
            }
            let (negative, whole) = match whole.strip_prefix('-') {
                Some(rest) => (true, rest),
                None => (false, whole),
            };
            let digits = format!("{}{}", whole, frac);
            if digits.is_empty() {
                return Err(RationalError::Parse(format!("malformed decimal: {}", s)));
            }
            let mut num = parse_integer(&digits)?;
            if negative {
                num = -num;
            }
            let scale = MultiPrecisionInteger::from(10).pow(frac.len() as u32);
            return Rational::from_big(num, scale);
        }

        Ok(Rational::from_large(MultiPrecisionRational::from((
            parse_integer(s)?,
            MultiPrecisionInteger::from(1),
        ))))
    }
}

fn parse_integer(s: &str) -> Result<MultiPrecisionInteger, RationalError> {
    s.parse::<MultiPrecisionInteger>()
        .map_err(|_| RationalError::Parse(format!("invalid integer literal: {}", s)))
}

impl Display for Rational {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Rational::Natural(n, d) => {
                if *d == 1 {
                    write!(f, "{}", n)
                } else {
                    write!(f, "{}/{}", n, d)
                }
            }
            Rational::Large(r) => r.fmt(f),
        }
    }
}

impl fmt::Debug for Rational {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use super::{Rational, RationalError};

    #[test]
    fn normalization() {
        assert_eq!(Rational::new(2, 4).unwrap(), (1, 2).into());
        assert_eq!(Rational::new(7, -2).unwrap(), (-7, 2).into());
        assert_eq!(Rational::new(-3, -9).unwrap(), (1, 3).into());
        assert_eq!(Rational::new(0, -5).unwrap(), Rational::zero());
        assert_eq!(Rational::new(1, 0), Err(RationalError::DivisionByZero));

        let r = Rational::new(-10, 15).unwrap();
        assert_eq!(r.numerator(), -2);
        assert_eq!(r.denominator(), 3);
    }

    #[test]
    fn arithmetic() {
        let a: Rational = (1, 2).into();
        let b: Rational = (1, 3).into();

        assert_eq!(&a + &b, (5, 6).into());
        assert_eq!(&a - &b, (1, 6).into());
        assert_eq!(&a * &b, (1, 6).into());
        assert_eq!(a.div(&b).unwrap(), (3, 2).into());
        assert_eq!(-&a, (-1, 2).into());
        assert_eq!(&a + &(-&a), Rational::zero());

        assert_eq!(Rational::from((-5, 3)).abs(), (5, 3).into());
        assert_eq!(a.abs(), a);
        assert_eq!(Rational::zero().abs(), Rational::zero());
        assert!(!Rational::from((i64::MIN, 1)).abs().is_negative());

        assert_eq!(
            a.div(&Rational::zero()),
            Err(RationalError::DivisionByZero)
        );
        assert_eq!(Rational::zero().inv(), Err(RationalError::DivisionByZero));
        assert_eq!(Rational::from((-2, 3)).inv().unwrap(), (-3, 2).into());
    }

    #[test]
    fn overflow_falls_back_to_large() {
        let a: Rational = (i64::MAX, 1).into();
        let sq = &a * &a;
        let back = sq.div(&a).unwrap();
        assert_eq!(back, a);

        let min: Rational = (i64::MIN, 1).into();
        assert_eq!(&(-&min) + &min, Rational::zero());
    }

    #[test]
    fn parsing() {
        assert_eq!(Rational::from_str("0.25").unwrap(), (1, 4).into());
        assert_eq!(Rational::from_str("3/6").unwrap(), (1, 2).into());
        assert_eq!(Rational::from_str("-12").unwrap(), (-12, 1).into());
        assert_eq!(Rational::from_str("3.1400").unwrap(), (157, 50).into());
        assert_eq!(Rational::from_str("7/-2").unwrap(), (-7, 2).into());
        assert_eq!(Rational::from_str("-0.5").unwrap(), (-1, 2).into());
        assert_eq!(Rational::from_str(".5").unwrap(), (1, 2).into());

        assert!(matches!(
            Rational::from_str(""),
            Err(RationalError::Parse(_))
        ));
        assert!(matches!(
            Rational::from_str("1.2.3"),
            Err(RationalError::Parse(_))
        ));
        assert!(matches!(
            Rational::from_str("1/2/3"),
            Err(RationalError::Parse(_))
        ));
        assert!(matches!(
            Rational::from_str("abc"),
            Err(RationalError::Parse(_))
        ));
        assert_eq!(
            Rational::from_str("1/0"),
            Err(RationalError::DivisionByZero)
        );
    }

    #[test]
    fn printing() {
        assert_eq!(Rational::from((4, 2)).to_string(), "2");
        assert_eq!(Rational::from((-1, 2)).to_string(), "-1/2");
        assert_eq!(Rational::zero().to_string(), "0");
    }
}
