//! Exact rational numbers with lazy reduction.
//!
//! A rational keeps whichever form it was built from. Decimal-sourced
//! values retain their mantissa and scale; pair-sourced values retain the
//! numerator and denominator as given (sign-normalized). The reduced pair
//! and the terminating-decimal classification are computed on first use
//! and cached.

use std::cell::OnceCell;
use std::fmt;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

use crate::error::{Error, ErrorKind, Result};

/// An exact decimal: `mantissa / 10^scale`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decimal {
    mantissa: BigInt,
    scale: u32,
}

impl Decimal {
    /// Creates a decimal from its mantissa and scale.
    #[must_use]
    pub fn new(mantissa: BigInt, scale: u32) -> Self {
        Self { mantissa, scale }
    }

    /// Returns the mantissa.
    #[must_use]
    pub fn mantissa(&self) -> &BigInt {
        &self.mantissa
    }

    /// Returns the number of fractional digits.
    #[must_use]
    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Returns the same number with trailing fractional zeros removed.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let ten = BigInt::from(10u8);
        let mut mantissa = self.mantissa.clone();
        let mut scale = self.scale;
        while scale > 0 && (&mantissa % &ten).is_zero() {
            mantissa /= &ten;
            scale -= 1;
        }
        Self { mantissa, scale }
    }

    /// Renders with at least one fractional digit, keeping this scale.
    #[must_use]
    pub fn to_text(&self) -> String {
        let sign = if self.mantissa.is_negative() { "-" } else { "" };
        let digits = self.mantissa.magnitude().to_string();
        if self.scale == 0 {
            return format!("{sign}{digits}.0");
        }
        let scale = self.scale as usize;
        let padded = if digits.len() <= scale {
            format!("{}{digits}", "0".repeat(scale + 1 - digits.len()))
        } else {
            digits
        };
        let (whole, frac) = padded.split_at(padded.len() - scale);
        format!("{sign}{whole}.{frac}")
    }

    fn to_pair(&self) -> (BigInt, BigInt) {
        (self.mantissa.clone(), BigInt::from(10u8).pow(self.scale))
    }
}

/// Exact rational number.
#[derive(Clone)]
pub struct Rational {
    decimal: Option<Decimal>,
    pair: OnceCell<(BigInt, BigInt)>,
    reduced: OnceCell<(BigInt, BigInt)>,
    terminating: OnceCell<bool>,
}

impl Rational {
    /// Creates `numerator / denominator`.
    ///
    /// The sign moves to the numerator. Reduction is deferred until a
    /// reduced form is asked for.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ZeroDenominator`] if `denominator` is zero.
    pub fn new(numerator: impl Into<BigInt>, denominator: impl Into<BigInt>) -> Result<Self> {
        let (mut numerator, mut denominator) = (numerator.into(), denominator.into());
        if denominator.is_zero() {
            return Err(Error::zero_denominator()
                .with_context(format!("Rational::new({numerator}, 0)")));
        }
        if denominator.is_negative() {
            numerator = -numerator;
            denominator = -denominator;
        }
        Ok(Self {
            decimal: None,
            pair: OnceCell::from((numerator, denominator)),
            reduced: OnceCell::new(),
            terminating: OnceCell::new(),
        })
    }

    /// Creates `mantissa / 10^scale`, remembering the decimal form.
    #[must_use]
    pub fn from_decimal(mantissa: impl Into<BigInt>, scale: u32) -> Self {
        Self {
            decimal: Some(Decimal::new(mantissa.into(), scale)),
            pair: OnceCell::new(),
            reduced: OnceCell::new(),
            terminating: OnceCell::from(true),
        }
    }

    /// Creates the rational zero.
    #[must_use]
    pub fn zero() -> Self {
        Self::from_decimal(0, 0)
    }

    /// Parses `-?digits(.digits)?`, keeping the written scale.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::MalformedDecimal`] for anything else.
    pub fn parse_decimal(text: &str) -> Result<Self> {
        let malformed = || Error::new(ErrorKind::MalformedDecimal(text.to_string()));
        let (negative, unsigned) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let (whole, frac) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if whole.is_empty()
            || !all_digits(whole)
            || !all_digits(frac)
            || (unsigned.contains('.') && frac.is_empty())
        {
            return Err(malformed());
        }
        let mut mantissa: BigInt = format!("{whole}{frac}").parse().map_err(|_| malformed())?;
        if negative {
            mantissa = -mantissa;
        }
        let scale = u32::try_from(frac.len()).map_err(|_| malformed())?;
        Ok(Self::from_decimal(mantissa, scale))
    }

    /// Returns the decimal form, if this value was built from one.
    #[must_use]
    pub fn decimal(&self) -> Option<&Decimal> {
        self.decimal.as_ref()
    }

    /// Returns the numerator/denominator pair as built, deriving it from
    /// the decimal form on first use.
    pub fn pair(&self) -> &(BigInt, BigInt) {
        self.pair.get_or_init(|| match &self.decimal {
            Some(decimal) => decimal.to_pair(),
            None => (BigInt::zero(), BigInt::one()),
        })
    }

    /// Returns the pair in lowest terms.
    pub fn reduced(&self) -> &(BigInt, BigInt) {
        self.reduced.get_or_init(|| {
            let (n, d) = self.pair();
            let g = n.gcd(d);
            if g.is_one() {
                (n.clone(), d.clone())
            } else {
                (n / &g, d / &g)
            }
        })
    }

    /// Returns the reduced numerator.
    pub fn numerator(&self) -> &BigInt {
        &self.reduced().0
    }

    /// Returns the reduced denominator, always positive.
    pub fn denominator(&self) -> &BigInt {
        &self.reduced().1
    }

    /// Returns true if this value is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        match &self.decimal {
            Some(decimal) => decimal.mantissa.is_zero(),
            None => self.pair().0.is_zero(),
        }
    }

    /// Returns true if the reduced denominator is one.
    pub fn is_integral(&self) -> bool {
        self.denominator().is_one()
    }

    /// Returns true if the reduced denominator has no prime factors other
    /// than 2 and 5.
    pub fn is_terminating_decimal(&self) -> bool {
        *self.terminating.get_or_init(|| {
            let (_, _, rest) = split_twos_and_fives(self.denominator());
            rest.is_one()
        })
    }

    /// Returns the shortest exact decimal for a terminating value.
    #[must_use]
    pub fn canonical_decimal(&self) -> Option<Decimal> {
        if let Some(decimal) = &self.decimal {
            return Some(decimal.normalized());
        }
        if !self.is_terminating_decimal() {
            return None;
        }
        let (n, d) = self.reduced();
        let (twos, fives, _) = split_twos_and_fives(d);
        let scale = twos.max(fives);
        let factor = BigInt::from(10u8).pow(scale) / d;
        Some(Decimal::new(n * factor, scale))
    }

    /// Returns the decimal text, preferring the scale it was written with.
    #[must_use]
    pub fn decimal_text(&self) -> Option<String> {
        match &self.decimal {
            Some(decimal) => Some(decimal.to_text()),
            None => self.canonical_decimal().map(|d| d.to_text()),
        }
    }

    /// Renders the canonical literal: a decimal point for terminating
    /// values, `n/d` in lowest terms otherwise.
    #[must_use]
    pub fn literal(&self) -> String {
        match self.canonical_decimal() {
            Some(decimal) => decimal.to_text(),
            None => {
                let (n, d) = self.reduced();
                format!("{n}/{d}")
            }
        }
    }

    /// Returns true if both denote the same number.
    #[must_use]
    pub fn same(&self, other: &Self) -> bool {
        match (&self.decimal, &other.decimal) {
            (Some(a), Some(b)) => a.normalized() == b.normalized(),
            _ => self.reduced() == other.reduced(),
        }
    }
}

/// Strips factors of 2 and 5, returning how many of each and the rest.
fn split_twos_and_fives(n: &BigInt) -> (u32, u32, BigInt) {
    let five = BigInt::from(5u8);
    let mut rest = n.clone();
    let mut twos = 0;
    let mut fives = 0;
    if rest.is_zero() {
        return (0, 0, rest);
    }
    while rest.is_even() {
        rest >>= 1;
        twos += 1;
    }
    while (&rest % &five).is_zero() {
        rest /= &five;
        fives += 1;
    }
    (twos, fives, rest)
}

impl fmt::Debug for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rational({})", self.literal())
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.literal())
    }
}
