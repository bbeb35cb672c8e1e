//! Rational
//!
//! Exact rational helpers shared by the gamma kernel, the contingency table and
//! the reporting layer. Every value is a [`BigRational`], so sums and products
//! never lose precision; the only inexact step is a non-integer power.
use crate::errors::ChiSquaredError;
use num::bigint::{BigInt, BigUint};
use num::rational::BigRational;
use num::traits::{One, Signed, ToPrimitive, Zero};
use num::Integer;

/// Exact rational number used throughout the crate.
pub type Rational = BigRational;

/// Build the rational `numer / denom`.
///
/// Panics if `denom` is zero, like [`BigRational::new`].
pub fn ratio(numer: i64, denom: i64) -> Rational {
    Rational::new(BigInt::from(numer), BigInt::from(denom))
}

/// Build the rational with integer value `value`.
pub fn integer(value: u64) -> Rational {
    Rational::from_integer(BigInt::from(value))
}

/// Exact value of a float.
///
/// The conversion keeps every bit of the binary value, so `from_f64(0.1)` is
/// `3602879701896397 / 36028797018963968`, not `1 / 10`.
pub fn from_f64(value: f64) -> Result<Rational, ChiSquaredError> {
    Rational::from_float(value).ok_or(ChiSquaredError::NotRepresentable(value))
}

/// Nearest float to a rational.
///
/// Numerators and denominators routinely exceed `f64::MAX` after a long
/// series, so the quotient is taken on integers scaled to 64 significant bits
/// before it is turned into a float.
pub fn to_f64(value: &Rational) -> f64 {
    if value.is_zero() {
        return 0.0;
    }
    let numer: &BigUint = value.numer().magnitude();
    let denom: &BigUint = value.denom().magnitude();
    let shift = 64 - (numer.bits() as i64 - denom.bits() as i64);
    let quotient = if shift >= 0 {
        (numer << shift as usize) / denom
    } else {
        numer / (denom << (-shift) as usize)
    };
    let mantissa = quotient.to_f64().unwrap_or(f64::INFINITY);
    let magnitude = scale_by_power_of_two(mantissa, -shift);
    if value.is_negative() {
        -magnitude
    } else {
        magnitude
    }
}

// Split the exponent so intermediate powers of two stay finite and non-zero.
fn scale_by_power_of_two(mut value: f64, mut exponent: i64) -> f64 {
    while exponent > 512 {
        value *= 2f64.powi(512);
        exponent -= 512;
    }
    while exponent < -512 {
        value *= 2f64.powi(-512);
        exponent += 512;
    }
    value * 2f64.powi(exponent as i32)
}

/// Raise `base` to `exponent`.
///
/// Integer exponents are exact. A non-integer exponent `n + f` (with `0 < f < 1`)
/// is computed as the exact `base^n` times the float `base^f` taken back to a
/// rational. This is the only place precision can leak into the kernel, and it
/// only happens for half-integer gamma shapes.
pub fn pow(base: &Rational, exponent: &Rational) -> Result<Rational, ChiSquaredError> {
    if exponent.is_integer() {
        let e = exponent.to_integer().to_i32().ok_or_else(|| {
            ChiSquaredError::InvalidParameter(
                "exponent".to_string(),
                "an exponent that fits in 32 bits".to_string(),
                exponent.to_string(),
            )
        })?;
        if base.is_zero() && e < 0 {
            return Err(ChiSquaredError::InvalidParameter(
                "base".to_string(),
                "a non-zero base for a negative exponent".to_string(),
                base.to_string(),
            ));
        }
        return Ok(base.pow(e));
    }
    if base.is_negative() {
        return Err(ChiSquaredError::InvalidParameter(
            "base".to_string(),
            "a non-negative base for a fractional exponent".to_string(),
            base.to_string(),
        ));
    }
    if base.is_zero() {
        return if exponent.is_positive() {
            Ok(Rational::zero())
        } else {
            Err(ChiSquaredError::InvalidParameter(
                "exponent".to_string(),
                "a positive exponent for a zero base".to_string(),
                exponent.to_string(),
            ))
        };
    }
    let whole = exponent.floor();
    let fraction = exponent - &whole;
    let exact = pow(base, &whole)?;
    let approximate = from_f64(to_f64(base).powf(to_f64(&fraction)))?;
    Ok(exact * approximate)
}

/// Closest rational with a denominator of at most `max_denominator`.
///
/// Walks the continued fraction of `value` until the next convergent's
/// denominator would exceed the bound, then picks the better of the last
/// convergent and the best semiconvergent. Ties go to the convergent.
pub fn limit_denominator(value: &Rational, max_denominator: u64) -> Result<Rational, ChiSquaredError> {
    if max_denominator < 1 {
        return Err(ChiSquaredError::InvalidParameter(
            "max_denominator".to_string(),
            "an integer >= 1".to_string(),
            max_denominator.to_string(),
        ));
    }
    let max_d = BigInt::from(max_denominator);
    if value.denom() <= &max_d {
        return Ok(value.clone());
    }

    let (mut p0, mut q0, mut p1, mut q1) = (BigInt::zero(), BigInt::one(), BigInt::one(), BigInt::zero());
    let (mut n, mut d) = (value.numer().clone(), value.denom().clone());
    loop {
        let a = n.div_floor(&d);
        let q2 = &q0 + &a * &q1;
        if q2 > max_d {
            break;
        }
        let p2 = &p0 + &a * &p1;
        p0 = std::mem::replace(&mut p1, p2);
        q0 = std::mem::replace(&mut q1, q2);
        let remainder = &n - &a * &d;
        n = std::mem::replace(&mut d, remainder);
    }

    let k = (&max_d - &q0).div_floor(&q1);
    let semiconvergent = Rational::new(&p0 + &k * &p1, &q0 + &k * &q1);
    let convergent = Rational::new(p1, q1);
    if (&convergent - value).abs() <= (&semiconvergent - value).abs() {
        Ok(convergent)
    } else {
        Ok(semiconvergent)
    }
}
