use crate::rational::{ratio, Rational};

/// Absolute magnitude below which a gamma series term ends the sum.
pub const DEFAULT_TOLERANCE: f64 = 1e-8;
/// Number of gamma series terms summed before giving up on the tolerance.
pub const DEFAULT_MAX_TERMS: usize = 100;

/// Numerator of the rational approximation of √π.
///
/// `677_622_787 / 382_307_718` differs from √π by about 1.7e-16, so every
/// half-integer gamma value carries roughly sixteen correct significant digits.
pub const SQRT_PI_NUMER: i64 = 677_622_787;
/// Denominator of the rational approximation of √π.
pub const SQRT_PI_DENOM: i64 = 382_307_718;

/// Numerator of the rational approximation of π.
///
/// `5_419_351 / 1_725_033` is accurate to about 2e-14.
pub const PI_NUMER: i64 = 5_419_351;
/// Denominator of the rational approximation of π.
pub const PI_DENOM: i64 = 1_725_033;

/// √π as an exact rational, see [`SQRT_PI_NUMER`].
pub fn sqrt_pi() -> Rational {
    ratio(SQRT_PI_NUMER, SQRT_PI_DENOM)
}

/// π as an exact rational, see [`PI_NUMER`].
pub fn pi() -> Rational {
    ratio(PI_NUMER, PI_DENOM)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rational::to_f64;

    #[test]
    fn test_constant_precision() {
        assert!((to_f64(&sqrt_pi()) - std::f64::consts::PI.sqrt()).abs() < 1e-15);
        assert!((to_f64(&pi()) - std::f64::consts::PI).abs() < 1e-12);
    }
}
