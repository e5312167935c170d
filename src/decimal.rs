use crate::error::Error;
use num_bigint::BigInt;
use num_integer::{Integer, Roots};
use num_traits::{Signed, Zero};
use regex::Regex;
use std::cmp::Ordering;

/// Number of fractional digits kept by the arithmetic layer when no other
/// scale is configured.
pub const DEFAULT_SCALE: u32 = 12;

lazy_static! {
    static ref INTEGER_EXPONENT: Regex = Regex::new(r"^-?\d+$").expect("static regex");
}

/// Fixed-scale decimal arithmetic on decimal strings.
///
/// Values never touch binary floating point: a decimal string is scaled by
/// `10^scale` into a [`BigInt`], all arithmetic happens on integers, and the
/// result is rescaled and normalized on the way out. Division and
/// multiplication truncate toward zero at the configured scale, like a
/// fixed-point `bc`.
///
/// ```
/// use tickertape::DecimalMath;
///
/// let math = DecimalMath::default();
/// assert_eq!(math.add("0.1", "0.2"), Ok("0.3".to_string()));
/// assert_eq!(math.divide("1", "3"), Ok("0.333333333333".to_string()));
/// ```
#[derive(Debug, Clone)]
pub struct DecimalMath {
    scale: u32,
}

impl Default for DecimalMath {
    fn default() -> Self {
        Self::new(DEFAULT_SCALE)
    }
}

impl DecimalMath {
    /// Create an arithmetic context keeping `scale` fractional digits.
    #[must_use]
    pub fn new(scale: u32) -> Self {
        DecimalMath { scale }
    }

    /// The configured number of fractional digits.
    #[must_use]
    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Exact fixed-scale addition.
    pub fn add(&self, left: &str, right: &str) -> Result<String, Error> {
        let sum = self.parse_scaled(left)? + self.parse_scaled(right)?;
        Ok(self.format_scaled(&sum))
    }

    /// Exact fixed-scale subtraction.
    pub fn subtract(&self, left: &str, right: &str) -> Result<String, Error> {
        let difference = self.parse_scaled(left)? - self.parse_scaled(right)?;
        Ok(self.format_scaled(&difference))
    }

    /// Fixed-scale multiplication, truncating the doubled scale back
    /// toward zero.
    pub fn multiply(&self, left: &str, right: &str) -> Result<String, Error> {
        let product = self.mul_scaled(&self.parse_scaled(left)?, &self.parse_scaled(right)?);
        Ok(self.format_scaled(&product))
    }

    /// Fixed-scale division, truncating toward zero.
    ///
    /// # Errors
    /// [`Error::DivisionByZero`] when `right` normalizes to zero.
    pub fn divide(&self, left: &str, right: &str) -> Result<String, Error> {
        let dividend = self.parse_scaled(left)?;
        let divisor = self.parse_scaled(right)?;
        let quotient = self.div_scaled(&dividend, &divisor)?;
        Ok(self.format_scaled(&quotient))
    }

    /// Raise `base` to an integer `exponent`.
    ///
    /// Exponent `0` yields `"1"` for every base, `0^0` included -- that is
    /// the convention this engine adopts, not a mathematical claim. A
    /// positive exponent runs square-and-multiply with truncation at scale
    /// after each step; a negative exponent computes the positive power and
    /// divides `1` by it, inheriting [`Error::DivisionByZero`] when the
    /// positive power truncates to zero.
    ///
    /// # Errors
    /// [`Error::UnsupportedExponent`] when `exponent` is not an integer
    /// literal.
    pub fn power(&self, base: &str, exponent: &str) -> Result<String, Error> {
        if !INTEGER_EXPONENT.is_match(exponent) {
            return Err(Error::UnsupportedExponent);
        }
        let exp: i64 = exponent.parse().map_err(|_| Error::UnsupportedExponent)?;
        if exp == 0 {
            return Ok("1".to_string());
        }

        let positive = self.pow_scaled(&self.parse_scaled(base)?, exp.unsigned_abs());
        if exp > 0 {
            return Ok(self.format_scaled(&positive));
        }

        let inverted = self.div_scaled(&self.one_scaled(), &positive)?;
        Ok(self.format_scaled(&inverted))
    }

    /// Exact floor square root at the configured scale.
    ///
    /// # Errors
    /// [`Error::NegativeSqrt`] when `value` is negative.
    pub fn sqrt(&self, value: &str) -> Result<String, Error> {
        let operand = self.parse_scaled(value)?;
        if operand.is_negative() {
            return Err(Error::NegativeSqrt);
        }
        // sqrt(v * 10^s * 10^s) = sqrt(v) * 10^s, so one extra rescale
        // keeps every digit of the result within scale.
        let root = (operand * self.pow10(self.scale)).sqrt();
        Ok(self.format_scaled(&root))
    }

    /// Three-way comparison at the configured scale.
    pub fn compare(&self, left: &str, right: &str) -> Result<Ordering, Error> {
        Ok(self.parse_scaled(left)?.cmp(&self.parse_scaled(right)?))
    }

    /// Whether `value` compares equal to zero at the configured scale.
    pub fn is_zero(&self, value: &str) -> Result<bool, Error> {
        Ok(self.compare(value, "0")? == Ordering::Equal)
    }

    /// Canonicalize a decimal string: trim whitespace, strip trailing
    /// fractional zeros and a trailing decimal point, collapse `""` and
    /// `"-0"` to `"0"`. Idempotent.
    #[must_use]
    pub fn normalize(&self, value: &str) -> String {
        let mut normalized = value.trim();

        if normalized.contains('.') {
            normalized = normalized.trim_end_matches('0');
            normalized = normalized.trim_end_matches('.');
        }

        if normalized.is_empty() || normalized == "-0" {
            return "0".to_string();
        }

        normalized.to_string()
    }

    fn pow10(&self, digits: u32) -> BigInt {
        num_traits::pow(BigInt::from(10), digits as usize)
    }

    fn one_scaled(&self) -> BigInt {
        self.pow10(self.scale)
    }

    fn mul_scaled(&self, left: &BigInt, right: &BigInt) -> BigInt {
        // BigInt division truncates toward zero, matching bc semantics.
        (left * right) / self.one_scaled()
    }

    fn div_scaled(&self, left: &BigInt, right: &BigInt) -> Result<BigInt, Error> {
        if right.is_zero() {
            return Err(Error::DivisionByZero);
        }
        Ok((left * self.one_scaled()) / right)
    }

    fn pow_scaled(&self, base: &BigInt, exponent: u64) -> BigInt {
        let mut result = self.one_scaled();
        let mut square = base.clone();
        let mut remaining = exponent;
        while remaining > 0 {
            if remaining & 1 == 1 {
                result = self.mul_scaled(&result, &square);
            }
            remaining >>= 1;
            if remaining > 0 {
                square = self.mul_scaled(&square, &square);
            }
        }
        result
    }

    /// Parse a decimal string into its scaled integer representation,
    /// truncating fractional digits beyond the scale toward zero.
    fn parse_scaled(&self, value: &str) -> Result<BigInt, Error> {
        let trimmed = value.trim();
        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };

        let mut parts = unsigned.splitn(2, '.');
        let int_part = parts.next().unwrap_or("");
        let frac_part = parts.next().unwrap_or("");

        if int_part.is_empty() && frac_part.is_empty() {
            return Err(Error::MalformedNumber);
        }
        if !int_part.chars().all(|c| c.is_ascii_digit())
            || !frac_part.chars().all(|c| c.is_ascii_digit())
        {
            return Err(Error::MalformedNumber);
        }

        let scale = self.scale as usize;
        let mut digits = String::with_capacity(int_part.len() + scale);
        digits.push_str(int_part);
        if frac_part.len() >= scale {
            digits.push_str(&frac_part[..scale]);
        } else {
            digits.push_str(frac_part);
            digits.push_str(&"0".repeat(scale - frac_part.len()));
        }

        let magnitude = if digits.is_empty() {
            BigInt::zero()
        } else {
            digits.parse::<BigInt>().map_err(|_| Error::MalformedNumber)?
        };

        Ok(if negative { -magnitude } else { magnitude })
    }

    /// Render a scaled integer back into a normalized decimal string.
    fn format_scaled(&self, value: &BigInt) -> String {
        let negative = value.is_negative();
        let (int_part, frac_part) = value.abs().div_rem(&self.one_scaled());

        let mut rendered = String::new();
        if negative {
            rendered.push('-');
        }
        rendered.push_str(&int_part.to_string());
        if self.scale > 0 {
            let frac_digits = frac_part.to_string();
            rendered.push('.');
            rendered.push_str(&"0".repeat(self.scale as usize - frac_digits.len()));
            rendered.push_str(&frac_digits);
        }

        self.normalize(&rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn math() -> DecimalMath {
        DecimalMath::default()
    }

    #[test_case("0.1", "0.2" => Ok("0.3".to_string()) ; "fractions stay exact")]
    #[test_case("10.5", "2.25" => Ok("12.75".to_string()) ; "mixed scales")]
    #[test_case("-3", "5" => Ok("2".to_string()) ; "negative left operand")]
    fn add(left: &str, right: &str) -> Result<String, Error> {
        math().add(left, right)
    }

    #[test_case("1", "0.999999999999" => Ok("0.000000000001".to_string()) ; "smallest step at scale")]
    #[test_case("2", "5" => Ok("-3".to_string()) ; "negative result")]
    fn subtract(left: &str, right: &str) -> Result<String, Error> {
        math().subtract(left, right)
    }

    #[test_case("1.5", "2" => Ok("3".to_string()))]
    #[test_case("-0.5", "0.5" => Ok("-0.25".to_string()))]
    #[test_case("0.000001", "0.000001" => Ok("0.000000000001".to_string()) ; "product at the scale floor")]
    fn multiply(left: &str, right: &str) -> Result<String, Error> {
        math().multiply(left, right)
    }

    #[test]
    fn divide_truncates_at_scale() {
        assert_eq!(math().divide("1", "3"), Ok("0.333333333333".to_string()));
        assert_eq!(math().divide("2", "3"), Ok("0.666666666666".to_string()));
        assert_eq!(math().divide("81", "12"), Ok("6.75".to_string()));
    }

    #[test_case("0" ; "literal zero")]
    #[test_case("0.000" ; "zero with trailing zeros")]
    #[test_case("-0" ; "negative zero")]
    fn divide_by_zero_is_rejected(divisor: &str) {
        assert_eq!(math().divide("1", divisor), Err(Error::DivisionByZero));
    }

    #[test]
    fn power_integer_exponents() {
        assert_eq!(math().power("2", "10"), Ok("1024".to_string()));
        assert_eq!(math().power("2", "-2"), Ok("0.25".to_string()));
        assert_eq!(math().power("-2", "3"), Ok("-8".to_string()));
        assert_eq!(math().power("1.5", "2"), Ok("2.25".to_string()));
    }

    #[test]
    fn power_zero_exponent_is_one_by_convention() {
        assert_eq!(math().power("5", "0"), Ok("1".to_string()));
        assert_eq!(math().power("0", "0"), Ok("1".to_string()));
    }

    #[test_case("2.5" ; "fractional exponent")]
    #[test_case("+3" ; "explicit plus sign")]
    #[test_case("two" ; "non numeric")]
    fn power_rejects_non_integer_exponents(exponent: &str) {
        assert_eq!(math().power("2", exponent), Err(Error::UnsupportedExponent));
    }

    #[test]
    fn power_zero_base_negative_exponent_divides_by_zero() {
        assert_eq!(math().power("0", "-1"), Err(Error::DivisionByZero));
    }

    #[test]
    fn sqrt_exact_and_truncated() {
        assert_eq!(math().sqrt("81"), Ok("9".to_string()));
        assert_eq!(math().sqrt("0"), Ok("0".to_string()));
        assert_eq!(math().sqrt("2"), Ok("1.414213562373".to_string()));
        assert_eq!(math().sqrt("31.5"), Ok("5.61248608016".to_string()));
    }

    #[test]
    fn sqrt_of_negative_is_rejected() {
        assert_eq!(math().sqrt("-4"), Err(Error::NegativeSqrt));
    }

    #[test]
    fn compare_at_scale() {
        assert_eq!(math().compare("1.50", "1.5"), Ok(Ordering::Equal));
        assert_eq!(math().compare("-1", "1"), Ok(Ordering::Less));
        assert_eq!(math().compare("0.000000000001", "0"), Ok(Ordering::Greater));
        assert!(math().is_zero("0.0").unwrap());
        assert!(!math().is_zero("0.000000000001").unwrap());
    }

    #[test_case("5.000" => "5".to_string())]
    #[test_case("5." => "5".to_string())]
    #[test_case("-0" => "0".to_string())]
    #[test_case("-0.000" => "0".to_string())]
    #[test_case("" => "0".to_string())]
    #[test_case("007" => "007".to_string() ; "leading zeros are left alone")]
    #[test_case("12.75" => "12.75".to_string())]
    fn normalize(value: &str) -> String {
        math().normalize(value)
    }

    #[test]
    fn normalize_is_idempotent() {
        for value in &["5.000", "-0", "0.1230", "42", "", "-17.5"] {
            let once = math().normalize(value);
            assert_eq!(math().normalize(&once), once);
        }
    }

    #[test]
    fn malformed_operands_are_rejected() {
        assert_eq!(math().add("1.2.3", "1"), Err(Error::MalformedNumber));
        assert_eq!(math().add(".", "1"), Err(Error::MalformedNumber));
        assert_eq!(math().add("abc", "1"), Err(Error::MalformedNumber));
    }
}
