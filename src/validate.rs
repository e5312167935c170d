use crate::engine::CalculationInput;
use regex::Regex;
use thiserror::Error;

/// Longest accepted expression, in characters.
pub const MAX_EXPRESSION_LENGTH: usize = 500;

lazy_static! {
    static ref EXPRESSION_CHARSET: Regex =
        Regex::new(r"^[0-9+\-*/^().,\sA-Za-z]+$").expect("static regex");
    static ref NUMERIC_OPERAND: Regex =
        Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)$").expect("static regex");
    static ref ZERO_OPERAND: Regex = Regex::new(r"^[+-]?0*(\.0*)?$").expect("static regex");
    static ref NEGATIVE_SQRT: Regex =
        Regex::new(r"(?i)sqrt\s*\(\s*-\s*[0-9.]+\s*\)").expect("static regex");
}

/// Rejections produced before a payload ever reaches the engine.
///
/// These mirror the request-validation rules of the surrounding service;
/// the engine re-checks balance and tokenizability itself and does not
/// trust this layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Both an expression and a full simple triple were supplied
    #[error("Provide either expression mode or simple operand mode, not both.")]
    BothModes,
    /// Neither mode was supplied
    #[error("Provide either expression or all simple operands (left, operator, right).")]
    MissingPayload,
    /// Simple mode without a left operand
    #[error("Left operand is required when expression is not provided.")]
    MissingLeft,
    /// Simple mode without an operator
    #[error("Operator is required when expression is not provided.")]
    MissingOperator,
    /// Simple mode without a right operand
    #[error("Right operand is required when expression is not provided.")]
    MissingRight,
    /// Operator outside the supported set
    #[error("Operator must be one of +, -, *, /, ^.")]
    InvalidOperator,
    /// An operand that is not a plain decimal literal
    #[error("The {0} operand must be numeric.")]
    NonNumericOperand(&'static str),
    /// Division with a right operand that normalizes to zero
    #[error("Division by zero is not allowed.")]
    DivisionByZero,
    /// Expression field present but blank after trimming
    #[error("Expression cannot be empty.")]
    EmptyExpression,
    /// Expression longer than [`MAX_EXPRESSION_LENGTH`]
    #[error("Expression must not be greater than 500 characters.")]
    ExpressionTooLong,
    /// A character outside `[0-9+\-*/^().,\sA-Za-z]`
    #[error("Expression contains unsupported characters.")]
    UnsupportedCharacters,
    /// Parenthesis balance dipped negative or did not return to zero
    #[error("Expression has unbalanced parentheses.")]
    UnbalancedParentheses,
    /// Textual `sqrt(-N)` caught before evaluation
    #[error("Square root of a negative number is not supported.")]
    NegativeSqrt,
}

/// A raw calculation request as it arrives from the outside: every field
/// optional, nothing trusted yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalculationPayload {
    pub left: Option<String>,
    pub operator: Option<String>,
    pub right: Option<String>,
    pub expression: Option<String>,
}

impl CalculationPayload {
    /// Validate the payload and shape it into a [`CalculationInput`].
    ///
    /// Exactly one of the two modes must be present. Expression mode is
    /// checked for emptiness, length, character class, running parenthesis
    /// balance and a textual `sqrt(-N)`; simple mode for operator membership,
    /// numeric operands and a zero divisor.
    pub fn validate(&self) -> Result<CalculationInput, ValidationError> {
        let expression = trimmed(&self.expression);
        let left = trimmed(&self.left);
        let operator = trimmed(&self.operator);
        let right = trimmed(&self.right);

        let has_expression = expression.is_some();
        let has_simple = left.is_some() && operator.is_some() && right.is_some();

        if has_expression && has_simple {
            return Err(ValidationError::BothModes);
        }

        if let Some(expression) = expression {
            validate_expression(expression)?;
            return Ok(CalculationInput::expression(expression));
        }

        if left.is_none() && operator.is_none() && right.is_none() {
            return Err(ValidationError::MissingPayload);
        }

        let left = left.ok_or(ValidationError::MissingLeft)?;
        let operator = operator.ok_or(ValidationError::MissingOperator)?;
        let right = right.ok_or(ValidationError::MissingRight)?;

        if !matches!(operator, "+" | "-" | "*" | "/" | "^") {
            return Err(ValidationError::InvalidOperator);
        }
        if !NUMERIC_OPERAND.is_match(left) {
            return Err(ValidationError::NonNumericOperand("left"));
        }
        if !NUMERIC_OPERAND.is_match(right) {
            return Err(ValidationError::NonNumericOperand("right"));
        }
        if operator == "/" && ZERO_OPERAND.is_match(right) {
            return Err(ValidationError::DivisionByZero);
        }

        Ok(CalculationInput::simple(left, operator, right))
    }
}

fn trimmed(field: &Option<String>) -> Option<&str> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn validate_expression(expression: &str) -> Result<(), ValidationError> {
    if expression.is_empty() {
        return Err(ValidationError::EmptyExpression);
    }
    if expression.chars().count() > MAX_EXPRESSION_LENGTH {
        return Err(ValidationError::ExpressionTooLong);
    }
    if !EXPRESSION_CHARSET.is_match(expression) {
        return Err(ValidationError::UnsupportedCharacters);
    }

    let mut balance: i64 = 0;
    for character in expression.chars() {
        if character == '(' {
            balance += 1;
        }
        if character == ')' {
            balance -= 1;
        }
        if balance < 0 {
            return Err(ValidationError::UnbalancedParentheses);
        }
    }
    if balance != 0 {
        return Err(ValidationError::UnbalancedParentheses);
    }

    if NEGATIVE_SQRT.is_match(expression) {
        return Err(ValidationError::NegativeSqrt);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Mode;
    use test_case::test_case;

    fn payload(
        left: Option<&str>,
        operator: Option<&str>,
        right: Option<&str>,
        expression: Option<&str>,
    ) -> CalculationPayload {
        CalculationPayload {
            left: left.map(String::from),
            operator: operator.map(String::from),
            right: right.map(String::from),
            expression: expression.map(String::from),
        }
    }

    #[test]
    fn valid_simple_payload() {
        let input = payload(Some(" 10.5 "), Some("+"), Some("2.25"), None)
            .validate()
            .unwrap();
        assert_eq!(input.mode, Mode::Simple);
        assert_eq!(input.left.as_deref(), Some("10.5"));
    }

    #[test]
    fn valid_expression_payload() {
        let input = payload(None, None, None, Some(" sqrt(81)^2 "))
            .validate()
            .unwrap();
        assert_eq!(input.mode, Mode::Expression);
        assert_eq!(input.expression.as_deref(), Some("sqrt(81)^2"));
    }

    #[test]
    fn both_modes_at_once_are_rejected() {
        assert_eq!(
            payload(Some("1"), Some("+"), Some("2"), Some("1+2")).validate(),
            Err(ValidationError::BothModes)
        );
    }

    #[test]
    fn empty_payload_is_rejected() {
        assert_eq!(
            payload(None, None, None, None).validate(),
            Err(ValidationError::MissingPayload)
        );
        // Whitespace-only fields count as absent.
        assert_eq!(
            payload(Some("  "), None, None, Some("  ")).validate(),
            Err(ValidationError::MissingPayload)
        );
    }

    #[test_case(None, Some("+"), Some("2") => Err(ValidationError::MissingLeft))]
    #[test_case(Some("1"), None, Some("2") => Err(ValidationError::MissingOperator))]
    #[test_case(Some("1"), Some("+"), None => Err(ValidationError::MissingRight))]
    fn partial_simple_payloads(
        left: Option<&str>,
        operator: Option<&str>,
        right: Option<&str>,
    ) -> Result<CalculationInput, ValidationError> {
        payload(left, operator, right, None).validate()
    }

    #[test_case("%" ; "unknown operator")]
    #[test_case("**" ; "doubled operator")]
    fn operators_outside_the_set(operator: &str) {
        assert_eq!(
            payload(Some("1"), Some(operator), Some("2"), None).validate(),
            Err(ValidationError::InvalidOperator)
        );
    }

    #[test]
    fn non_numeric_operands() {
        assert_eq!(
            payload(Some("abc"), Some("+"), Some("2"), None).validate(),
            Err(ValidationError::NonNumericOperand("left"))
        );
        assert_eq!(
            payload(Some("1"), Some("+"), Some("1.2.3"), None).validate(),
            Err(ValidationError::NonNumericOperand("right"))
        );
    }

    #[test_case("0" ; "bare zero")]
    #[test_case("0.000" ; "zero with fraction digits")]
    #[test_case("-0.0" ; "negative zero")]
    #[test_case("+0" ; "positive signed zero")]
    fn zero_divisors_are_rejected_up_front(divisor: &str) {
        assert_eq!(
            payload(Some("1"), Some("/"), Some(divisor), None).validate(),
            Err(ValidationError::DivisionByZero)
        );
    }

    #[test]
    fn nonzero_divisor_passes() {
        assert!(payload(Some("1"), Some("/"), Some("0.5"), None)
            .validate()
            .is_ok());
    }

    #[test_case("2 + $" => Err(ValidationError::UnsupportedCharacters))]
    #[test_case("2 = 3" => Err(ValidationError::UnsupportedCharacters))]
    #[test_case("(2+3" => Err(ValidationError::UnbalancedParentheses))]
    #[test_case(")2+3(" => Err(ValidationError::UnbalancedParentheses) ; "balance dips negative")]
    #[test_case("sqrt(-4)" => Err(ValidationError::NegativeSqrt))]
    #[test_case("SQRT( - 9 )" => Err(ValidationError::NegativeSqrt) ; "case and spacing insensitive")]
    #[test_case("sqrt(4)" => Ok(()))]
    fn expression_rules(expression: &str) -> Result<(), ValidationError> {
        payload(None, None, None, Some(expression))
            .validate()
            .map(|_| ())
    }

    #[test]
    fn overlong_expressions_are_rejected() {
        let expression = "1+".repeat(MAX_EXPRESSION_LENGTH / 2) + "1";
        assert_eq!(
            payload(None, None, None, Some(&expression)).validate(),
            Err(ValidationError::ExpressionTooLong)
        );
    }
}
