use crate::decimal::DecimalMath;
use crate::error::Error;
use crate::lexer::Lexer;
use crate::parser::{evaluate_postfix, to_postfix};
use crate::registry::{FunctionRegistry, OperatorRegistry};

/// The full expression pipeline: tokenize, reorder to postfix, evaluate.
///
/// Owns the immutable operator/function registries and the arithmetic
/// context; a single evaluator can be shared freely across threads because
/// nothing in it mutates after construction, and every call to
/// [`evaluate`](ExpressionEvaluator::evaluate) is independent.
///
/// # Examples
/// ```
/// use tickertape::ExpressionEvaluator;
///
/// let evaluator = ExpressionEvaluator::default();
/// assert_eq!(evaluator.evaluate("(2+3)*4"), Ok("20".to_string()));
/// assert_eq!(evaluator.evaluate("sqrt(81)^2"), Ok("81".to_string()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExpressionEvaluator {
    operators: OperatorRegistry,
    functions: FunctionRegistry,
    math: DecimalMath,
}

impl ExpressionEvaluator {
    /// Build an evaluator from explicit registries and arithmetic context.
    #[must_use]
    pub fn new(
        operators: OperatorRegistry,
        functions: FunctionRegistry,
        math: DecimalMath,
    ) -> Self {
        ExpressionEvaluator {
            operators,
            functions,
            math,
        }
    }

    /// Evaluate an infix expression into a normalized decimal string.
    ///
    /// Identical inputs always produce identical outputs; there is no
    /// floating point anywhere in the pipeline.
    pub fn evaluate(&self, expression: &str) -> Result<String, Error> {
        let tokens = Lexer::new(expression, &self.operators).tokenize()?;
        let rpn = to_postfix(&tokens, &self.operators, &self.functions)?;
        evaluate_postfix(&rpn, &self.operators, &self.functions, &self.math)
    }

    /// The operator registry backing this evaluator.
    #[must_use]
    pub fn operators(&self) -> &OperatorRegistry {
        &self.operators
    }

    /// The function registry backing this evaluator.
    #[must_use]
    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    /// The arithmetic context backing this evaluator.
    #[must_use]
    pub fn math(&self) -> &DecimalMath {
        &self.math
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("3 + 5" => Ok("8".to_string()))]
    #[test_case("2 - 5" => Ok("-3".to_string()))]
    #[test_case("2 * 5" => Ok("10".to_string()))]
    #[test_case("10 / 5" => Ok("2".to_string()))]
    #[test_case("2 ^ 3" => Ok("8".to_string()))]
    #[test_case("-3" => Ok("-3".to_string()))]
    #[test_case("25 + -3" => Ok("22".to_string()))]
    #[test_case("25 - -3" => Ok("28".to_string()))]
    #[test_case("3 + 5 * 2" => Ok("13".to_string()))]
    #[test_case("sqrt(9)" => Ok("3".to_string()))]
    #[test_case("0.1 + 0.2" => Ok("0.3".to_string()) ; "no binary float drift")]
    #[test_case("1 / 3 * 3" => Ok("0.999999999999".to_string()) ; "truncation is visible at scale")]
    fn evaluate(expression: &str) -> Result<String, Error> {
        ExpressionEvaluator::default().evaluate(expression)
    }

    #[test]
    fn simple_and_expression_modes_agree() {
        let evaluator = ExpressionEvaluator::default();
        let via_registry = evaluator
            .operators()
            .apply('+', "10.5", "2.25", evaluator.math());
        let via_expression = evaluator.evaluate("10.5+2.25");
        assert_eq!(via_registry, via_expression);
        assert_eq!(via_expression, Ok("12.75".to_string()));
    }

    #[test]
    fn failures_surface_with_their_classification() {
        let evaluator = ExpressionEvaluator::default();
        assert_eq!(evaluator.evaluate(""), Err(Error::EmptyExpression));
        assert_eq!(evaluator.evaluate("1/0"), Err(Error::DivisionByZero));
        assert_eq!(evaluator.evaluate("sqrt(-4)"), Err(Error::NegativeSqrt));
        assert_eq!(
            evaluator.evaluate("(2+3"),
            Err(Error::UnbalancedParentheses)
        );
    }

    #[test]
    fn determinism() {
        let evaluator = ExpressionEvaluator::default();
        let first = evaluator.evaluate("sqrt((((9*9)/12)+(13-4))*2)^2");
        let second = evaluator.evaluate("sqrt((((9*9)/12)+(13-4))*2)^2");
        assert_eq!(first, second);
    }
}
