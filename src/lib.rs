#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(
    clippy::needless_return,
    clippy::missing_docs_in_private_items,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc
)]

//! Tickertape, an exact-decimal calculator engine with a calculation
//! history.
//!
//! This crate evaluates arithmetic embedded in strings without ever going
//! through binary floating point: every value is a decimal string backed
//! by fixed-scale big-integer arithmetic (12 fractional digits by
//! default), so `0.1 + 0.2` is exactly `0.3`. The easiest way to use it is
//! the [`evaluate`] function:
//!
//! ```
//! assert_eq!(tickertape::evaluate("3 + 5 * 2"), Ok("13".to_string()));
//! assert_eq!(tickertape::evaluate("0.1 + 0.2"), Ok("0.3".to_string()));
//! ```
//!
//! Calculations can also run through the [`CalculationEngine`], which
//! accepts either a free-form expression or a single operand/operator/
//! operand triple ("simple mode"), and produces an outcome ready for
//! persistence in a [`HistoryStore`]:
//!
//! ```
//! use tickertape::{CalculationEngine, CalculationInput, HistoryStore};
//!
//! let engine = CalculationEngine::default();
//! let history = HistoryStore::default();
//!
//! let outcome = engine
//!     .evaluate(&CalculationInput::expression("sqrt(81)^2"))
//!     .unwrap();
//! assert_eq!(outcome.result, "81");
//!
//! let record = history.record(outcome);
//! assert_eq!(history.list()[0].id, record.id);
//! ```
//!
//! Untrusted payloads go through [`CalculationPayload::validate`] first,
//! which enforces mode exclusivity, the expression character class and
//! parenthesis balance before anything reaches the engine.
//!
//! # Language definition
//!
//! An expression can contain:
//!
//! - decimal literal values: `12`, `0.25`, `-3`, `.5`;
//! - left and right parenthesis, and commas between function arguments;
//! - the operators `+`, `-`, `*`, `/` and `^` (integer exponents only,
//!   `^` is right-associative);
//! - function calls, currently just `sqrt(x)`, matched case-insensitively.
//!
//! A `-` at the start of the stream, or right after an operator, `(` or
//! `,`, is a unary minus. Any other symbol is rejected with a classified
//! [`Error`].
//!
//! # Technical details
//!
//! The pipeline is lexer → shunting-yard → postfix stack machine, with
//! operators and functions dispatched through immutable registries built
//! at startup. Evaluation is pure and stateless per call: identical inputs
//! always produce identical outputs, and an evaluator can be shared across
//! threads without locking.

#[macro_use]
extern crate lazy_static;

mod decimal;
mod engine;
mod error;
mod expr;
mod history;
mod lexer;
mod parser;
mod registry;
mod token;
mod validate;

pub use decimal::{DecimalMath, DEFAULT_SCALE};
pub use engine::{CalculationEngine, CalculationInput, CalculationOutcome, Metadata, Mode};
pub use error::Error;
pub use expr::ExpressionEvaluator;
pub use history::{CalculationRecord, HistoryStore};
pub use lexer::Lexer;
pub use parser::{evaluate_postfix, to_postfix};
pub use registry::{
    FunctionDescriptor, FunctionHandler, FunctionRegistry, OperatorDescriptor, OperatorHandler,
    OperatorRegistry,
};
pub use token::{Associativity, Token};
pub use validate::{CalculationPayload, ValidationError, MAX_EXPRESSION_LENGTH};

lazy_static! {
    static ref SHARED_EVALUATOR: ExpressionEvaluator = ExpressionEvaluator::default();
}

/// Evaluate a single expression with the default registries and scale.
///
/// Returns the normalized decimal result, or the first classified failure
/// encountered in the pipeline.
///
/// # Example
///
/// ```
/// use tickertape::{evaluate, Error};
///
/// assert_eq!(evaluate("45 - 2^3"), Ok("37".to_string()));
/// assert_eq!(evaluate("2^3^2"), Ok("512".to_string()));
/// assert_eq!(evaluate("1/0"), Err(Error::DivisionByZero));
/// ```
pub fn evaluate(expression: &str) -> Result<String, Error> {
    SHARED_EVALUATOR.evaluate(expression)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_evaluator_matches_a_fresh_one() {
        let fresh = ExpressionEvaluator::default();
        assert_eq!(evaluate("(2+3)*4"), fresh.evaluate("(2+3)*4"));
        assert_eq!(evaluate("(2+3)*4"), Ok("20".to_string()));
    }

    #[test]
    fn error_messages_are_user_facing() {
        assert_eq!(
            evaluate("").unwrap_err().to_string(),
            "Expression cannot be empty."
        );
        assert_eq!(
            evaluate("2$3").unwrap_err().to_string(),
            "Unsupported token [$] in expression."
        );
        assert_eq!(
            evaluate("sqrt(-4)").unwrap_err().to_string(),
            "Square root of a negative number is not supported."
        );
        assert_eq!(
            evaluate("(1+2").unwrap_err().to_string(),
            "Expression has unbalanced parentheses."
        );
        assert_eq!(
            evaluate("foo(1)").unwrap_err().to_string(),
            "Unsupported function [foo]."
        );
    }
}
