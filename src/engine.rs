use crate::error::Error;
use crate::expr::ExpressionEvaluator;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// How a calculation was submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// One binary operator applied to two operands, bypassing the parser
    Simple,
    /// A free-form infix expression through the full pipeline
    Expression,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Simple => write!(f, "simple"),
            Mode::Expression => write!(f, "expression"),
        }
    }
}

/// A calculation request after payload validation: one mode plus the
/// fields that mode needs. Fields the mode does not use stay `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalculationInput {
    /// Which evaluation path this input takes
    pub mode: Mode,
    /// Simple-mode left operand
    pub left: Option<String>,
    /// Simple-mode operator symbol
    pub operator: Option<String>,
    /// Simple-mode right operand
    pub right: Option<String>,
    /// Expression-mode infix string
    pub expression: Option<String>,
}

impl CalculationInput {
    /// A simple-mode input from an operand/operator/operand triple.
    #[must_use]
    pub fn simple(left: &str, operator: &str, right: &str) -> Self {
        CalculationInput {
            mode: Mode::Simple,
            left: Some(left.trim().to_string()),
            operator: Some(operator.trim().to_string()),
            right: Some(right.trim().to_string()),
            expression: None,
        }
    }

    /// An expression-mode input from a raw infix string.
    #[must_use]
    pub fn expression(expression: &str) -> Self {
        CalculationInput {
            mode: Mode::Expression,
            left: None,
            operator: None,
            right: None,
            expression: Some(expression.trim().to_string()),
        }
    }
}

/// Fixed metadata attached to every outcome: how the input arrived and
/// what the registries currently support.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// `"simple"` or `"expression"`
    pub input_type: String,
    /// The function registry's key set, in registration order
    pub supported_functions: Vec<String>,
    /// The operator registry's key set, in registration order
    pub supported_operators: Vec<String>,
}

/// The persistable result of one calculation: echoed inputs, the
/// normalized decimal result and the metadata payload. Shaped for direct
/// JSON serialization by an HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationOutcome {
    /// How the calculation was submitted
    pub mode: Mode,
    /// The evaluated expression, expression mode only
    pub expression: Option<String>,
    /// Left operand, simple mode only
    pub left_operand: Option<String>,
    /// Operator symbol, simple mode only
    pub operator: Option<String>,
    /// Right operand, simple mode only
    pub right_operand: Option<String>,
    /// The normalized decimal result
    pub result: String,
    /// Input provenance and registry key sets
    pub metadata: Metadata,
}

/// Top-level calculation orchestration.
///
/// Expression mode feeds the full tokenizer/parser/evaluator pipeline;
/// simple mode checks the operator and applies the operator table
/// directly. Either way the outcome carries the registries' key sets so
/// callers can enumerate what the engine supports.
///
/// ```
/// use tickertape::{CalculationEngine, CalculationInput};
///
/// let engine = CalculationEngine::default();
/// let outcome = engine
///     .evaluate(&CalculationInput::simple("10.5", "+", "2.25"))
///     .unwrap();
/// assert_eq!(outcome.result, "12.75");
/// assert_eq!(outcome.metadata.supported_functions, vec!["sqrt"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CalculationEngine {
    evaluator: ExpressionEvaluator,
}

impl CalculationEngine {
    /// Build an engine around an existing evaluator.
    #[must_use]
    pub fn new(evaluator: ExpressionEvaluator) -> Self {
        CalculationEngine { evaluator }
    }

    /// The evaluator (and through it, the registries) behind this engine.
    #[must_use]
    pub fn evaluator(&self) -> &ExpressionEvaluator {
        &self.evaluator
    }

    /// Run one calculation and shape its outcome.
    ///
    /// # Errors
    /// Any [`Error`] from the evaluation pipeline; additionally
    /// [`Error::IncompletePayload`] when a simple-mode input is missing one
    /// of its three fields and [`Error::UnsupportedOperator`] when the
    /// operator is not registered.
    pub fn evaluate(&self, input: &CalculationInput) -> Result<CalculationOutcome, Error> {
        if input.mode == Mode::Expression {
            if let Some(expression) = &input.expression {
                debug!(mode = %input.mode, expression = %expression, "evaluating calculation");
                let result = self.evaluator.evaluate(expression)?;
                return Ok(self.outcome(input, result));
            }
        }

        let (left, operator, right) = match (&input.left, &input.operator, &input.right) {
            (Some(left), Some(operator), Some(right)) => (left, operator, right),
            _ => return Err(Error::IncompletePayload),
        };

        let symbol = single_symbol(operator)
            .filter(|symbol| self.evaluator.operators().supports(*symbol))
            .ok_or_else(|| Error::UnsupportedOperator(operator.clone()))?;

        debug!(mode = %input.mode, operator = %symbol, "evaluating calculation");
        let result =
            self.evaluator
                .operators()
                .apply(symbol, left, right, self.evaluator.math())?;
        Ok(self.outcome(input, result))
    }

    fn outcome(&self, input: &CalculationInput, result: String) -> CalculationOutcome {
        CalculationOutcome {
            mode: input.mode,
            expression: input.expression.clone(),
            left_operand: input.left.clone(),
            operator: input.operator.clone(),
            right_operand: input.right.clone(),
            result,
            metadata: Metadata {
                input_type: input.mode.to_string(),
                supported_functions: self.evaluator.functions().names(),
                supported_operators: self.evaluator.operators().symbols(),
            },
        }
    }
}

fn single_symbol(operator: &str) -> Option<char> {
    let mut chars = operator.chars();
    match (chars.next(), chars.next()) {
        (Some(symbol), None) => Some(symbol),
        _ => None,
    }
}
