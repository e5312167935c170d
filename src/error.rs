use thiserror::Error;

/// Everything that can go wrong while evaluating a calculation.
///
/// Every variant is terminal for the current evaluation: the first failure
/// aborts the pipeline and is the one reported, with no partial result.
/// The messages are user-facing; an HTTP layer is expected to surface them
/// verbatim in a 422-style response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The expression produced no tokens at all
    #[error("Expression cannot be empty.")]
    EmptyExpression,

    /// A character outside the recognized grammar
    #[error("Unsupported token [{0}] in expression.")]
    UnsupportedToken(char),

    /// A numeric literal with more than one decimal point, or no digits
    #[error("Invalid numeric literal in expression.")]
    MalformedNumber,

    /// A function name that is not present in the function registry
    #[error("Unsupported function [{0}].")]
    UnsupportedFunction(String),

    /// A comma outside any function call's parenthesis scope
    #[error("Misplaced comma in expression.")]
    MisplacedComma,

    /// Mismatched or unclosed parentheses
    #[error("Expression has unbalanced parentheses.")]
    UnbalancedParentheses,

    /// The postfix stack ran dry under an operator/function, or more than
    /// one value was left at the end. The context string distinguishes the
    /// three spots this can happen (`""`, `" near operator token"`,
    /// `" near function token"`).
    #[error("Malformed expression{0}.")]
    MalformedExpression(&'static str),

    /// An operator symbol that is not in the operator registry. Only
    /// reachable through simple mode, which bypasses the lexer.
    #[error("Unsupported operator [{0}].")]
    UnsupportedOperator(String),

    /// Right operand of `/` normalizes to zero
    #[error("Division by zero is not allowed.")]
    DivisionByZero,

    /// Non-integer exponent to `^`
    #[error("Only integer exponents are supported.")]
    UnsupportedExponent,

    /// Square root of a negative operand
    #[error("Square root of a negative number is not supported.")]
    NegativeSqrt,

    /// A simple-mode input with one of left/operator/right missing
    #[error("Incomplete simple calculation payload.")]
    IncompletePayload,
}
