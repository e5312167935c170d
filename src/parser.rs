use crate::decimal::DecimalMath;
use crate::error::Error;
use crate::registry::{FunctionRegistry, OperatorRegistry};
use crate::token::{Associativity, Token};

/// Reorder an infix token sequence into postfix (RPN) with the
/// shunting-yard algorithm, parameterized by the operator and function
/// registries.
///
/// A function sitting on the operator stack is always popped before a new
/// operator is pushed -- functions bind tighter than any trailing operator.
/// That rule is spelled out here rather than encoded as a pseudo-precedence
/// so that future n-ary functions cannot be silently mishandled.
pub fn to_postfix(
    tokens: &[Token],
    operators: &OperatorRegistry,
    functions: &FunctionRegistry,
) -> Result<Vec<Token>, Error> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Token> = Vec::new();

    for token in tokens {
        match token {
            Token::Number(_) => output.push(token.clone()),

            Token::Function(name) => {
                if !functions.supports(name) {
                    return Err(Error::UnsupportedFunction(name.clone()));
                }
                stack.push(token.clone());
            }

            Token::Comma => {
                // A comma only resolves the current argument; it must find
                // the call's left parenthesis below it.
                while stack.last().map_or(false, |top| *top != Token::LeftParen) {
                    if let Some(popped) = stack.pop() {
                        output.push(popped);
                    }
                }
                if stack.is_empty() {
                    return Err(Error::MisplacedComma);
                }
            }

            Token::Operator(symbol) => {
                let current = operators
                    .get(*symbol)
                    .ok_or_else(|| Error::UnsupportedOperator(symbol.to_string()))?;

                while let Some(top) = stack.last() {
                    let pop_top = match top {
                        Token::Function(_) => true,
                        Token::Operator(top_symbol) => {
                            let top_precedence = operators
                                .get(*top_symbol)
                                .map_or(0, |descriptor| descriptor.precedence);
                            match current.associativity {
                                Associativity::Left => current.precedence <= top_precedence,
                                Associativity::Right => current.precedence < top_precedence,
                            }
                        }
                        _ => false,
                    };
                    if !pop_top {
                        break;
                    }
                    if let Some(popped) = stack.pop() {
                        output.push(popped);
                    }
                }
                stack.push(token.clone());
            }

            Token::LeftParen => stack.push(Token::LeftParen),

            Token::RightParen => {
                loop {
                    match stack.pop() {
                        None => return Err(Error::UnbalancedParentheses),
                        Some(Token::LeftParen) => break,
                        Some(popped) => output.push(popped),
                    }
                }
                // The parenthesis closed a call: emit the function now.
                if matches!(stack.last(), Some(Token::Function(_))) {
                    if let Some(function) = stack.pop() {
                        output.push(function);
                    }
                }
            }
        }
    }

    while let Some(token) = stack.pop() {
        match token {
            Token::LeftParen | Token::RightParen => return Err(Error::UnbalancedParentheses),
            other => output.push(other),
        }
    }

    Ok(output)
}

/// Walk a postfix sequence with a value stack, dispatching operators and
/// functions through the registries, and return the normalized result.
pub fn evaluate_postfix(
    postfix: &[Token],
    operators: &OperatorRegistry,
    functions: &FunctionRegistry,
    math: &DecimalMath,
) -> Result<String, Error> {
    let mut stack: Vec<String> = Vec::new();

    for token in postfix {
        match token {
            Token::Number(value) => stack.push(value.clone()),

            Token::Operator(symbol) => {
                let right = stack
                    .pop()
                    .ok_or(Error::MalformedExpression(" near operator token"))?;
                let left = stack
                    .pop()
                    .ok_or(Error::MalformedExpression(" near operator token"))?;
                stack.push(operators.apply(*symbol, &left, &right, math)?);
            }

            Token::Function(name) => {
                // Every registered function takes one argument today; the
                // arity check keeps the stack discipline honest for future
                // n-ary entries.
                if functions.arity(name) != 1 {
                    return Err(Error::MalformedExpression(" near function token"));
                }
                let argument = stack
                    .pop()
                    .ok_or(Error::MalformedExpression(" near function token"))?;
                stack.push(functions.apply(name, &argument, math)?);
            }

            // Parens and commas never survive the shunting yard.
            _ => return Err(Error::MalformedExpression("")),
        }
    }

    if stack.len() != 1 {
        return Err(Error::MalformedExpression(""));
    }

    Ok(math.normalize(&stack[0]))
}
