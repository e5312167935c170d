/// Possible tokens to find in an expression string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A numeric literal, carried as a decimal string. The lexer folds a
    /// resolved unary minus into the literal, so the string may start
    /// with `-`.
    Number(String),
    /// A binary operator symbol (`+`, `-`, `*`, `/`, `^`)
    Operator(char),
    /// A function name, lower-cased by the lexer. Whether the name is
    /// actually registered is checked by the parser, not the lexer.
    Function(String),
    /// Left parenthesis
    LeftParen,
    /// Right parenthesis
    RightParen,
    /// Argument separator inside a function call
    Comma,
}

/// Operator associativity, used by the shunting-yard precedence comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    /// Resolves left to right: `a - b - c` is `(a - b) - c`
    Left,
    /// Resolves right to left: `a ^ b ^ c` is `a ^ (b ^ c)`
    Right,
}
