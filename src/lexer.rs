use crate::error::Error;
use crate::registry::OperatorRegistry;
use crate::token::Token;

/// An helper struct for scanning an expression string into tokens.
///
/// The lexer resolves unary minus using its token context: at the start of
/// the stream, or right after an operator, a left parenthesis or a comma,
/// a `-` followed by a numeric literal is folded into a single negated
/// [`Token::Number`]; a `-` followed by anything else becomes the pair
/// `0 -` so that `-x` still parses as a subtraction. Function names are
/// lower-cased here but validated later by the parser.
pub struct Lexer<'a> {
    chars: Vec<char>,
    index: usize,
    operators: &'a OperatorRegistry,
}

impl<'a> Lexer<'a> {
    pub fn new(expression: &str, operators: &'a OperatorRegistry) -> Lexer<'a> {
        Lexer {
            chars: expression.chars().collect(),
            index: 0,
            operators,
        }
    }

    /// Scan the whole input into a flat token sequence.
    pub fn tokenize(mut self) -> Result<Vec<Token>, Error> {
        let mut tokens = Vec::new();

        while let Some(character) = self.current() {
            if character.is_whitespace() {
                self.index += 1;
                continue;
            }

            if character.is_ascii_digit() || character == '.' {
                let number = self.consume_number()?;
                tokens.push(Token::Number(number));
                continue;
            }

            if character.is_ascii_alphabetic() {
                let word = self.consume_word();
                tokens.push(Token::Function(word.to_ascii_lowercase()));
                continue;
            }

            if self.operators.supports(character) {
                if character == '-' && unary_context(&tokens) {
                    let next = self.peek_next_non_space(self.index + 1);
                    if next.map_or(false, |c| c.is_ascii_digit() || c == '.') {
                        // The literal must start right after the sign; an
                        // intervening space fails as a malformed number.
                        self.index += 1;
                        let number = self.consume_number()?;
                        tokens.push(Token::Number(format!("-{}", number)));
                        continue;
                    }

                    tokens.push(Token::Number("0".to_string()));
                }

                tokens.push(Token::Operator(character));
                self.index += 1;
                continue;
            }

            match character {
                '(' => tokens.push(Token::LeftParen),
                ')' => tokens.push(Token::RightParen),
                ',' => tokens.push(Token::Comma),
                other => return Err(Error::UnsupportedToken(other)),
            }
            self.index += 1;
        }

        if tokens.is_empty() {
            return Err(Error::EmptyExpression);
        }

        Ok(tokens)
    }

    fn current(&self) -> Option<char> {
        self.chars.get(self.index).copied()
    }

    /// Consume a run of digits with at most one decimal point, starting at
    /// the current position.
    fn consume_number(&mut self) -> Result<String, Error> {
        let mut number = String::new();
        let mut dot_count = 0;

        while let Some(character) = self.current() {
            if !character.is_ascii_digit() && character != '.' {
                break;
            }
            if character == '.' {
                dot_count += 1;
                if dot_count > 1 {
                    return Err(Error::MalformedNumber);
                }
            }
            number.push(character);
            self.index += 1;
        }

        if number.is_empty() || number == "." {
            return Err(Error::MalformedNumber);
        }

        Ok(number)
    }

    /// Consume a run of ASCII letters starting at the current position.
    fn consume_word(&mut self) -> String {
        let mut word = String::new();
        while let Some(character) = self.current() {
            if !character.is_ascii_alphabetic() {
                break;
            }
            word.push(character);
            self.index += 1;
        }
        word
    }

    fn peek_next_non_space(&self, start: usize) -> Option<char> {
        self.chars[start.min(self.chars.len())..]
            .iter()
            .copied()
            .find(|c| !c.is_whitespace())
    }
}

/// Whether a `-` read next would be a unary minus: true at the start of
/// the stream and after an operator, a left parenthesis or a comma.
fn unary_context(tokens: &[Token]) -> bool {
    match tokens.last() {
        None => true,
        Some(Token::Operator(_)) | Some(Token::LeftParen) | Some(Token::Comma) => true,
        Some(_) => false,
    }
}
