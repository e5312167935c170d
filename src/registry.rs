use crate::decimal::DecimalMath;
use crate::error::Error;
use crate::token::Associativity;
use indexmap::IndexMap;

/// Handler applying a binary operator through the arithmetic layer.
pub type OperatorHandler = fn(&DecimalMath, &str, &str) -> Result<String, Error>;

/// Handler applying a unary function through the arithmetic layer.
pub type FunctionHandler = fn(&DecimalMath, &str) -> Result<String, Error>;

/// A binary operator: its symbol, shunting-yard precedence, associativity
/// and arithmetic dispatch.
#[derive(Debug, Clone)]
pub struct OperatorDescriptor {
    /// The operator's symbol as it appears in expressions
    pub symbol: char,
    /// Shunting-yard precedence; higher binds tighter
    pub precedence: u8,
    /// Left or right associativity
    pub associativity: Associativity,
    handler: OperatorHandler,
}

/// A named function: its lowercase name, argument count and arithmetic
/// dispatch.
#[derive(Debug, Clone)]
pub struct FunctionDescriptor {
    /// Lowercase registered name
    pub name: &'static str,
    /// Number of arguments the function consumes from the value stack
    pub arity: usize,
    handler: FunctionHandler,
}

/// Immutable table of the supported binary operators.
///
/// Built once at startup and shared by reference into the lexer, parser and
/// evaluator; it is never mutated afterwards. Iteration order is insertion
/// order, so [`symbols`](OperatorRegistry::symbols) enumerates
/// `+ - * / ^` deterministically for the metadata payload.
#[derive(Debug, Clone)]
pub struct OperatorRegistry {
    table: IndexMap<char, OperatorDescriptor>,
}

impl Default for OperatorRegistry {
    fn default() -> Self {
        let mut registry = OperatorRegistry {
            table: IndexMap::new(),
        };
        registry.register('+', 2, Associativity::Left, |math, l, r| math.add(l, r));
        registry.register('-', 2, Associativity::Left, |math, l, r| {
            math.subtract(l, r)
        });
        registry.register('*', 3, Associativity::Left, |math, l, r| {
            math.multiply(l, r)
        });
        registry.register('/', 3, Associativity::Left, |math, l, r| math.divide(l, r));
        registry.register('^', 4, Associativity::Right, |math, l, r| math.power(l, r));
        registry
    }
}

impl OperatorRegistry {
    /// Add an operator to the table. Used during construction only; the
    /// registry is frozen once handed to the evaluator.
    pub fn register(
        &mut self,
        symbol: char,
        precedence: u8,
        associativity: Associativity,
        handler: OperatorHandler,
    ) {
        self.table.insert(
            symbol,
            OperatorDescriptor {
                symbol,
                precedence,
                associativity,
                handler,
            },
        );
    }

    /// Whether `symbol` is a registered operator.
    #[must_use]
    pub fn supports(&self, symbol: char) -> bool {
        self.table.contains_key(&symbol)
    }

    /// Look up the descriptor for `symbol`. Unknown symbols get `None`
    /// rather than a silent default precedence.
    #[must_use]
    pub fn get(&self, symbol: char) -> Option<&OperatorDescriptor> {
        self.table.get(&symbol)
    }

    /// Apply `symbol` to two decimal-string operands.
    ///
    /// # Errors
    /// [`Error::UnsupportedOperator`] for an unregistered symbol; arithmetic
    /// failures are forwarded unchanged.
    pub fn apply(
        &self,
        symbol: char,
        left: &str,
        right: &str,
        math: &DecimalMath,
    ) -> Result<String, Error> {
        let descriptor = self
            .get(symbol)
            .ok_or_else(|| Error::UnsupportedOperator(symbol.to_string()))?;
        (descriptor.handler)(math, left, right)
    }

    /// The registered operator symbols, in registration order.
    #[must_use]
    pub fn symbols(&self) -> Vec<String> {
        self.table.keys().map(|symbol| symbol.to_string()).collect()
    }
}

/// Immutable, case-insensitive table of the supported functions.
///
/// Ships with a single entry, `sqrt` (arity 1). The table is open: new
/// unary functions register here without any parser change, because the
/// parser only asks `supports`/`arity` and dispatches through the stored
/// handler.
#[derive(Debug, Clone)]
pub struct FunctionRegistry {
    table: IndexMap<&'static str, FunctionDescriptor>,
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        let mut registry = FunctionRegistry {
            table: IndexMap::new(),
        };
        registry.register("sqrt", 1, |math, argument| math.sqrt(argument));
        registry
    }
}

impl FunctionRegistry {
    /// Add a function to the table. `name` must already be lowercase.
    pub fn register(&mut self, name: &'static str, arity: usize, handler: FunctionHandler) {
        self.table.insert(
            name,
            FunctionDescriptor {
                name,
                arity,
                handler,
            },
        );
    }

    /// Whether `name` is a registered function, matched case-insensitively.
    #[must_use]
    pub fn supports(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Look up the descriptor for `name`, matched case-insensitively.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FunctionDescriptor> {
        let lowered = name.to_ascii_lowercase();
        self.table.get(lowered.as_str())
    }

    /// The declared argument count for `name`, or 0 when unregistered.
    #[must_use]
    pub fn arity(&self, name: &str) -> usize {
        self.get(name).map_or(0, |descriptor| descriptor.arity)
    }

    /// Apply `name` to a single decimal-string argument.
    ///
    /// # Errors
    /// [`Error::UnsupportedFunction`] for an unregistered name; arithmetic
    /// failures are forwarded unchanged.
    pub fn apply(&self, name: &str, argument: &str, math: &DecimalMath) -> Result<String, Error> {
        let descriptor = self
            .get(name)
            .ok_or_else(|| Error::UnsupportedFunction(name.to_string()))?;
        (descriptor.handler)(math, argument)
    }

    /// The registered function names, in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.table.keys().map(|name| (*name).to_string()).collect()
    }
}
