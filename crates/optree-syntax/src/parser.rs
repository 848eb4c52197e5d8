use crate::TokenKind;
use crate::context::ParserConfig;
use crate::error::{ParseError, ParseResult};
use crate::lexer::{Lexer, Token};
use crate::tree::{BinaryOp, Node, UnaryOp};
use rowan::{TextRange, TextSize};

/// A recursive descent parser over a [`Lexer`].
///
/// Precedence, loosest first:
///
/// | level    | operators                                  | assoc |
/// |----------|--------------------------------------------|-------|
/// | equation | `=`                                        | left  |
/// | additive | `+ - \pm`                                  | left  |
/// | term     | `* / \times \div \cdot`                    | left  |
/// | implicit | adjacent atoms                             | left  |
/// | unary    | prefix `- + \pm`                           | right |
/// | power    | `^`                                        | right |
/// | atom     | groups, `\frac`, `\sqrt`, `\left..\right`  |       |
///
/// Macro arguments follow TeX's one-token rule: a multi-digit number only
/// gives its first digit, so `\frac 12` is one half.
///
/// Parsing stops at the first error. Subtrees built so far are dropped on the
/// way out.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    /// One token lookahead.
    current: Token<'a>,
    depth: usize,
    max_depth: usize,
    max_tree_depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str, config: &ParserConfig) -> ParseResult<Self> {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token()?;
        Ok(Self {
            lexer,
            current,
            depth: 0,
            max_depth: config.max_depth,
            max_tree_depth: config.max_tree_depth,
        })
    }

    /// Parses the whole input into a single tree.
    pub fn parse(mut self) -> ParseResult<Node> {
        let node = self.parse_equation()?;
        if self.peek() != TokenKind::End {
            return Err(self.error(format!(
                "unexpected {} after a complete expression",
                self.peek().describe()
            )));
        }
        let depth = node.depth();
        if depth > self.max_tree_depth {
            return Err(ParseError::resource(
                format!(
                    "expression tree is {depth} levels deep, more than {}",
                    self.max_tree_depth
                ),
                TextRange::up_to(self.current.range.end()),
            ));
        }
        Ok(node)
    }

    fn peek(&self) -> TokenKind {
        self.current.kind
    }

    /// Consumes the current token and returns it.
    fn bump(&mut self) -> ParseResult<Token<'a>> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::syntax(message, self.current.range)
    }

    /// Runs `f` one nesting level deeper.
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        if self.depth >= self.max_depth {
            return Err(ParseError::resource(
                format!("nesting deeper than {} levels", self.max_depth),
                self.current.range,
            ));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn parse_equation(&mut self) -> ParseResult<Node> {
        let mut left = self.parse_expression()?;
        while self.peek() == TokenKind::Equals {
            self.bump()?;
            let right = self.parse_expression()?;
            left = Node::binary(BinaryOp::Eq, left, right);
        }
        Ok(left)
    }

    fn parse_expression(&mut self) -> ParseResult<Node> {
        let mut left = self.parse_term()?;
        loop {
            let op = match self.peek() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                TokenKind::MacroPm => BinaryOp::PlusMinus,
                _ => return Ok(left),
            };
            self.bump()?;
            let right = self.parse_term()?;
            left = Node::binary(op, left, right);
        }
    }

    fn parse_term(&mut self) -> ParseResult<Node> {
        let mut left = self.parse_implicit()?;
        loop {
            let op = match self.peek() {
                TokenKind::Star | TokenKind::MacroTimes | TokenKind::MacroCdot => BinaryOp::Mul,
                TokenKind::Slash | TokenKind::MacroDiv => BinaryOp::Div,
                _ => return Ok(left),
            };
            self.bump()?;
            let right = self.parse_implicit()?;
            left = Node::binary(op, left, right);
        }
    }

    /// `2(-3)(-4)` folds into `((2 * -3) * -4)`.
    fn parse_implicit(&mut self) -> ParseResult<Node> {
        let mut left = self.parse_unary()?;
        while self.peek().starts_atom() {
            log::trace!("implicit multiplication at {:?}", self.current.range);
            let right = self.parse_power()?;
            left = Node::binary(BinaryOp::Mul, left, right);
        }
        Ok(left)
    }

    fn prefix_op(&self) -> Option<UnaryOp> {
        match self.peek() {
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Plus => Some(UnaryOp::Pos),
            TokenKind::MacroPm => Some(UnaryOp::PlusMinus),
            _ => None,
        }
    }

    fn parse_unary(&mut self) -> ParseResult<Node> {
        let Some(op) = self.prefix_op() else {
            return self.parse_power();
        };
        self.bump()?;
        let operand = self.nested(Self::parse_unary)?;
        Ok(Node::unary(op, operand))
    }

    fn parse_power(&mut self) -> ParseResult<Node> {
        let base = self.parse_atom()?;
        if self.peek() != TokenKind::Caret {
            return Ok(base);
        }
        self.bump()?;
        let exponent = self.nested(Self::parse_exponent)?;
        Ok(Node::binary(BinaryOp::Pow, base, exponent))
    }

    /// A signed power, so `x^-1` and `2^3^4 = 2^(3^4)` both work.
    fn parse_exponent(&mut self) -> ParseResult<Node> {
        let Some(op) = self.prefix_op() else {
            return self.parse_power();
        };
        self.bump()?;
        let operand = self.nested(Self::parse_exponent)?;
        Ok(Node::unary(op, operand))
    }

    fn parse_atom(&mut self) -> ParseResult<Node> {
        match self.peek() {
            TokenKind::Number | TokenKind::Ident | TokenKind::Wildcard => {
                let token = self.bump()?;
                leaf(&token)
            }
            TokenKind::LParen => self.nested(|p| p.parse_group(TokenKind::RParen)),
            TokenKind::LBrace => self.nested(|p| p.parse_group(TokenKind::RBrace)),
            TokenKind::LBracket => self.nested(|p| p.parse_group(TokenKind::RBracket)),
            TokenKind::MacroFrac => self.nested(Self::parse_frac),
            TokenKind::MacroSqrt => self.nested(Self::parse_sqrt),
            TokenKind::MacroLeft => self.nested(Self::parse_left_right),
            TokenKind::MacroRight => Err(self.error("\\right without a matching \\left")),
            TokenKind::Pipe => Err(self.error("'|' is only allowed after \\left or \\right")),
            other => Err(self.error(format!(
                "expected an operand, found {}",
                other.describe()
            ))),
        }
    }

    /// Parses `open expression close`, returning the expression unchanged.
    fn parse_group(&mut self, close: TokenKind) -> ParseResult<Node> {
        let open = self.bump()?;
        let inner = self.parse_expression()?;
        if self.peek() != close {
            return Err(self.error(format!(
                "expected {} to close {} at {:?}, found {}",
                close.describe(),
                open.kind.describe(),
                open.range,
                self.peek().describe()
            )));
        }
        self.bump()?;
        Ok(inner)
    }

    /// One macro argument: a digit, a letter, a wildcard, a braced group or
    /// another `\frac`/`\sqrt`.
    fn parse_argument(&mut self, name: &str) -> ParseResult<Node> {
        match self.peek() {
            TokenKind::Number => self.take_digit(),
            TokenKind::Ident | TokenKind::Wildcard => {
                let token = self.bump()?;
                leaf(&token)
            }
            TokenKind::LBrace => self.nested(|p| p.parse_group(TokenKind::RBrace)),
            TokenKind::MacroFrac => self.nested(Self::parse_frac),
            TokenKind::MacroSqrt => self.nested(Self::parse_sqrt),
            other => Err(self.error(format!(
                "missing argument for {name}, found {}",
                other.describe()
            ))),
        }
    }

    /// Takes the first digit of the current number and leaves the rest of it
    /// as the lookahead. A remainder such as `.5` has no leading digit and is
    /// taken whole.
    fn take_digit(&mut self) -> ParseResult<Node> {
        let token = self.current;
        let Some(digit) = token.text.bytes().next().filter(u8::is_ascii_digit) else {
            self.bump()?;
            return leaf(&token);
        };
        let value = f64::from(digit - b'0');
        let rest = &token.text[1..];
        if rest.is_empty() {
            self.bump()?;
        } else {
            let start = token.range.start() + TextSize::from(1);
            self.current = Token {
                kind: TokenKind::Number,
                text: rest,
                range: TextRange::new(start, token.range.end()),
            };
        }
        Ok(Node::number(value))
    }

    fn parse_frac(&mut self) -> ParseResult<Node> {
        self.bump()?; // Consume \frac
        let numerator = self.parse_argument("\\frac")?;
        let denominator = self.parse_argument("\\frac")?;
        Ok(Node::fraction(numerator, denominator))
    }

    fn parse_sqrt(&mut self) -> ParseResult<Node> {
        self.bump()?; // Consume \sqrt
        let index = if self.peek() == TokenKind::LBracket {
            Some(self.nested(|p| p.parse_group(TokenKind::RBracket))?)
        } else {
            None
        };
        let radicand = self.parse_argument("\\sqrt")?;
        Ok(Node::root(index, radicand))
    }

    fn parse_left_right(&mut self) -> ParseResult<Node> {
        let left = self.bump()?; // Consume \left
        let open = self.parse_delimiter("\\left")?;
        let inner = self.parse_expression()?;

        if self.peek() != TokenKind::MacroRight {
            return Err(self.error(format!(
                "expected \\right to close \\left at {:?}, found {}",
                left.range,
                self.peek().describe()
            )));
        }
        self.bump()?; // Consume \right
        let close = self.parse_delimiter("\\right")?;

        match (open.kind, close.kind) {
            (TokenKind::LParen, TokenKind::RParen) | (TokenKind::LBracket, TokenKind::RBracket) => {
                Ok(inner)
            }
            (TokenKind::Pipe, TokenKind::Pipe) => Ok(Node::abs(inner)),
            _ => Err(ParseError::syntax(
                format!(
                    "mismatched delimiters \\left{} and \\right{}",
                    open.text, close.text
                ),
                TextRange::new(left.range.start(), close.range.end()),
            )),
        }
    }

    fn parse_delimiter(&mut self, name: &str) -> ParseResult<Token<'a>> {
        match self.peek() {
            TokenKind::LParen
            | TokenKind::RParen
            | TokenKind::LBracket
            | TokenKind::RBracket
            | TokenKind::Pipe => self.bump(),
            other => Err(self.error(format!(
                "expected a delimiter after {name}, found {}",
                other.describe()
            ))),
        }
    }
}

fn leaf(token: &Token<'_>) -> ParseResult<Node> {
    let node = match token.kind {
        TokenKind::Number => token.number().map(Node::number),
        TokenKind::Ident => token.ident().map(Node::symbol),
        TokenKind::Wildcard => token.wildcard().map(Node::wildcard),
        _ => None,
    };
    node.ok_or_else(|| ParseError::lexical(format!("malformed {}", token.kind.describe()), token.range))
}

/// Parses `input` with the default [`ParserConfig`].
pub fn parse(input: &str) -> ParseResult<Node> {
    Parser::new(input, &ParserConfig::default())?.parse()
}
