//! # optree-syntax
//!
//! Turns TeX math such as `\frac 12 a`, `a^{1+2}` or `\left|1-2\right|` into
//! an owned operator tree.
//!
//! ```text
//! text ──► Lexer ──► tokens ──► Parser ──► Node
//! ```
//!
//! ```
//! use optree_syntax::{parse, BinaryOp, Node};
//!
//! let tree = parse("1 + 2 - 3").unwrap();
//! assert_eq!(tree.to_string(), "(- (+ 1 2) 3)");
//! assert!(matches!(tree, Node::Binary(BinaryOp::Sub, _, _)));
//! ```
//!
//! Repeated parses should go through a [`ParseContext`], which keeps a scan
//! buffer between calls and enforces the limits of a [`ParserConfig`].

pub mod context;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod render;
pub mod tree;


pub use context::{ParseContext, ParserConfig};
pub use error::{ErrorKind, ParseError, ParseResult};
pub use parser::parse;
pub use rowan::{TextRange, TextSize};
pub use tree::{BinaryOp, Node, UnaryOp};

/// Kinds of tokens produced by the [`lexer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TokenKind {
    // Literals
    Number,   // 3.14
    Ident,    // a single letter
    Wildcard, // *{1}

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    Equals,
    Pipe,

    // Grouping
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,

    // Macros
    MacroFrac,
    MacroSqrt,
    MacroLeft,
    MacroRight,
    MacroTimes,
    MacroDiv,
    MacroCdot,
    MacroPm,

    End,
}

impl TokenKind {
    /// Whether a token of this kind can begin an atom, and therefore an
    /// implicit multiplication.
    pub fn starts_atom(self) -> bool {
        matches!(
            self,
            TokenKind::Number
                | TokenKind::Ident
                | TokenKind::Wildcard
                | TokenKind::LParen
                | TokenKind::LBrace
                | TokenKind::LBracket
                | TokenKind::MacroFrac
                | TokenKind::MacroSqrt
                | TokenKind::MacroLeft
        )
    }

    /// Human readable name used in diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Number => "number",
            TokenKind::Ident => "identifier",
            TokenKind::Wildcard => "wildcard",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Caret => "'^'",
            TokenKind::Equals => "'='",
            TokenKind::Pipe => "'|'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::MacroFrac => "\\frac",
            TokenKind::MacroSqrt => "\\sqrt",
            TokenKind::MacroLeft => "\\left",
            TokenKind::MacroRight => "\\right",
            TokenKind::MacroTimes => "\\times",
            TokenKind::MacroDiv => "\\div",
            TokenKind::MacroCdot => "\\cdot",
            TokenKind::MacroPm => "\\pm",
            TokenKind::End => "end of input",
        }
    }
}
