use crate::TokenKind;
use crate::error::{ParseError, ParseResult, range};
use rowan::TextRange;

/// Macro names recognized after a backslash. Matching picks the longest
/// entry that prefixes the input, so `\fracab` reads as `\frac a b`.
const MACROS: &[(&str, TokenKind)] = &[
    ("frac", TokenKind::MacroFrac),
    ("sqrt", TokenKind::MacroSqrt),
    ("left", TokenKind::MacroLeft),
    ("right", TokenKind::MacroRight),
    ("times", TokenKind::MacroTimes),
    ("div", TokenKind::MacroDiv),
    ("cdot", TokenKind::MacroCdot),
    ("pm", TokenKind::MacroPm),
];

/// A token together with the slice of input it was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub range: TextRange,
}

impl<'a> Token<'a> {
    /// Numeric payload of a [`TokenKind::Number`] token.
    pub fn number(&self) -> Option<f64> {
        match self.kind {
            TokenKind::Number => self.text.parse().ok(),
            _ => None,
        }
    }

    /// Name of a [`TokenKind::Ident`] token.
    pub fn ident(&self) -> Option<char> {
        match self.kind {
            TokenKind::Ident => self.text.chars().next(),
            _ => None,
        }
    }

    /// Index of a [`TokenKind::Wildcard`] token, `*{12}` gives `12`.
    pub fn wildcard(&self) -> Option<u32> {
        match self.kind {
            TokenKind::Wildcard => self
                .text
                .strip_prefix("*{")
                .and_then(|rest| rest.strip_suffix('}'))
                .and_then(|digits| digits.parse().ok()),
            _ => None,
        }
    }
}

/// A lexer for the TeX math subset.
///
/// The lexer is lazy: every call to [`Lexer::next_token`] scans exactly one
/// token, skipping the whitespace in front of it. Once the input is exhausted
/// it keeps returning [`TokenKind::End`]. The only state is the cursor, so a
/// lexer can be rebound to new input with [`Lexer::reset`].
///
/// ```
/// use optree_syntax::lexer::Lexer;
/// use optree_syntax::TokenKind;
///
/// let mut lexer = Lexer::new(r"\frac 12 a");
/// assert_eq!(lexer.next_token().unwrap().kind, TokenKind::MacroFrac);
/// assert_eq!(lexer.next_token().unwrap().text, "12");
/// assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Ident);
/// assert_eq!(lexer.next_token().unwrap().kind, TokenKind::End);
/// ```
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    /// The input source text being lexed.
    input: &'a str,
    /// Current byte position in the input.
    position: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new `Lexer` for the given input string.
    pub fn new(input: &'a str) -> Self {
        Self { input, position: 0 }
    }

    /// Rebinds the lexer to `input` and rewinds to its start.
    pub fn reset(&mut self, input: &'a str) {
        self.input = input;
        self.position = 0;
    }

    /// Current byte position in the input.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns the next token, or a [`TokenKind::End`] token at the end of input.
    pub fn next_token(&mut self) -> ParseResult<Token<'a>> {
        self.skip_whitespace();

        let start = self.position;
        let Some(c) = self.input[start..].chars().next() else {
            return Ok(self.token(TokenKind::End, start));
        };
        self.position += c.len_utf8();

        let kind = match c {
            '\\' => self.lex_macro(start)?,
            '0'..='9' => self.lex_number(start)?,
            'a'..='z' | 'A'..='Z' => TokenKind::Ident,
            '*' => {
                if self.lex_wildcard() {
                    TokenKind::Wildcard
                } else {
                    TokenKind::Star
                }
            }
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '/' => TokenKind::Slash,
            '^' => TokenKind::Caret,
            '=' => TokenKind::Equals,
            '|' => TokenKind::Pipe,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            other => {
                return Err(ParseError::lexical(
                    format!("unrecognized character {other:?}"),
                    range(start, self.position),
                ));
            }
        };

        let token = self.token(kind, start);
        log::trace!("token {:?} {:?} at {:?}", token.kind, token.text, token.range);
        Ok(token)
    }

    fn token(&self, kind: TokenKind, start: usize) -> Token<'a> {
        Token {
            kind,
            text: &self.input[start..self.position],
            range: range(start, self.position),
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.position..]
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.rest().chars().next() {
            if c.is_whitespace() {
                self.position += c.len_utf8();
            } else {
                break;
            }
        }
    }

    fn skip_digits(&mut self) -> usize {
        let count = self
            .rest()
            .bytes()
            .take_while(|b| b.is_ascii_digit())
            .count();
        self.position += count;
        count
    }

    /// Called with the backslash already consumed.
    fn lex_macro(&mut self, start: usize) -> ParseResult<TokenKind> {
        let rest = self.rest();
        let word_len = rest
            .bytes()
            .take_while(|b| b.is_ascii_alphabetic())
            .count();
        if word_len == 0 {
            let end = self.position + rest.chars().next().map_or(0, char::len_utf8);
            return Err(ParseError::lexical(
                "unterminated macro, expected a name after '\\'",
                range(start, end),
            ));
        }

        let matched = MACROS
            .iter()
            .filter(|(name, _)| rest.starts_with(name))
            .max_by_key(|(name, _)| name.len());

        match matched {
            Some((name, kind)) => {
                self.position += name.len();
                Ok(*kind)
            }
            None => Err(ParseError::lexical(
                format!("unknown macro \\{}", &rest[..word_len]),
                range(start, self.position + word_len),
            )),
        }
    }

    /// Called with the first digit already consumed.
    fn lex_number(&mut self, start: usize) -> ParseResult<TokenKind> {
        self.skip_digits();
        if self.rest().starts_with('.') {
            self.position += 1;
            if self.skip_digits() == 0 {
                return Err(ParseError::lexical(
                    "malformed number, expected digits after '.'",
                    range(start, self.position),
                ));
            }
        }
        Ok(TokenKind::Number)
    }

    /// Consumes `{digits}` right after a `*`, if present.
    fn lex_wildcard(&mut self) -> bool {
        let Some(body) = self.rest().strip_prefix('{') else {
            return false;
        };
        let digits = body.bytes().take_while(|b| b.is_ascii_digit()).count();
        if digits == 0 || !body[digits..].starts_with('}') {
            return false;
        }
        self.position += digits + 2;
        true
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = ParseResult<Token<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_token() {
            Ok(token) if token.kind == TokenKind::End => None,
            other => Some(other),
        }
    }
}
