use serde::{Deserialize, Serialize};

use crate::error::{ParseError, ParseResult, range};
use crate::parser::Parser;
use crate::tree::Node;

/// Limits applied while parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Maximum nesting of groups, macro forms and prefix signs.
    pub max_depth: usize,
    /// Maximum depth of a finished tree. Operator chains such as
    /// `1 + 1 + 1` add a level per operator without nesting.
    pub max_tree_depth: usize,
    /// Longest input, in bytes, accepted by [`ParseContext::parse`].
    pub max_input_len: usize,
    /// Bytes reserved for the scan buffer when a context is opened.
    pub initial_buffer_capacity: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: 128,
            max_tree_depth: 1024,
            max_input_len: 64 * 1024,
            initial_buffer_capacity: 256,
        }
    }
}

/// A reusable parsing session.
///
/// The context owns a scan buffer that each [`parse`](Self::parse) call binds
/// to its input and clears again before returning. No grammar state survives
/// between calls, so one context can parse any number of unrelated strings,
/// one at a time.
///
/// ```
/// use optree_syntax::{ParseContext, ParserConfig};
///
/// let mut ctx = ParseContext::open(ParserConfig::default())?;
/// let tree = ctx.parse(r"\left | 1 - 2 \right|")?;
/// assert_eq!(tree.to_string(), "(abs (- 1 2))");
/// let tree = ctx.parse("1 + 2 - 3")?;
/// assert_eq!(tree.to_string(), "(- (+ 1 2) 3)");
/// ctx.close();
/// # Ok::<(), optree_syntax::ParseError>(())
/// ```
#[derive(Debug)]
pub struct ParseContext {
    config: ParserConfig,
    /// `None` once the context is closed.
    buffer: Option<String>,
    parses: u64,
}

impl ParseContext {
    /// Opens a context, reserving its scan buffer.
    pub fn open(config: ParserConfig) -> ParseResult<Self> {
        let mut buffer = String::new();
        buffer
            .try_reserve(config.initial_buffer_capacity)
            .map_err(|e| {
                ParseError::resource(format!("cannot allocate scan buffer: {e}"), range(0, 0))
            })?;
        log::debug!(
            "opened parse context (buffer capacity {})",
            buffer.capacity()
        );
        Ok(Self {
            config,
            buffer: Some(buffer),
            parses: 0,
        })
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn is_open(&self) -> bool {
        self.buffer.is_some()
    }

    /// Number of `parse` calls made on this context, failed ones included.
    pub fn parse_count(&self) -> u64 {
        self.parses
    }

    /// Parses `text` into a tree owned by the caller.
    ///
    /// Input ends at the first NUL byte, if any.
    pub fn parse(&mut self, text: &str) -> ParseResult<Node> {
        let Some(buffer) = self.buffer.as_mut() else {
            return Err(ParseError::resource("parse context is closed", range(0, 0)));
        };
        self.parses += 1;

        let text = text.split('\0').next().unwrap_or_default();
        if text.len() > self.config.max_input_len {
            return Err(ParseError::resource(
                format!(
                    "input of {} bytes exceeds the limit of {} bytes",
                    text.len(),
                    self.config.max_input_len
                ),
                range(0, 0),
            ));
        }

        buffer.clear();
        buffer.try_reserve(text.len()).map_err(|e| {
            ParseError::resource(format!("cannot grow scan buffer: {e}"), range(0, 0))
        })?;
        buffer.push_str(text);

        let result = Parser::new(buffer.as_str(), &self.config).and_then(Parser::parse);
        buffer.clear();

        match &result {
            Ok(node) => log::debug!("parse #{} produced {} nodes", self.parses, node.size()),
            Err(err) => log::debug!("parse #{} failed: {err}", self.parses),
        }
        result
    }

    /// Releases the scan buffer. Closing twice is a no-op.
    pub fn close(&mut self) {
        if self.buffer.take().is_some() {
            log::debug!("closed parse context after {} parses", self.parses);
        }
    }
}

impl Drop for ParseContext {
    fn drop(&mut self) {
        self.close();
    }
}
