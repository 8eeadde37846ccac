//! Cursor-based token matching over a single command line.
//!
//! A [`Cursor`] is a cheap `Copy` view of the input and a byte position.
//! Matching never mutates a cursor in place: a successful match hands back a
//! new cursor past the token, and a failed match hands back nothing, so every
//! grammar alternative can keep its own private copy and backtracking is just
//! dropping that copy.

use once_cell::sync::Lazy;
use regex::Regex;

static ACTION: Lazy<Regex> = Lazy::new(|| compile(r"^(?:ADD|DEL|KNN|END)"));
static POINT: Lazy<Regex> = Lazy::new(|| compile(r"^\{[0-9]+, [0-9]+\}"));
static DIGITS: Lazy<Regex> = Lazy::new(|| compile(r"^[0-9]+"));

fn compile(pattern: &str) -> Regex {
    // Patterns are literals above; a failure here is a programming error.
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid token pattern {pattern:?}: {e}"))
}

/// The token classes recognised by the command grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// One of the keywords `ADD`, `DEL`, `KNN`, `END`.
    Action,
    /// `{<digits>, <digits>}` with exactly one comma-space separator.
    Point,
    /// A run of ASCII digits.
    Digits,
}

impl Token {
    fn pattern(self) -> &'static Regex {
        match self {
            Token::Action => &*ACTION,
            Token::Point => &*POINT,
            Token::Digits => &*DIGITS,
        }
    }
}

/// Position within an immutable input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Cursor<'a> {
    /// Cursor at the start of `input`.
    pub fn new(input: &'a str) -> Self {
        Self { input, position: 0 }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Unconsumed input from the cursor onwards.
    pub fn rest(&self) -> &'a str {
        &self.input[self.position..]
    }

    pub fn is_at_end(&self) -> bool {
        self.position == self.input.len()
    }

    /// Advance past plain spaces. Tabs and other whitespace are not skipped.
    pub fn skip_spaces(self) -> Self {
        let skipped = self.rest().bytes().take_while(|&b| b == b' ').count();
        Self {
            position: self.position + skipped,
            ..self
        }
    }

    /// Skip spaces, then match `token` anchored at the first non-space byte.
    ///
    /// Returns the matched text and a cursor positioned just past it.
    pub fn match_token(self, token: Token) -> Option<(&'a str, Cursor<'a>)> {
        let start = self.skip_spaces();
        let found = token.pattern().find(start.rest())?;
        log::trace!("matched {:?} {:?} at {}", token, found.as_str(), start.position);

        let next = Self {
            position: start.position + found.end(),
            ..start
        };
        Some((found.as_str(), next))
    }
}
