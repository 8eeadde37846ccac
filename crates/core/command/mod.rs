//! Line-oriented command grammar.
//!
//! A line is trimmed and then tried against three alternatives in order:
//!
//! 1. full command: `ADD {x, y} n` or `KNN {x, y} n`
//! 2. delete command: `DEL {x, y}`
//! 3. end action: `END`
//!
//! Each alternative starts from its own cursor at the beginning of the line,
//! so a failed alternative leaves nothing behind for the next one. The whole
//! trimmed line must be consumed; trailing text makes the line invalid.
//!
//! ```rust
//! use kdtreed::{Command, Point};
//!
//! let cmd = kdtreed::command::parse("ADD {3, 4} 7")?;
//! assert_eq!(cmd, Command::Add { point: Point::new(3, 4), payload: 7 });
//!
//! assert!(kdtreed::command::parse("DEL {3,4}").is_err());
//! # Ok::<(), kdtreed::KdtreedError>(())
//! ```

pub mod matcher;

use crate::error::{KdtreedError, Result};
use kdtreed_types::{Payload, Point};
use matcher::{Cursor, Token};
use std::fmt;
use std::str::FromStr;

/// Action keyword that opens every command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Add,
    Del,
    Knn,
    End,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Add => "ADD",
            Action::Del => "DEL",
            Action::Knn => "KNN",
            Action::End => "END",
        }
    }
}

impl FromStr for Action {
    type Err = KdtreedError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ADD" => Ok(Action::Add),
            "DEL" => Ok(Action::Del),
            "KNN" => Ok(Action::Knn),
            "END" => Ok(Action::End),
            other => Err(KdtreedError::InvalidCommand(other.to_string())),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Insert a record.
    Add { point: Point, payload: Payload },
    /// Remove every record at `point`.
    Delete { point: Point },
    /// Fetch up to `k` records nearest to `point`.
    Knn { point: Point, k: Payload },
    /// Close the session.
    End,
}

impl Command {
    pub fn action(&self) -> Action {
        match self {
            Command::Add { .. } => Action::Add,
            Command::Delete { .. } => Action::Del,
            Command::Knn { .. } => Action::Knn,
            Command::End => Action::End,
        }
    }
}

impl FromStr for Command {
    type Err = KdtreedError;

    fn from_str(s: &str) -> Result<Self> {
        parse(s)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Add { point, payload } => write!(f, "ADD {} {}", point, payload),
            Command::Delete { point } => write!(f, "DEL {}", point),
            Command::Knn { point, k } => write!(f, "KNN {} {}", point, k),
            Command::End => f.write_str("END"),
        }
    }
}

/// Parse a single protocol line into a [`Command`].
///
/// Leading and trailing whitespace is ignored. Returns
/// [`KdtreedError::EmptyLine`] for blank input and
/// [`KdtreedError::InvalidCommand`] for anything outside the grammar.
pub fn parse(line: &str) -> Result<Command> {
    let line = line.trim();
    if line.is_empty() {
        return Err(KdtreedError::EmptyLine);
    }

    let start = Cursor::new(line);
    full_command(start)
        .or_else(|| del_command(start))
        .or_else(|| end_action(start))
        .ok_or_else(|| KdtreedError::InvalidCommand(line.to_string()))
}

fn full_command(cursor: Cursor<'_>) -> Option<Command> {
    let (action, cursor) = action(cursor)?;
    let (point, cursor) = point(cursor)?;
    let (value, cursor) = payload(cursor)?;

    let command = match action {
        Action::Add => Command::Add {
            point,
            payload: value,
        },
        Action::Knn => Command::Knn { point, k: value },
        Action::Del | Action::End => return None,
    };
    finish(cursor, command)
}

fn del_command(cursor: Cursor<'_>) -> Option<Command> {
    let (action, cursor) = action(cursor)?;
    if action != Action::Del {
        return None;
    }
    let (point, cursor) = point(cursor)?;
    finish(cursor, Command::Delete { point })
}

fn end_action(cursor: Cursor<'_>) -> Option<Command> {
    let (action, cursor) = action(cursor)?;
    if action != Action::End {
        return None;
    }
    finish(cursor, Command::End)
}

fn action(cursor: Cursor<'_>) -> Option<(Action, Cursor<'_>)> {
    let (text, next) = cursor.match_token(Token::Action)?;
    Some((text.parse().ok()?, next))
}

fn point(cursor: Cursor<'_>) -> Option<(Point, Cursor<'_>)> {
    let (text, next) = cursor.match_token(Token::Point)?;
    let (x, y) = text
        .strip_prefix('{')?
        .strip_suffix('}')?
        .split_once(", ")?;
    Some((Point::new(x.parse().ok()?, y.parse().ok()?), next))
}

fn payload(cursor: Cursor<'_>) -> Option<(Payload, Cursor<'_>)> {
    let (text, next) = cursor.match_token(Token::Digits)?;
    Some((text.parse().ok()?, next))
}

fn finish(cursor: Cursor<'_>, command: Command) -> Option<Command> {
    cursor.skip_spaces().is_at_end().then_some(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: u32, y: u32) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_parse_add() {
        assert_eq!(
            parse("ADD {3, 4} 7").unwrap(),
            Command::Add {
                point: p(3, 4),
                payload: 7
            }
        );
    }

    #[test]
    fn test_parse_delete() {
        assert_eq!(
            parse("DEL {5, 5}").unwrap(),
            Command::Delete { point: p(5, 5) }
        );
    }

    #[test]
    fn test_parse_knn() {
        assert_eq!(
            parse("KNN {0, 0} 2").unwrap(),
            Command::Knn {
                point: p(0, 0),
                k: 2
            }
        );
    }

    #[test]
    fn test_parse_end() {
        assert_eq!(parse("END").unwrap(), Command::End);
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        assert_eq!(parse("  END \r\n").unwrap(), Command::End);
        assert_eq!(
            parse("\tKNN   {1, 1}   5  \n").unwrap(),
            Command::Knn {
                point: p(1, 1),
                k: 5
            }
        );
    }

    #[test]
    fn test_blank_line_is_empty_error() {
        assert!(matches!(parse(""), Err(KdtreedError::EmptyLine)));
        assert!(matches!(parse("   \r\n"), Err(KdtreedError::EmptyLine)));
    }

    #[test]
    fn test_rejects_malformed_lines() {
        let cases = [
            "ADD",
            "ADD {3, 4}",
            "ADD {3,4} 7",
            "ADD {3, 4} x",
            "ADD 3 4 7",
            "KNN {1, 1}",
            "DEL",
            "DEL 5",
            "DEL {1,2}",
            "PUT {1, 2} 3",
            "add {1, 2} 3",
            "ADD {-1, 2} 3",
            "ADD {1.5, 2} 3",
            "hello world",
        ];
        for line in cases {
            assert!(
                matches!(parse(line), Err(KdtreedError::InvalidCommand(_))),
                "expected {line:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_trailing_text() {
        for line in ["DEL {1, 2} 5", "END now", "ADD {1, 2} 3 4", "KNN {1, 2} 3x"] {
            assert!(parse(line).is_err(), "expected {line:?} to be rejected");
        }
    }

    #[test]
    fn test_action_must_agree_with_shape() {
        // Structurally a full command, but DEL and END do not take a payload.
        assert!(parse("DEL {1, 2} 3").is_err());
        assert!(parse("END {1, 2} 3").is_err());
        // ADD and KNN require one.
        assert!(parse("ADD {1, 2}").is_err());
        assert!(parse("KNN {1, 2}").is_err());
        assert!(parse("ADD").is_err());
    }

    #[test]
    fn test_keyword_prefix_does_not_leak_into_next_token() {
        assert!(parse("ADDX {1, 2} 3").is_err());
        assert!(parse("ENDX").is_err());
    }

    #[test]
    fn test_numeric_overflow_is_invalid() {
        assert!(parse("ADD {4294967296, 0} 1").is_err());
        assert!(parse("ADD {0, 0} 18446744073709551616").is_err());
        assert_eq!(
            parse("ADD {4294967295, 0} 18446744073709551615").unwrap(),
            Command::Add {
                point: p(u32::MAX, 0),
                payload: u64::MAX
            }
        );
    }

    #[test]
    fn test_leading_zeros_are_accepted() {
        assert_eq!(
            parse("KNN {007, 0} 00").unwrap(),
            Command::Knn {
                point: p(7, 0),
                k: 0
            }
        );
    }

    #[test]
    fn test_from_str_and_display_agree() {
        for line in ["ADD {3, 4} 7", "DEL {5, 5}", "KNN {0, 0} 2", "END"] {
            let cmd: Command = line.parse().unwrap();
            assert_eq!(cmd.to_string(), line);
        }
    }

    #[test]
    fn test_command_action() {
        assert_eq!(parse("DEL {1, 1}").unwrap().action(), Action::Del);
        assert_eq!(parse("END").unwrap().action(), Action::End);
        assert_eq!(Action::Knn.to_string(), "KNN");
        assert_eq!("ADD".parse::<Action>().unwrap(), Action::Add);
        assert!("NOP".parse::<Action>().is_err());
    }
}
