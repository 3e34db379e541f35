//! Tool payload decoding — turns the raw content of a tool message into video records.
//!
//! Video-search tools hand back their results as a stringified list of mappings, either
//! JSON or a Python-style literal (`[{'title': 'X', 'link': 'https://..'}]`). The content
//! is untrusted text, so it is never evaluated: it is read by a restricted literal reader
//! that only knows lists, tuples, dicts, strings, numbers, `None`, `True` and `False`,
//! then validated against the `ToolVideo` schema.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Number, Value};
use thiserror::Error;

/// Nesting limit for the literal reader. Tool results are two levels deep in practice.
const MAX_DEPTH: usize = 32;

/// One record of a video-search tool result. Unknown keys are ignored.
///
/// `link` must be a string or the record is rejected; `title` and `thumbnail` are
/// display-only, so scalars are stringified and anything else reads as absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ToolVideo {
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub thumbnail: Option<String>,
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

/// Outcome of decoding one tool message.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolPayload {
    /// A non-empty list; holds the items that matched the record schema.
    Records(Vec<ToolVideo>),
    /// The tool ran and returned an empty list.
    Empty,
    /// Not a list of records, or not readable at all.
    Unreadable(String),
}

/// Decodes tool-message content. Never fails; unreadable content is reported as such.
pub fn decode_tool_payload(content: &str) -> ToolPayload {
    let content = content.trim();
    let value = match serde_json::from_str::<Value>(content) {
        Ok(v) => v,
        Err(_) => match read_literal(content) {
            Ok(v) => v,
            Err(e) => return ToolPayload::Unreadable(e.to_string()),
        },
    };

    let Value::Array(items) = value else {
        return ToolPayload::Unreadable("tool result is not a list".to_string());
    };
    if items.is_empty() {
        return ToolPayload::Empty;
    }

    let records = items
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|item| serde_json::from_value::<ToolVideo>(item).ok())
        .collect();
    ToolPayload::Records(records)
}

#[derive(Debug, Error, PartialEq)]
pub enum LiteralError {
    #[error("unexpected end of input")]
    UnexpectedEnd,

    #[error("unexpected character '{found}' at position {pos}")]
    Unexpected { found: char, pos: usize },

    #[error("invalid escape sequence at position {pos}")]
    InvalidEscape { pos: usize },

    #[error("invalid number at position {pos}")]
    InvalidNumber { pos: usize },

    #[error("dict keys must be strings (position {pos})")]
    NonStringKey { pos: usize },

    #[error("literal nested too deeply")]
    TooDeep,

    #[error("trailing input at position {pos}")]
    TrailingInput { pos: usize },
}

/// Reads a single data literal (Python repr syntax subset) into a JSON value.
pub fn read_literal(src: &str) -> Result<Value, LiteralError> {
    let mut reader = LiteralReader {
        chars: src.chars().collect(),
        pos: 0,
    };
    let value = reader.value(0)?;
    reader.skip_ws();
    if reader.pos < reader.chars.len() {
        return Err(LiteralError::TrailingInput { pos: reader.pos });
    }
    Ok(value)
}

struct LiteralReader {
    chars: Vec<char>,
    pos: usize,
}

impl LiteralReader {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Result<char, LiteralError> {
        let c = self.peek().ok_or(LiteralError::UnexpectedEnd)?;
        self.pos += 1;
        Ok(c)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn unexpected(&self) -> LiteralError {
        match self.peek() {
            Some(found) => LiteralError::Unexpected {
                found,
                pos: self.pos,
            },
            None => LiteralError::UnexpectedEnd,
        }
    }

    fn value(&mut self, depth: usize) -> Result<Value, LiteralError> {
        if depth > MAX_DEPTH {
            return Err(LiteralError::TooDeep);
        }
        self.skip_ws();
        match self.peek() {
            Some('[') => self.sequence(']', depth),
            Some('(') => self.sequence(')', depth),
            Some('{') => self.dict(depth),
            Some('\'') | Some('"') => self.string().map(Value::String),
            Some(c) if c == '-' || c == '+' || c.is_ascii_digit() || c == '.' => self.number(),
            Some(c) if c.is_ascii_alphabetic() => self.keyword(),
            _ => Err(self.unexpected()),
        }
    }

    fn sequence(&mut self, close: char, depth: usize) -> Result<Value, LiteralError> {
        self.pos += 1; // opening bracket
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() == Some(close) {
                self.pos += 1;
                return Ok(Value::Array(items));
            }
            items.push(self.value(depth + 1)?);
            self.skip_ws();
            match self.bump()? {
                ',' => continue,
                c if c == close => return Ok(Value::Array(items)),
                found => {
                    return Err(LiteralError::Unexpected {
                        found,
                        pos: self.pos - 1,
                    })
                }
            }
        }
    }

    fn dict(&mut self, depth: usize) -> Result<Value, LiteralError> {
        self.pos += 1; // '{'
        let mut map = Map::new();
        loop {
            self.skip_ws();
            if self.peek() == Some('}') {
                self.pos += 1;
                return Ok(Value::Object(map));
            }
            let key_pos = self.pos;
            let key = match self.value(depth + 1)? {
                Value::String(s) => s,
                _ => return Err(LiteralError::NonStringKey { pos: key_pos }),
            };
            self.skip_ws();
            if self.bump()? != ':' {
                return Err(LiteralError::Unexpected {
                    found: self.chars[self.pos - 1],
                    pos: self.pos - 1,
                });
            }
            let value = self.value(depth + 1)?;
            map.insert(key, value);
            self.skip_ws();
            match self.bump()? {
                ',' => continue,
                '}' => return Ok(Value::Object(map)),
                found => {
                    return Err(LiteralError::Unexpected {
                        found,
                        pos: self.pos - 1,
                    })
                }
            }
        }
    }

    fn string(&mut self) -> Result<String, LiteralError> {
        let quote = self.bump()?;
        let mut out = String::new();
        loop {
            match self.bump()? {
                c if c == quote => return Ok(out),
                '\\' => self.escape(&mut out)?,
                c => out.push(c),
            }
        }
    }

    fn escape(&mut self, out: &mut String) -> Result<(), LiteralError> {
        let pos = self.pos - 1;
        match self.bump()? {
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            '0' => out.push('\0'),
            'x' => out.push(self.hex_char(2, pos)?),
            'u' => out.push(self.hex_char(4, pos)?),
            'U' => out.push(self.hex_char(8, pos)?),
            '\n' => {} // line continuation
            other => {
                // Unknown escapes are kept literally, backslash included.
                out.push('\\');
                out.push(other);
            }
        }
        Ok(())
    }

    fn hex_char(&mut self, len: usize, pos: usize) -> Result<char, LiteralError> {
        let end = self.pos + len;
        if end > self.chars.len() {
            return Err(LiteralError::InvalidEscape { pos });
        }
        let digits: String = self.chars[self.pos..end].iter().collect();
        self.pos = end;
        u32::from_str_radix(&digits, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or(LiteralError::InvalidEscape { pos })
    }

    fn number(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '+' | '.' | '_'))
        {
            self.pos += 1;
        }
        let raw: String = self.chars[start..self.pos]
            .iter()
            .filter(|c| **c != '_')
            .collect();

        if let Ok(i) = raw.parse::<i64>() {
            return Ok(Value::Number(i.into()));
        }
        raw.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or(LiteralError::InvalidNumber { pos: start })
    }

    fn keyword(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.pos += 1;
        }
        let word: String = self.chars[start..self.pos].iter().collect();
        match word.as_str() {
            "None" => Ok(Value::Null),
            "True" => Ok(Value::Bool(true)),
            "False" => Ok(Value::Bool(false)),
            _ => Err(LiteralError::Unexpected {
                found: self.chars[start],
                pos: start,
            }),
        }
    }
}
