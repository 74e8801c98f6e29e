//! A query-string subset for the in-process index.
//!
//! Supported syntax:
//!
//! | Form | Meaning |
//! |------|---------|
//! | `shirt` | any field contains the token |
//! | `name:shirt` | the field contains the token |
//! | `name:"blue shirt"` | the field contains the tokens in sequence |
//! | `name:sh*` | the field has a token starting with `sh` |
//! | `name:*` | the field is present and not null |
//! | `*` | every document |
//! | `a AND b`, `a b` | both |
//! | `a OR b` | either |
//! | `NOT a`, `-a` | negation |
//! | `( ... )` | grouping |
//!
//! Text is split into lower-case alphanumeric tokens before matching, so
//! `email:ada@example.com` is the phrase `ada example com`.

use serde_json::Value;

use crate::error::IndexError;

/// A parsed query.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// Matches every document.
    All,
    /// A single field (or any field) condition.
    Term {
        /// The field name, or `None` for any field.
        field: Option<String>,
        /// What the field value must contain.
        pattern: Pattern,
    },
    /// All sub-queries match.
    And(Vec<Query>),
    /// At least one sub-query matches.
    Or(Vec<Query>),
    /// The sub-query does not match.
    Not(Box<Query>),
}

/// What a term matches within one field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// Any non-null value.
    Present,
    /// A contiguous token sequence.
    Tokens(Vec<String>),
    /// A token starting with the prefix.
    Prefix(String),
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Term {
        field: Option<String>,
        value: String,
        quoted: bool,
    },
    And,
    Or,
    Not,
    Open,
    Close,
}

/// Splits text into lower-case alphanumeric tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn parse_error(query: &str, message: impl Into<String>) -> IndexError {
    IndexError::QueryParse {
        query: query.to_string(),
        message: message.into(),
    }
}

fn read_phrase(
    query: &str,
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
) -> Result<String, IndexError> {
    // Opening quote already consumed.
    let mut phrase = String::new();
    for c in chars.by_ref() {
        if c == '"' {
            return Ok(phrase);
        }
        phrase.push(c);
    }
    Err(parse_error(query, "unterminated quoted phrase"))
}

fn lex(query: &str) -> Result<Vec<Token>, IndexError> {
    let mut tokens = Vec::new();
    let mut chars = query.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token::Open);
            }
            ')' => {
                chars.next();
                tokens.push(Token::Close);
            }
            '"' => {
                chars.next();
                tokens.push(Token::Term {
                    field: None,
                    value: read_phrase(query, &mut chars)?,
                    quoted: true,
                });
            }
            '-' | '!' => {
                chars.next();
                tokens.push(Token::Not);
            }
            '+' => {
                chars.next();
            }
            _ => {
                let mut word = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() || c == '(' || c == ')' {
                        break;
                    }
                    word.push(c);
                    chars.next();
                    if c == ':' && chars.peek() == Some(&'"') {
                        break;
                    }
                }

                match word.as_str() {
                    "AND" | "&&" => tokens.push(Token::And),
                    "OR" | "||" => tokens.push(Token::Or),
                    "NOT" => tokens.push(Token::Not),
                    _ => match word.split_once(':') {
                        Some((field, "")) if chars.peek() == Some(&'"') => {
                            chars.next();
                            tokens.push(Token::Term {
                                field: Some(field.to_string()),
                                value: read_phrase(query, &mut chars)?,
                                quoted: true,
                            });
                        }
                        Some((field, value)) if field.is_empty() || value.is_empty() => {
                            return Err(parse_error(
                                query,
                                format!("incomplete field term '{}'", word),
                            ));
                        }
                        Some((field, value)) => tokens.push(Token::Term {
                            field: Some(field.to_string()),
                            value: value.to_string(),
                            quoted: false,
                        }),
                        None => tokens.push(Token::Term {
                            field: None,
                            value: word,
                            quoted: false,
                        }),
                    },
                }
            }
        }
    }

    Ok(tokens)
}

struct Parser<'a> {
    query: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn or_expr(&mut self) -> Result<Query, IndexError> {
        let mut branches = vec![self.and_expr()?];
        while self.peek() == Some(&Token::Or) {
            self.next();
            branches.push(self.and_expr()?);
        }
        Ok(if branches.len() == 1 {
            branches.remove(0)
        } else {
            Query::Or(branches)
        })
    }

    fn and_expr(&mut self) -> Result<Query, IndexError> {
        let mut parts = vec![self.unary()?];
        loop {
            match self.peek() {
                Some(Token::And) => {
                    self.next();
                    parts.push(self.unary()?);
                }
                Some(Token::Term { .. } | Token::Not | Token::Open) => parts.push(self.unary()?),
                _ => break,
            }
        }
        Ok(if parts.len() == 1 {
            parts.remove(0)
        } else {
            Query::And(parts)
        })
    }

    fn unary(&mut self) -> Result<Query, IndexError> {
        match self.next() {
            Some(Token::Not) => Ok(Query::Not(Box::new(self.unary()?))),
            Some(Token::Open) => {
                let inner = self.or_expr()?;
                match self.next() {
                    Some(Token::Close) => Ok(inner),
                    _ => Err(parse_error(self.query, "missing closing parenthesis")),
                }
            }
            Some(Token::Term {
                field,
                value,
                quoted,
            }) => Ok(term(field, &value, quoted)),
            Some(other) => Err(parse_error(
                self.query,
                format!("unexpected {:?}", other),
            )),
            None => Err(parse_error(self.query, "unexpected end of query")),
        }
    }
}

fn term(field: Option<String>, value: &str, quoted: bool) -> Query {
    if !quoted && value == "*" {
        return match field {
            None => Query::All,
            Some(_) => Query::Term {
                field,
                pattern: Pattern::Present,
            },
        };
    }

    let pattern = match value.strip_suffix('*') {
        Some(prefix) if !quoted && tokenize(prefix).len() == 1 => {
            Pattern::Prefix(prefix.to_lowercase())
        }
        _ => Pattern::Tokens(tokenize(value)),
    };
    Query::Term { field, pattern }
}

/// Parses a query string. A blank query matches every document.
pub fn parse(query: &str) -> Result<Query, IndexError> {
    let tokens = lex(query)?;
    if tokens.is_empty() {
        return Ok(Query::All);
    }

    let mut parser = Parser {
        query,
        tokens,
        pos: 0,
    };
    let parsed = parser.or_expr()?;
    match parser.peek() {
        None => Ok(parsed),
        Some(token) => Err(parse_error(query, format!("unexpected {:?}", token))),
    }
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

impl Pattern {
    fn matches_value(&self, value: &Value) -> bool {
        match value {
            Value::Array(items) => items.iter().any(|v| self.matches_value(v)),
            Value::Object(map) => map.values().any(|v| self.matches_value(v)),
            other => match value_text(other) {
                None => false,
                Some(text) => self.matches_text(&text),
            },
        }
    }

    fn matches_text(&self, text: &str) -> bool {
        match self {
            Pattern::Present => true,
            Pattern::Prefix(prefix) => tokenize(text).iter().any(|t| t.starts_with(prefix)),
            Pattern::Tokens(wanted) if wanted.is_empty() => false,
            Pattern::Tokens(wanted) => tokenize(text)
                .windows(wanted.len())
                .any(|window| window == wanted.as_slice()),
        }
    }
}

impl Query {
    /// Evaluates the query against one JSON document.
    pub fn matches(&self, document: &Value) -> bool {
        match self {
            Query::All => true,
            Query::Term {
                field: Some(field),
                pattern,
            } => document
                .get(field)
                .is_some_and(|value| pattern.matches_value(value)),
            Query::Term {
                field: None,
                pattern,
            } => document
                .as_object()
                .is_some_and(|map| map.values().any(|v| pattern.matches_value(v))),
            Query::And(parts) => parts.iter().all(|q| q.matches(document)),
            Query::Or(parts) => parts.iter().any(|q| q.matches(document)),
            Query::Not(inner) => !inner.matches(document),
        }
    }
}
