//! Compound selector subset used for querying the document.
//!
//! Supported grammar (comma-separated list of compounds, no combinators):
//!
//! ```text
//! compound := (type | '*')? simple*
//! simple   := '#' ident | '.' ident | '[' ident (('=' | '~=') value)? ']'
//!           | ':not(' compound ')'
//! value    := ident | '"' .* '"' | '\'' .* '\''
//! ```

use crate::document::Document;
use crate::types::NodeKey;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectorErrorKind {
    Empty,
    UnexpectedChar(char),
    UnexpectedEnd,
    ExpectedIdent,
    UnterminatedString,
    UnsupportedPseudo(String),
    UnsupportedCombinator,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectorError {
    pub position: usize,
    pub kind: SelectorErrorKind,
}

impl fmt::Display for SelectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            SelectorErrorKind::Empty => write!(f, "empty selector"),
            SelectorErrorKind::UnexpectedChar(c) => {
                write!(f, "unexpected {c:?} at offset {}", self.position)
            }
            SelectorErrorKind::UnexpectedEnd => write!(f, "selector ends early"),
            SelectorErrorKind::ExpectedIdent => {
                write!(f, "expected an identifier at offset {}", self.position)
            }
            SelectorErrorKind::UnterminatedString => {
                write!(f, "unterminated string at offset {}", self.position)
            }
            SelectorErrorKind::UnsupportedPseudo(name) => {
                write!(f, "unsupported pseudo-class :{name}")
            }
            SelectorErrorKind::UnsupportedCombinator => {
                write!(f, "combinators are not supported (offset {})", self.position)
            }
        }
    }
}

impl std::error::Error for SelectorError {}

#[derive(Clone, Debug, PartialEq, Eq)]
enum AttrMatch {
    Exists,
    Equals(String),
    Includes(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Simple {
    Id(String),
    Class(String),
    Attr { name: String, op: AttrMatch },
    Not(Box<Compound>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Compound {
    tag: Option<String>,
    parts: Vec<Simple>,
}

impl Compound {
    pub fn matches(&self, doc: &Document, key: NodeKey) -> bool {
        let Some(name) = doc.element_name(key) else {
            return false;
        };
        if let Some(tag) = &self.tag
            && !name.eq_ignore_ascii_case(tag)
        {
            return false;
        }
        self.parts.iter().all(|part| part.matches(doc, key))
    }
}

impl Simple {
    fn matches(&self, doc: &Document, key: NodeKey) -> bool {
        match self {
            Simple::Id(id) => doc.attr(key, "id") == Some(id.as_str()),
            Simple::Class(class) => doc.has_class(key, class),
            Simple::Attr { name, op } => {
                let Some(value) = doc.attr(key, name) else {
                    return false;
                };
                match op {
                    AttrMatch::Exists => true,
                    AttrMatch::Equals(expected) => value == expected,
                    AttrMatch::Includes(token) => {
                        value.split_ascii_whitespace().any(|t| t == token)
                    }
                }
            }
            Simple::Not(inner) => !inner.matches(doc, key),
        }
    }
}

/// A parsed, comma-separated selector list. Matches when any compound matches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectorList {
    compounds: Vec<Compound>,
}

impl SelectorList {
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let mut cursor = Cursor { input, pos: 0 };
        cursor.skip_ws();
        if cursor.peek().is_none() {
            return Err(cursor.error(SelectorErrorKind::Empty));
        }
        let mut compounds = Vec::new();
        loop {
            compounds.push(cursor.compound()?);
            let before_ws = cursor.pos;
            cursor.skip_ws();
            match cursor.peek() {
                None => break,
                Some(',') => {
                    cursor.bump();
                    cursor.skip_ws();
                }
                Some(_) if cursor.pos != before_ws => {
                    return Err(SelectorError {
                        position: before_ws,
                        kind: SelectorErrorKind::UnsupportedCombinator,
                    });
                }
                Some(c) => return Err(cursor.error(SelectorErrorKind::UnexpectedChar(c))),
            }
        }
        Ok(Self { compounds })
    }

    pub fn matches(&self, doc: &Document, key: NodeKey) -> bool {
        self.compounds.iter().any(|c| c.matches(doc, key))
    }

    pub fn compounds(&self) -> &[Compound] {
        &self.compounds
    }
}

impl FromStr for SelectorList {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

impl Cursor<'_> {
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn error(&self, kind: SelectorErrorKind) -> SelectorError {
        SelectorError {
            position: self.pos,
            kind,
        }
    }

    fn unexpected(&self) -> SelectorError {
        match self.peek() {
            Some(c) => self.error(SelectorErrorKind::UnexpectedChar(c)),
            None => self.error(SelectorErrorKind::UnexpectedEnd),
        }
    }

    fn expect(&mut self, want: char) -> Result<(), SelectorError> {
        if self.peek() == Some(want) {
            self.bump();
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn ident(&mut self) -> Result<String, SelectorError> {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.bump();
        }
        if self.pos == start {
            return Err(self.error(SelectorErrorKind::ExpectedIdent));
        }
        Ok(self.input[start..self.pos].to_string())
    }

    fn compound(&mut self) -> Result<Compound, SelectorError> {
        let start = self.pos;
        let tag = match self.peek() {
            Some('*') => {
                self.bump();
                None
            }
            Some(c) if is_ident_char(c) => Some(self.ident()?.to_ascii_lowercase()),
            _ => None,
        };
        let mut parts = Vec::new();
        loop {
            match self.peek() {
                Some('#') => {
                    self.bump();
                    parts.push(Simple::Id(self.ident()?));
                }
                Some('.') => {
                    self.bump();
                    parts.push(Simple::Class(self.ident()?));
                }
                Some('[') => {
                    self.bump();
                    parts.push(self.attribute()?);
                }
                Some(':') => {
                    self.bump();
                    let name_pos = self.pos;
                    let name = self.ident()?;
                    if !name.eq_ignore_ascii_case("not") {
                        return Err(SelectorError {
                            position: name_pos,
                            kind: SelectorErrorKind::UnsupportedPseudo(name),
                        });
                    }
                    self.expect('(')?;
                    self.skip_ws();
                    let inner = self.compound()?;
                    self.skip_ws();
                    self.expect(')')?;
                    parts.push(Simple::Not(Box::new(inner)));
                }
                _ => break,
            }
        }
        if self.pos == start {
            return Err(self.unexpected());
        }
        Ok(Compound { tag, parts })
    }

    fn attribute(&mut self) -> Result<Simple, SelectorError> {
        self.skip_ws();
        let name = self.ident()?.to_ascii_lowercase();
        self.skip_ws();
        let op = match self.peek() {
            Some(']') => AttrMatch::Exists,
            Some('=') => {
                self.bump();
                AttrMatch::Equals(self.value()?)
            }
            Some('~') => {
                self.bump();
                self.expect('=')?;
                AttrMatch::Includes(self.value()?)
            }
            _ => return Err(self.unexpected()),
        };
        self.skip_ws();
        self.expect(']')?;
        Ok(Simple::Attr { name, op })
    }

    fn value(&mut self) -> Result<String, SelectorError> {
        self.skip_ws();
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                let open = self.pos;
                self.bump();
                let start = self.pos;
                while let Some(c) = self.peek() {
                    if c == quote {
                        let value = self.input[start..self.pos].to_string();
                        self.bump();
                        return Ok(value);
                    }
                    self.bump();
                }
                Err(SelectorError {
                    position: open,
                    kind: SelectorErrorKind::UnterminatedString,
                })
            }
            _ => self.ident(),
        }
    }
}
