//! Resolved field value kinds
//!
//! A [`ValueKind`] is the closed set of shapes a field can take on the wire.
//! Composite kinds carry their element kinds recursively; nothing here bounds
//! the depth, so the walkers below use an explicit work stack instead of the
//! call stack.
//!
//! # Type expressions
//!
//! | Expression | Kind |
//! |------------|------|
//! | `bool`, `byte`, `short`, `int`, `long` | integral scalars |
//! | `float`, `double`, `char`, `string` | other scalars |
//! | `array<T>`, `list<T>`, `set<T>` | sequences |
//! | `map<K, V>` | maps |
//! | `message<ID>` or a message name | nested message |
//!
//! Built-in names are lowercase and matched exactly, so a message named
//! `List` or `String` is referenced by its own name. A message whose name is
//! exactly a built-in name is ambiguous and rejected.

use crate::error::{GenerateError, GenerateResult};
use std::fmt;

/// Textual nesting beyond this is rejected while parsing type expressions.
const MAX_PARSE_DEPTH: usize = 128;

/// Names reserved for built-in kinds in type expressions.
const BUILTIN_NAMES: &[&str] = &[
    "bool", "boolean", "byte", "short", "int", "integer", "long", "float", "double", "char",
    "character", "string", "array", "list", "set", "map", "message",
];

/// Resolved value kind of a field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bool,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Char,
    String,

    /// Fixed-shape sequence; encoded exactly like a list.
    Array(Box<ValueKind>),
    List(Box<ValueKind>),
    Set(Box<ValueKind>),
    Map(Box<ValueKind>, Box<ValueKind>),

    /// Another message, referenced by protocol id.
    NestedMessage(u16),
}

/// Discriminant of a [`ValueKind`], used as the dispatch key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KindTag {
    Bool,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Char,
    String,
    Array,
    List,
    Set,
    Map,
    NestedMessage,
}

impl KindTag {
    /// Every tag, in declaration order.
    pub const ALL: [KindTag; 14] = [
        KindTag::Bool,
        KindTag::Byte,
        KindTag::Short,
        KindTag::Int,
        KindTag::Long,
        KindTag::Float,
        KindTag::Double,
        KindTag::Char,
        KindTag::String,
        KindTag::Array,
        KindTag::List,
        KindTag::Set,
        KindTag::Map,
        KindTag::NestedMessage,
    ];

    /// Name used in type expressions.
    pub fn name(self) -> &'static str {
        match self {
            KindTag::Bool => "bool",
            KindTag::Byte => "byte",
            KindTag::Short => "short",
            KindTag::Int => "int",
            KindTag::Long => "long",
            KindTag::Float => "float",
            KindTag::Double => "double",
            KindTag::Char => "char",
            KindTag::String => "string",
            KindTag::Array => "array",
            KindTag::List => "list",
            KindTag::Set => "set",
            KindTag::Map => "map",
            KindTag::NestedMessage => "message",
        }
    }
}

impl fmt::Display for KindTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl ValueKind {
    pub fn array(element: ValueKind) -> Self {
        ValueKind::Array(Box::new(element))
    }

    pub fn list(element: ValueKind) -> Self {
        ValueKind::List(Box::new(element))
    }

    pub fn set(element: ValueKind) -> Self {
        ValueKind::Set(Box::new(element))
    }

    pub fn map(key: ValueKind, value: ValueKind) -> Self {
        ValueKind::Map(Box::new(key), Box::new(value))
    }

    /// Dispatch key for this kind.
    pub fn tag(&self) -> KindTag {
        match self {
            ValueKind::Bool => KindTag::Bool,
            ValueKind::Byte => KindTag::Byte,
            ValueKind::Short => KindTag::Short,
            ValueKind::Int => KindTag::Int,
            ValueKind::Long => KindTag::Long,
            ValueKind::Float => KindTag::Float,
            ValueKind::Double => KindTag::Double,
            ValueKind::Char => KindTag::Char,
            ValueKind::String => KindTag::String,
            ValueKind::Array(_) => KindTag::Array,
            ValueKind::List(_) => KindTag::List,
            ValueKind::Set(_) => KindTag::Set,
            ValueKind::Map(_, _) => KindTag::Map,
            ValueKind::NestedMessage(_) => KindTag::NestedMessage,
        }
    }

    /// Direct element kinds, key before value for maps.
    pub fn children(&self) -> Vec<&ValueKind> {
        match self {
            ValueKind::Array(element) | ValueKind::List(element) | ValueKind::Set(element) => {
                vec![element.as_ref()]
            }
            ValueKind::Map(key, value) => vec![key.as_ref(), value.as_ref()],
            _ => Vec::new(),
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(
            self,
            ValueKind::Array(_) | ValueKind::List(_) | ValueKind::Set(_) | ValueKind::Map(_, _)
        )
    }

    /// Number of composite levels wrapping the innermost scalar.
    ///
    /// `int` is 0, `list<int>` is 1, `map<string, list<int>>` is 2.
    pub fn nesting_depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 0usize)];
        while let Some((kind, level)) = stack.pop() {
            if kind.is_composite() {
                deepest = deepest.max(level + 1);
            }
            for child in kind.children() {
                stack.push((child, level + 1));
            }
        }
        deepest
    }

    /// Protocol ids of every nested message reachable from this kind, in
    /// left-to-right order (duplicates kept).
    pub fn nested_protocols(&self) -> Vec<u16> {
        let mut ids = Vec::new();
        let mut stack = vec![self];
        while let Some(kind) = stack.pop() {
            if let ValueKind::NestedMessage(id) = kind {
                ids.push(*id);
            }
            // Reverse so the key side is visited before the value side
            for child in kind.children().into_iter().rev() {
                stack.push(child);
            }
        }
        ids
    }

    /// Parse a type expression that contains no message names.
    pub fn parse(text: &str) -> GenerateResult<ValueKind> {
        Self::parse_with(text, |_| None)
    }

    /// Parse a type expression, resolving bare message names with `resolve`.
    pub fn parse_with<F>(text: &str, resolve: F) -> GenerateResult<ValueKind>
    where
        F: Fn(&str) -> Option<u16>,
    {
        let tokens = tokenize(text)?;
        let mut parser = Parser {
            text,
            tokens,
            pos: 0,
            resolve: &resolve,
        };
        let kind = parser.parse_kind(0)?;
        if parser.pos != parser.tokens.len() {
            return Err(parser.error("trailing input"));
        }
        Ok(kind)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Array(element) => write!(f, "array<{element}>"),
            ValueKind::List(element) => write!(f, "list<{element}>"),
            ValueKind::Set(element) => write!(f, "set<{element}>"),
            ValueKind::Map(key, value) => write!(f, "map<{key}, {value}>"),
            ValueKind::NestedMessage(id) => write!(f, "message<{id}>"),
            scalar => f.write_str(scalar.tag().name()),
        }
    }
}

// ============================================================================
// Type expression parser
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Open,
    Close,
    Comma,
}

fn tokenize(text: &str) -> GenerateResult<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        match c {
            '<' => tokens.push(Token::Open),
            '>' => tokens.push(Token::Close),
            ',' => tokens.push(Token::Comma),
            c if c.is_whitespace() => {}
            c if c.is_alphanumeric() || c == '_' => {
                let mut end = start + c.len_utf8();
                while let Some(&(i, next)) = chars.peek() {
                    if next.is_alphanumeric() || next == '_' {
                        end = i + next.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(text[start..end].to_string()));
            }
            other => {
                return Err(GenerateError::InvalidValueKind(format!(
                    "unexpected character '{other}' in '{text}'"
                )));
            }
        }
    }

    Ok(tokens)
}

struct Parser<'a> {
    text: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    resolve: &'a dyn Fn(&str) -> Option<u16>,
}

impl Parser<'_> {
    fn error(&self, reason: &str) -> GenerateError {
        GenerateError::InvalidValueKind(format!("{reason} in '{}'", self.text))
    }

    fn next_ident(&mut self) -> GenerateResult<String> {
        match self.tokens.get(self.pos) {
            Some(Token::Ident(name)) => {
                self.pos += 1;
                Ok(name.clone())
            }
            _ => Err(self.error("expected a type name")),
        }
    }

    fn expect(&mut self, token: Token, what: &str) -> GenerateResult<()> {
        if self.tokens.get(self.pos) == Some(&token) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(&format!("expected '{what}'")))
        }
    }

    fn parse_kind(&mut self, depth: usize) -> GenerateResult<ValueKind> {
        if depth > MAX_PARSE_DEPTH {
            return Err(self.error("type expression nested too deeply"));
        }

        let name = self.next_ident()?;
        if BUILTIN_NAMES.contains(&name.as_str()) && (self.resolve)(&name).is_some() {
            return Err(self.error(&format!(
                "'{name}' names both a built-in kind and a message"
            )));
        }

        let kind = match name.as_str() {
            "bool" | "boolean" => ValueKind::Bool,
            "byte" => ValueKind::Byte,
            "short" => ValueKind::Short,
            "int" | "integer" => ValueKind::Int,
            "long" => ValueKind::Long,
            "float" => ValueKind::Float,
            "double" => ValueKind::Double,
            "char" | "character" => ValueKind::Char,
            "string" => ValueKind::String,
            "array" => ValueKind::array(self.parse_single_argument(depth)?),
            "list" => ValueKind::list(self.parse_single_argument(depth)?),
            "set" => ValueKind::set(self.parse_single_argument(depth)?),
            "map" => {
                self.expect(Token::Open, "<")?;
                let key = self.parse_kind(depth + 1)?;
                self.expect(Token::Comma, ",")?;
                let value = self.parse_kind(depth + 1)?;
                self.expect(Token::Close, ">")?;
                ValueKind::map(key, value)
            }
            "message" => {
                self.expect(Token::Open, "<")?;
                let id = self.next_ident()?;
                let id = id
                    .parse::<u16>()
                    .map_err(|_| self.error(&format!("invalid protocol id '{id}'")))?;
                self.expect(Token::Close, ">")?;
                ValueKind::NestedMessage(id)
            }
            _ => match (self.resolve)(&name) {
                Some(id) => ValueKind::NestedMessage(id),
                None if BUILTIN_NAMES.contains(&name.to_ascii_lowercase().as_str()) => {
                    return Err(self.error(&format!(
                        "unknown type '{name}' (built-in kinds are lowercase)"
                    )));
                }
                None => return Err(self.error(&format!("unknown type '{name}'"))),
            },
        };

        Ok(kind)
    }

    fn parse_single_argument(&mut self, depth: usize) -> GenerateResult<ValueKind> {
        self.expect(Token::Open, "<")?;
        let element = self.parse_kind(depth + 1)?;
        self.expect(Token::Close, ">")?;
        Ok(element)
    }
}
