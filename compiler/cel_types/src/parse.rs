//! Textual type syntax.
//!
//! Accepts exactly what [`Type`]'s `Display` prints, so declaration tables
//! can be written as strings:
//!
//! ```text
//! int  list(T)  map(string, dyn)  optional_type(A)  type(int)  type
//! google.protobuf.Timestamp  my.pkg.Message  vector(int)  !error!
//! ```
//!
//! A single upper-case letter is a type parameter, as is a dot-free name
//! starting with `_` (the spelling of inference variables such as `_var0`).
//! A name applied to parameters that is not built in is opaque, including
//! `token()` with none; any other bare name is a message type.

use std::str::FromStr;

use thiserror::Error;

use crate::{Type, DURATION_TYPE_NAME, TIMESTAMP_TYPE_NAME};

/// Why a type string was rejected.
#[derive(Clone, Eq, PartialEq, Debug, Error)]
pub enum ParseTypeError {
    #[error("empty type")]
    Empty,
    #[error("unexpected character '{found}' at offset {offset}")]
    UnexpectedChar { found: char, offset: usize },
    #[error("unexpected end of type, expected {expected}")]
    UnexpectedEnd { expected: &'static str },
    #[error("'{name}' takes {expected} type parameter(s), found {found}")]
    Arity {
        name: String,
        expected: usize,
        found: usize,
    },
}

impl FromStr for Type {
    type Err = ParseTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser { src: s, pos: 0 };
        parser.skip_ws();
        if parser.at_end() {
            return Err(ParseTypeError::Empty);
        }
        let ty = parser.parse_type()?;
        parser.skip_ws();
        match parser.peek() {
            None => Ok(ty),
            Some(found) => Err(ParseTypeError::UnexpectedChar {
                found,
                offset: parser.pos,
            }),
        }
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek().filter(|c| c.is_whitespace()) {
            self.pos += c.len_utf8();
        }
    }

    /// `segment ('.' segment)*`, or the literal `!error!`.
    fn parse_name(&mut self) -> Result<&str, ParseTypeError> {
        let start = self.pos;
        if self.src[start..].starts_with("!error!") {
            self.pos += "!error!".len();
            return Ok(&self.src[start..self.pos]);
        }
        loop {
            match self.peek() {
                Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
                Some(found) => {
                    return Err(ParseTypeError::UnexpectedChar {
                        found,
                        offset: self.pos,
                    })
                }
                None => return Err(ParseTypeError::UnexpectedEnd { expected: "a name" }),
            }
            while self
                .peek()
                .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
            {
                self.pos += 1;
            }
            if self.peek() == Some('.') {
                self.pos += 1;
            } else {
                break;
            }
        }
        Ok(&self.src[start..self.pos])
    }

    fn parse_type(&mut self) -> Result<Type, ParseTypeError> {
        self.skip_ws();
        let name = self.parse_name()?.to_owned();
        self.skip_ws();
        let params = if self.peek() == Some('(') {
            self.pos += 1;
            Some(self.parse_params()?)
        } else {
            None
        };
        build(name, params)
    }

    fn parse_params(&mut self) -> Result<Vec<Type>, ParseTypeError> {
        let mut params = Vec::new();
        self.skip_ws();
        if self.peek() == Some(')') {
            self.pos += 1;
            return Ok(params);
        }
        loop {
            params.push(self.parse_type()?);
            self.skip_ws();
            match self.bump() {
                Some(',') => {}
                Some(')') => return Ok(params),
                Some(found) => {
                    return Err(ParseTypeError::UnexpectedChar {
                        found,
                        offset: self.pos - found.len_utf8(),
                    })
                }
                None => return Err(ParseTypeError::UnexpectedEnd { expected: "',' or ')'" }),
            }
        }
    }
}

fn build(name: String, params: Option<Vec<Type>>) -> Result<Type, ParseTypeError> {
    let Some(mut params) = params else {
        return bare(name);
    };
    let Some(expected) = builtin_arity(&name) else {
        return Ok(Type::Opaque { name, params });
    };
    if params.len() != expected {
        return Err(ParseTypeError::Arity {
            name,
            expected,
            found: params.len(),
        });
    }
    let first = params.remove(0);
    Ok(match name.as_str() {
        "list" => Type::list(first),
        "optional_type" => Type::optional(first),
        "type" => Type::type_of(first),
        _ => Type::map(first, params.remove(0)),
    })
}

/// A name written without parameters.
fn bare(name: String) -> Result<Type, ParseTypeError> {
    let builtin = match name.as_str() {
        "dyn" => Some(Type::Dyn),
        "!error!" => Some(Type::Error),
        "null_type" => Some(Type::Null),
        "bool" => Some(Type::Bool),
        "int" => Some(Type::Int),
        "uint" => Some(Type::Uint),
        "double" => Some(Type::Double),
        "string" => Some(Type::String),
        "bytes" => Some(Type::Bytes),
        "type" => Some(Type::type_of(Type::Dyn)),
        DURATION_TYPE_NAME => Some(Type::Duration),
        TIMESTAMP_TYPE_NAME => Some(Type::Timestamp),
        _ => None,
    };
    if let (None, Some(expected)) = (&builtin, builtin_arity(&name)) {
        return Err(ParseTypeError::Arity {
            name,
            expected,
            found: 0,
        });
    }
    Ok(match builtin {
        Some(ty) => ty,
        None if is_type_param_name(&name) => Type::TypeParam(name),
        None => Type::Struct(name),
    })
}

/// Parameter count of the built-in parametric names. Bare `type` is
/// accepted as `type(dyn)` and handled before this is consulted.
fn builtin_arity(name: &str) -> Option<usize> {
    match name {
        "list" | "optional_type" | "type" => Some(1),
        "map" => Some(2),
        _ => None,
    }
}

fn is_type_param_name(name: &str) -> bool {
    if name.starts_with('_') {
        return !name.contains('.');
    }
    let mut chars = name.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_ascii_uppercase())
}

#[cfg(test)]
mod tests;
