// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Path grammar.
//!
//! ```text
//! path    := segment ('.' segment)*
//! segment := identifier ('[' index ']')*
//! index   := integer | '"' escaped-string '"'
//! ```

use crate::config::MAX_PATH_DEPTH;
use crate::error::PathError;
use std::fmt;

/// One parsed path token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Property identifier.
    Property(String),
    /// Bracketed integer.
    Index(usize),
    /// Bracketed quoted string, unescaped.
    Key(String),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Property(id) => f.write_str(id),
            Self::Index(i) => write!(f, "[{}]", i),
            Self::Key(k) => write!(f, "[\"{}\"]", escape(k)),
        }
    }
}

/// Escape `"` and `\` for use inside a quoted key.
pub fn escape(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for c in key.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Render segments back into path text.
pub fn format(segments: &[Segment]) -> String {
    let mut out = String::new();
    for segment in segments {
        if matches!(segment, Segment::Property(_)) && !out.is_empty() {
            out.push('.');
        }
        out.push_str(&segment.to_string());
    }
    out
}

struct Parser<'a> {
    path: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl Parser<'_> {
    fn syntax(&self) -> PathError {
        PathError::Syntax {
            path: self.path.to_string(),
            position: self.pos,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn expect(&mut self, byte: u8) -> Result<(), PathError> {
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.syntax())
        }
    }

    fn identifier(&mut self) -> Result<String, PathError> {
        let start = self.pos;
        match self.peek() {
            Some(c) if c.is_ascii_alphabetic() || c == b'_' => {}
            _ => return Err(self.syntax()),
        }
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == b'_') {
            self.pos += 1;
        }
        Ok(self.path[start..self.pos].to_string())
    }

    fn integer(&mut self) -> Result<usize, PathError> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.pos += 1;
        }
        self.path[start..self.pos].parse().map_err(|_| PathError::Syntax {
            path: self.path.to_string(),
            position: start,
        })
    }

    /// Quoted key after the opening quote, up to and including the closing one.
    fn key(&mut self) -> Result<String, PathError> {
        let mut key = String::new();
        let rest = &self.path[self.pos..];
        let mut chars = rest.char_indices();
        while let Some((offset, c)) = chars.next() {
            match c {
                '"' => {
                    self.pos += offset + 1;
                    return Ok(key);
                }
                '\\' => match chars.next() {
                    Some((_, e @ ('"' | '\\'))) => key.push(e),
                    _ => {
                        self.pos += offset;
                        return Err(self.syntax());
                    }
                },
                c => key.push(c),
            }
        }
        self.pos = self.bytes.len();
        Err(self.syntax())
    }

    fn bracket(&mut self) -> Result<Segment, PathError> {
        self.expect(b'[')?;
        let segment = match self.peek() {
            Some(b'"') => {
                self.pos += 1;
                Segment::Key(self.key()?)
            }
            Some(c) if c.is_ascii_digit() => Segment::Index(self.integer()?),
            _ => return Err(self.syntax()),
        };
        self.expect(b']')?;
        Ok(segment)
    }
}

/// Split `path` into segments.
///
/// An empty path yields no segments. A leading bracket addresses the root
/// struct's iterator property.
///
/// # Errors
///
/// `Syntax` with the byte offset of the first malformed token, or when the
/// path has more than [`MAX_PATH_DEPTH`] segments.
pub fn parse(path: &str) -> Result<Vec<Segment>, PathError> {
    let mut parser = Parser {
        path,
        bytes: path.as_bytes(),
        pos: 0,
    };
    let mut segments = Vec::new();
    if path.is_empty() {
        return Ok(segments);
    }

    loop {
        if parser.peek() != Some(b'[') || !segments.is_empty() {
            segments.push(Segment::Property(parser.identifier()?));
        }
        while parser.peek() == Some(b'[') {
            segments.push(parser.bracket()?);
        }
        if segments.len() > MAX_PATH_DEPTH {
            return Err(parser.syntax());
        }
        match parser.peek() {
            None => return Ok(segments),
            Some(b'.') => parser.pos += 1,
            Some(_) => return Err(parser.syntax()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mixed_segments() {
        let segments = parse(r#"uv_layers["UVMap"].data[3]"#).expect("valid");
        assert_eq!(
            segments,
            vec![
                Segment::Property("uv_layers".into()),
                Segment::Key("UVMap".into()),
                Segment::Property("data".into()),
                Segment::Index(3),
            ]
        );
    }

    #[test]
    fn test_escaped_key_round_trip() {
        let key = "say \"hi\" \\ bye";
        let path = format(&[Segment::Property("items".into()), Segment::Key(key.into())]);
        assert_eq!(path, r#"items["say \"hi\" \\ bye"]"#);
        assert_eq!(parse(&path).expect("valid")[1], Segment::Key(key.into()));
    }

    #[test]
    fn test_leading_bracket_and_chained_indices() {
        assert_eq!(parse("[2]").expect("valid"), vec![Segment::Index(2)]);
        assert_eq!(
            parse("matrix[1][2]").expect("valid"),
            vec![
                Segment::Property("matrix".into()),
                Segment::Index(1),
                Segment::Index(2),
            ]
        );
        assert!(parse("").expect("empty").is_empty());
    }

    #[test]
    fn test_syntax_errors_report_position() {
        let cases = [
            ("a..b", 2),
            ("a.", 2),
            ("a[", 2),
            ("a[]", 2),
            ("a[-1]", 2),
            ("a[\"x]", 5),
            ("a[\"\\n\"]", 3),
            ("a b", 1),
            ("1a", 0),
            ("a[1]b", 4),
        ];
        for (path, position) in cases {
            match parse(path) {
                Err(PathError::Syntax { position: p, .. }) => assert_eq!(p, position, "{}", path),
                other => panic!("{}: expected syntax error, got {:?}", path, other),
            }
        }
    }

    #[test]
    fn test_depth_limit() {
        let deep = vec!["a"; MAX_PATH_DEPTH + 1].join(".");
        assert!(matches!(parse(&deep), Err(PathError::Syntax { .. })));
        let ok = vec!["a"; MAX_PATH_DEPTH].join(".");
        assert_eq!(parse(&ok).expect("at limit").len(), MAX_PATH_DEPTH);
    }

    #[test]
    fn test_integer_overflow_is_syntax() {
        let path = format!("a[{}0]", usize::MAX);
        assert!(matches!(parse(&path), Err(PathError::Syntax { position: 2, .. })));
    }
}
