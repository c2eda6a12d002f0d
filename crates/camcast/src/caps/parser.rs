// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 camcast contributors

//! Parser for the runtime's textual capability serialization.
//!
//! Grammar accepted (whitespace is free between tokens):
//!
//! ```text
//! caps      := "ANY" | "EMPTY" | "NONE" | structure (";" structure)* [";"]
//! structure := name ["(" features ")"] ("," key "=" value)*
//! value     := ["(" type ")"] ( "{" values "}" | "<" values ">"
//!                             | "[" ... "]" | quoted | bare )
//! ```

use super::value::{CapValue, CapsSet, Scalar, Structure};
use crate::{fraction::Fraction, Error};

/// Parse a capability set such as
/// `video/x-raw, format=(string)NV12, width=(int)640; image/jpeg, width=(int)640`.
///
/// `ANY`, `EMPTY`, `NONE` and blank input all produce an empty set.
pub fn parse_caps(text: &str) -> Result<CapsSet, Error> {
    if matches!(text.trim(), "" | "ANY" | "EMPTY" | "NONE") {
        return Ok(CapsSet::new());
    }

    let mut cur = Cursor::new(text);
    let mut caps = CapsSet::new();
    loop {
        cur.skip_ws();
        if cur.at_end() {
            break;
        }
        caps.push(structure(&mut cur)?);
        cur.skip_ws();
        match cur.peek() {
            None => break,
            Some(b';') => cur.bump(),
            Some(_) => return Err(cur.error("expected ';' between structures")),
        }
    }

    log::trace!("parsed {} caps structures", caps.len());
    Ok(caps)
}

/// Parse a single structure, e.g. a device property set such as
/// `v4l2deviceprovider, device.path=(string)/dev/video0`.
pub fn parse_structure(text: &str) -> Result<Structure, Error> {
    let mut cur = Cursor::new(text);
    let st = structure(&mut cur)?;
    cur.skip_ws();
    cur.eat(b';');
    cur.skip_ws();
    if !cur.at_end() {
        return Err(cur.error("trailing input after structure"));
    }
    Ok(st)
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str) -> Self {
        Cursor { src, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b) if b.is_ascii_whitespace()) {
            self.bump();
        }
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, byte: u8) -> Result<(), Error> {
        if self.eat(byte) {
            Ok(())
        } else {
            Err(self.error(&format!("expected '{}'", byte as char)))
        }
    }

    // Delimiters are ASCII, so slicing at these byte offsets never splits a
    // multi-byte character.
    fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a str {
        let start = self.pos;
        while matches!(self.peek(), Some(b) if pred(b)) {
            self.bump();
        }
        &self.src[start..self.pos]
    }

    fn error(&self, message: &str) -> Error {
        Error::CapsSyntax {
            position: self.pos,
            message: message.to_string(),
        }
    }
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'/' | b'-' | b'_' | b'.' | b':' | b'+')
}

fn structure(cur: &mut Cursor) -> Result<Structure, Error> {
    cur.skip_ws();
    let name = cur.take_while(is_name_byte);
    if name.is_empty() {
        return Err(cur.error("expected structure name"));
    }

    let mut st = Structure::new(name);
    if cur.eat(b'(') {
        let features = cur.take_while(|b| b != b')');
        cur.expect(b')')?;
        st = st.with_features(features.trim());
    }

    loop {
        cur.skip_ws();
        if !cur.eat(b',') {
            break;
        }
        cur.skip_ws();
        let key = cur.take_while(|b| {
            !b.is_ascii_whitespace() && !matches!(b, b'=' | b',' | b';')
        });
        if key.is_empty() {
            return Err(cur.error("expected field name"));
        }
        cur.skip_ws();
        cur.expect(b'=')?;
        let val = field_value(cur, None)?;
        st.insert(key, val);
    }

    Ok(st)
}

fn field_value(cur: &mut Cursor, inherited: Option<&str>) -> Result<CapValue, Error> {
    cur.skip_ws();
    let ty = if cur.eat(b'(') {
        let annotated = cur.take_while(|b| b != b')').trim();
        cur.expect(b')')?;
        Some(annotated)
    } else {
        inherited
    };

    cur.skip_ws();
    match cur.peek() {
        Some(b'{') => {
            cur.bump();
            Ok(CapValue::List(sequence(cur, b'}', ty)?))
        }
        Some(b'<') => {
            cur.bump();
            Ok(CapValue::Array(sequence(cur, b'>', ty)?))
        }
        Some(b'[') => Ok(CapValue::Scalar(Scalar::Unsupported(range(cur)?))),
        Some(b'"') => {
            let text = quoted(cur)?;
            Ok(CapValue::Scalar(typed(ty, text, true)))
        }
        Some(_) => {
            let text = bare(cur);
            if text.is_empty() {
                return Err(cur.error("expected value"));
            }
            Ok(CapValue::Scalar(typed(ty, text, false)))
        }
        None => Err(cur.error("unexpected end of input")),
    }
}

fn sequence(cur: &mut Cursor, close: u8, ty: Option<&str>) -> Result<Vec<CapValue>, Error> {
    let mut items = Vec::new();
    cur.skip_ws();
    if cur.eat(close) {
        return Ok(items);
    }
    loop {
        items.push(field_value(cur, ty)?);
        cur.skip_ws();
        if cur.eat(b',') {
            continue;
        }
        if cur.eat(close) {
            return Ok(items);
        }
        return Err(cur.error(&format!("expected ',' or '{}'", close as char)));
    }
}

/// Skip a `[ ... ]` range, returning its raw text.
fn range(cur: &mut Cursor) -> Result<String, Error> {
    let start = cur.pos;
    let mut depth = 0usize;
    while let Some(b) = cur.peek() {
        cur.bump();
        match b {
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(cur.src[start..cur.pos].to_string());
                }
            }
            _ => {}
        }
    }
    Err(cur.error("unterminated range"))
}

fn quoted(cur: &mut Cursor) -> Result<String, Error> {
    cur.expect(b'"')?;
    let start = cur.pos;
    let mut escaped = false;
    while let Some(b) = cur.peek() {
        if escaped {
            escaped = false;
        } else if b == b'\\' {
            escaped = true;
        } else if b == b'"' {
            let raw = &cur.src[start..cur.pos];
            cur.bump();
            return Ok(unescape(raw));
        }
        cur.bump();
    }
    Err(cur.error("unterminated string"))
}

fn bare(cur: &mut Cursor) -> String {
    let start = cur.pos;
    let mut escaped = false;
    while let Some(b) = cur.peek() {
        if escaped {
            escaped = false;
        } else if b == b'\\' {
            escaped = true;
        } else if matches!(b, b',' | b';' | b'}' | b'>' | b']') {
            break;
        }
        cur.bump();
    }
    unescape(cur.src[start..cur.pos].trim_end())
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

fn typed(ty: Option<&str>, text: String, was_quoted: bool) -> Scalar {
    match ty {
        Some("string" | "s" | "gchararray") => Scalar::Str(text),
        Some("int" | "i" | "uint" | "u" | "int64" | "uint64" | "gint" | "guint") => {
            match text.parse::<i64>() {
                Ok(i) => Scalar::Int(i),
                Err(_) => Scalar::Unsupported(text),
            }
        }
        Some("fraction") => match Fraction::parse(&text) {
            Ok(f) => Scalar::Fraction(f),
            Err(_) => Scalar::Unsupported(text),
        },
        Some(_) => Scalar::Unsupported(text),
        None if was_quoted => Scalar::Str(text),
        None => infer(text),
    }
}

fn infer(text: String) -> Scalar {
    if let Ok(i) = text.parse::<i64>() {
        return Scalar::Int(i);
    }
    if text.contains('/') {
        if let Ok(f) = Fraction::parse(&text) {
            return Scalar::Fraction(f);
        }
    }
    Scalar::Str(text)
}
