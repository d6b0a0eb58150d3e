//! Literal text codec
//!
//! [`represent`] renders a [`Value`] as literal text and [`parse`] reads it
//! back. The grammar is the familiar Python-literal one: `None`, `True`,
//! `False`, numbers, quoted text and `b'...'` bytes, tuples, lists, sets,
//! dicts and `set()`. Nothing else is evaluated.
//!
//! `inf`, `-inf` and `nan` are written and accepted so that every float
//! survives a round trip.

use crate::error::LiteralError;
use crate::value::Value;

/// Containers nested deeper than this are rejected
pub const MAX_DEPTH: usize = 128;

// =============================================================================
// Representation
// =============================================================================

/// Canonical literal text of `value`
///
/// Fails only when a custom value (possibly nested) cannot represent itself.
pub fn represent(value: &Value) -> Result<String, LiteralError> {
    let mut out = String::new();
    write_value(&mut out, value)?;
    Ok(out)
}

fn write_value(out: &mut String, value: &Value) -> Result<(), LiteralError> {
    match value {
        Value::None => out.push_str("None"),
        Value::Bool(true) => out.push_str("True"),
        Value::Bool(false) => out.push_str("False"),
        Value::Int(i) => out.push_str(&i.to_string()),
        Value::Float(f) => out.push_str(&format_float(*f)),
        Value::Str(s) => quote_str(out, s),
        Value::Bytes(b) => quote_bytes(out, b),
        Value::Tuple(items) => {
            out.push('(');
            write_items(out, items)?;
            if items.len() == 1 {
                out.push(',');
            }
            out.push(')');
        }
        Value::List(items) => {
            out.push('[');
            write_items(out, items)?;
            out.push(']');
        }
        Value::Set(items) if items.is_empty() => out.push_str("set()"),
        Value::Set(items) => {
            out.push('{');
            write_items(out, items)?;
            out.push('}');
        }
        Value::Dict(pairs) => {
            out.push('{');
            for (i, (key, item)) in pairs.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_value(out, key)?;
                out.push_str(": ");
                write_value(out, item)?;
            }
            out.push('}');
        }
        Value::Custom(custom) => {
            let text = custom.ty.represent(&custom.inner).map_err(|e| {
                LiteralError::new(format!("cannot represent {}: {}", custom.type_name(), e), 0)
            })?;
            out.push_str(&text);
        }
    }
    Ok(())
}

fn write_items(out: &mut String, items: &[Value]) -> Result<(), LiteralError> {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_value(out, item)?;
    }
    Ok(())
}

fn format_float(f: f64) -> String {
    if f.is_nan() {
        "nan".to_string()
    } else if f.is_infinite() {
        String::from(if f > 0.0 { "inf" } else { "-inf" })
    } else {
        // Debug is the shortest text that parses back to the same f64
        format!("{:?}", f)
    }
}

fn is_printable(c: char) -> bool {
    !(c.is_control() || (c.is_whitespace() && c != ' ') || matches!(c, '\u{200b}'..='\u{200f}' | '\u{feff}'))
}

fn pick_quote(has_single: bool, has_double: bool) -> char {
    if has_single && !has_double {
        '"'
    } else {
        '\''
    }
}

fn quote_str(out: &mut String, s: &str) {
    let quote = pick_quote(s.contains('\''), s.contains('"'));
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if is_printable(c) => out.push(c),
            c => {
                let code = c as u32;
                if code < 0x100 {
                    out.push_str(&format!("\\x{:02x}", code));
                } else if code < 0x10000 {
                    out.push_str(&format!("\\u{:04x}", code));
                } else {
                    out.push_str(&format!("\\U{:08x}", code));
                }
            }
        }
    }
    out.push(quote);
}

fn quote_bytes(out: &mut String, bytes: &[u8]) {
    let quote = pick_quote(bytes.contains(&b'\''), bytes.contains(&b'"'));
    out.push('b');
    out.push(quote);
    for &b in bytes {
        match b {
            b'\\' => out.push_str("\\\\"),
            b'\t' => out.push_str("\\t"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b if b as char == quote => {
                out.push('\\');
                out.push(quote);
            }
            0x20..=0x7e => out.push(b as char),
            b => out.push_str(&format!("\\x{:02x}", b)),
        }
    }
    out.push(quote);
}

// =============================================================================
// Parsing
// =============================================================================

/// Parse literal text into a value, never evaluating anything but literals
pub fn parse(text: &str) -> Result<Value, LiteralError> {
    let mut parser = Parser { src: text, pos: 0, depth: 0 };
    parser.skip_ws();
    if parser.at_end() {
        return Err(LiteralError::new("empty literal", 0));
    }
    let value = parser.expr()?;
    parser.skip_ws();
    if !parser.at_end() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(value)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
}

/// Text being assembled from one or more adjacent string literals
enum Buf {
    Text(String),
    Bytes(Vec<u8>),
}

impl<'a> Parser<'a> {
    fn error(&self, message: impl Into<String>) -> LiteralError {
        LiteralError::new(message, self.pos)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), LiteralError> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.error(format!("expected '{}'", expected)))
        }
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.pos += c.len_utf8();
            } else if c == '\\' && self.peek_at(1) == Some('\n') {
                self.pos += 2;
            } else {
                break;
            }
        }
    }

    fn enter(&mut self) -> Result<(), LiteralError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(self.error("literal nested too deeply"));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    // -------------------------------------------------------------------------
    // Expressions
    // -------------------------------------------------------------------------

    fn expr(&mut self) -> Result<Value, LiteralError> {
        self.skip_ws();
        let mut negative = false;
        let mut signed = false;
        while let Some(c @ ('+' | '-')) = self.peek() {
            self.bump();
            self.skip_ws();
            signed = true;
            negative ^= c == '-';
        }
        if !signed {
            return self.atom();
        }
        let start = self.pos;
        let value = match self.peek() {
            Some(c) if c.is_ascii_digit() || c == '.' => self.number(negative)?,
            Some(c) if c.is_alphabetic() || c == '_' => match self.ident() {
                "inf" if negative => Value::Float(f64::NEG_INFINITY),
                "inf" => Value::Float(f64::INFINITY),
                "nan" => Value::Float(f64::NAN),
                _ => {
                    self.pos = start;
                    return Err(self.error("unary operator applied to a non-number"));
                }
            },
            _ => return Err(self.error("unary operator applied to a non-number")),
        };
        Ok(value)
    }

    fn atom(&mut self) -> Result<Value, LiteralError> {
        match self.peek() {
            None => Err(self.error("unexpected end of literal")),
            Some('(') => self.paren(),
            Some('[') => self.list(),
            Some('{') => self.brace(),
            Some('\'' | '"') => self.strings(),
            Some(c) if c.is_ascii_digit() => self.number(false),
            Some('.') if self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) => self.number(false),
            Some(c) if c.is_alphabetic() || c == '_' => self.named(),
            Some(c) => Err(self.error(format!("unexpected character '{}'", c))),
        }
    }

    fn ident(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        &self.src[start..self.pos]
    }

    fn named(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        let name = self.ident();
        if matches!(self.peek(), Some('\'' | '"')) && is_string_prefix(name) {
            self.pos = start;
            return self.strings();
        }
        match name {
            "None" => Ok(Value::None),
            "True" => Ok(Value::Bool(true)),
            "False" => Ok(Value::Bool(false)),
            "inf" => Ok(Value::Float(f64::INFINITY)),
            "nan" => Ok(Value::Float(f64::NAN)),
            "set" => {
                self.skip_ws();
                self.expect('(')?;
                self.skip_ws();
                self.expect(')')?;
                Ok(Value::Set(Vec::new()))
            }
            other => {
                self.pos = start;
                Err(self.error(format!("'{}' is not a literal", other)))
            }
        }
    }

    // -------------------------------------------------------------------------
    // Numbers
    // -------------------------------------------------------------------------

    fn number(&mut self, negative: bool) -> Result<Value, LiteralError> {
        let start = self.pos;
        let radix = match (self.peek(), self.peek_at(1)) {
            (Some('0'), Some('x' | 'X')) => Some(16),
            (Some('0'), Some('o' | 'O')) => Some(8),
            (Some('0'), Some('b' | 'B')) => Some(2),
            _ => None,
        };

        if let Some(radix) = radix {
            self.pos += 2;
            let digits_start = self.pos;
            while self.peek().is_some_and(|c| c.is_ascii_alphanumeric() || c == '_') {
                self.bump();
            }
            let digits = clean_digits(&self.src[digits_start..self.pos])
                .ok_or_else(|| LiteralError::new("invalid number literal", start))?;
            let magnitude = i128::from_str_radix(&digits, radix)
                .map_err(|_| LiteralError::new("invalid number literal", start))?;
            return signed_int(magnitude, negative, start);
        }

        let mut is_float = false;
        self.digits();
        if self.peek() == Some('.') {
            is_float = true;
            self.bump();
            self.digits();
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            let mark = self.pos;
            self.bump();
            if matches!(self.peek(), Some('+' | '-')) {
                self.bump();
            }
            if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                is_float = true;
                self.digits();
            } else {
                self.pos = mark;
            }
        }
        if matches!(self.peek(), Some('j' | 'J')) {
            return Err(self.error("complex numbers are not supported"));
        }

        let raw = &self.src[start..self.pos];
        let text = clean_digits(raw).ok_or_else(|| LiteralError::new("invalid number literal", start))?;
        if is_float {
            let f: f64 = text
                .parse()
                .map_err(|_| LiteralError::new("invalid float literal", start))?;
            Ok(Value::Float(if negative { -f } else { f }))
        } else {
            if text.len() > 1 && text.starts_with('0') && text.bytes().any(|b| b != b'0') {
                return Err(LiteralError::new("leading zeros in decimal integer literals are not permitted", start));
            }
            let magnitude: i128 = text
                .parse()
                .map_err(|_| LiteralError::new("integer literal out of range", start))?;
            signed_int(magnitude, negative, start)
        }
    }

    fn digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit() || c == '_') {
            self.bump();
        }
    }

    // -------------------------------------------------------------------------
    // Strings
    // -------------------------------------------------------------------------

    /// One string literal plus any adjacent ones it concatenates with
    fn strings(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        let mut buf: Option<Buf> = None;
        loop {
            let prefix_start = self.pos;
            let prefix = self.ident().to_ascii_lowercase();
            if !is_string_prefix(&prefix) || !matches!(self.peek(), Some('\'' | '"')) {
                self.pos = prefix_start;
                break;
            }
            let bytes = prefix.contains('b');
            let raw = prefix.contains('r');
            let same_kind = match &buf {
                None => true,
                Some(Buf::Bytes(_)) => bytes,
                Some(Buf::Text(_)) => !bytes,
            };
            if !same_kind {
                return Err(self.error("cannot mix bytes and nonbytes literals"));
            }
            let target = buf.get_or_insert_with(|| {
                if bytes {
                    Buf::Bytes(Vec::new())
                } else {
                    Buf::Text(String::new())
                }
            });
            self.string_body(target, raw)?;
            self.skip_ws();
        }
        match buf {
            Some(Buf::Text(s)) => Ok(Value::Str(s)),
            Some(Buf::Bytes(b)) => Ok(Value::Bytes(b)),
            None => Err(LiteralError::new("expected string literal", start)),
        }
    }

    fn string_body(&mut self, buf: &mut Buf, raw: bool) -> Result<(), LiteralError> {
        let start = self.pos;
        let quote = self.bump().ok_or_else(|| self.error("expected quote"))?;
        let triple = self.peek() == Some(quote) && self.peek_at(1) == Some(quote);
        if triple {
            self.pos += 2 * quote.len_utf8();
        }

        loop {
            let c = self
                .bump()
                .ok_or_else(|| LiteralError::new("unterminated string literal", start))?;
            if c == quote {
                if !triple {
                    return Ok(());
                }
                if self.peek() == Some(quote) && self.peek_at(1) == Some(quote) {
                    self.pos += 2 * quote.len_utf8();
                    return Ok(());
                }
                push_char(buf, c, self.pos)?;
                continue;
            }
            if c == '\n' && !triple {
                return Err(LiteralError::new("unterminated string literal", start));
            }
            if c != '\\' {
                push_char(buf, c, self.pos)?;
                continue;
            }

            let escape_at = self.pos - 1;
            let next = self
                .bump()
                .ok_or_else(|| LiteralError::new("unterminated string literal", start))?;
            if raw {
                push_char(buf, '\\', escape_at)?;
                push_char(buf, next, self.pos)?;
                continue;
            }
            match next {
                '\n' => {}
                '\\' | '\'' | '"' => push_char(buf, next, self.pos)?,
                'a' => push_code(buf, 0x07, escape_at)?,
                'b' => push_code(buf, 0x08, escape_at)?,
                'f' => push_code(buf, 0x0c, escape_at)?,
                'n' => push_code(buf, 0x0a, escape_at)?,
                'r' => push_code(buf, 0x0d, escape_at)?,
                't' => push_code(buf, 0x09, escape_at)?,
                'v' => push_code(buf, 0x0b, escape_at)?,
                '0'..='7' => {
                    let mut code = next.to_digit(8).unwrap_or(0);
                    for _ in 0..2 {
                        match self.peek().and_then(|c| c.to_digit(8)) {
                            Some(d) => {
                                code = code * 8 + d;
                                self.bump();
                            }
                            None => break,
                        }
                    }
                    push_code(buf, code, escape_at)?;
                }
                'x' => {
                    let code = self.hex_escape(2, escape_at)?;
                    push_code(buf, code, escape_at)?;
                }
                'u' | 'U' if matches!(buf, Buf::Text(_)) => {
                    let width = if next == 'u' { 4 } else { 8 };
                    let code = self.hex_escape(width, escape_at)?;
                    push_code(buf, code, escape_at)?;
                }
                'N' if matches!(buf, Buf::Text(_)) => {
                    return Err(LiteralError::new("named unicode escapes are not supported", escape_at));
                }
                other => {
                    push_char(buf, '\\', escape_at)?;
                    push_char(buf, other, self.pos)?;
                }
            }
        }
    }

    fn hex_escape(&mut self, width: usize, at: usize) -> Result<u32, LiteralError> {
        let end = self.pos + width;
        let digits = self
            .src
            .get(self.pos..end)
            .filter(|d| d.chars().all(|c| c.is_ascii_hexdigit()))
            .ok_or_else(|| LiteralError::new("truncated escape sequence", at))?;
        let code = u32::from_str_radix(digits, 16)
            .map_err(|_| LiteralError::new("invalid escape", at))?;
        self.pos = end;
        Ok(code)
    }

    // -------------------------------------------------------------------------
    // Containers
    // -------------------------------------------------------------------------

    /// Parenthesized expression or tuple
    fn paren(&mut self) -> Result<Value, LiteralError> {
        self.enter()?;
        self.expect('(')?;
        self.skip_ws();
        if self.eat(')') {
            self.leave();
            return Ok(Value::Tuple(Vec::new()));
        }
        let first = self.expr()?;
        self.skip_ws();
        if self.eat(')') {
            self.leave();
            return Ok(first);
        }
        self.expect(',')?;
        let mut items = vec![first];
        self.sequence(')', &mut items)?;
        self.leave();
        Ok(Value::Tuple(items))
    }

    fn list(&mut self) -> Result<Value, LiteralError> {
        self.enter()?;
        self.expect('[')?;
        let mut items = Vec::new();
        self.sequence(']', &mut items)?;
        self.leave();
        Ok(Value::List(items))
    }

    /// Items up to and including `close`, a trailing comma allowed
    fn sequence(&mut self, close: char, items: &mut Vec<Value>) -> Result<(), LiteralError> {
        loop {
            self.skip_ws();
            if self.eat(close) {
                return Ok(());
            }
            items.push(self.expr()?);
            self.skip_ws();
            if self.eat(close) {
                return Ok(());
            }
            self.expect(',')?;
        }
    }

    /// Set or dict
    fn brace(&mut self) -> Result<Value, LiteralError> {
        self.enter()?;
        self.expect('{')?;
        self.skip_ws();
        if self.eat('}') {
            self.leave();
            return Ok(Value::Dict(Vec::new()));
        }

        let first_at = self.pos;
        let first = self.expr()?;
        self.skip_ws();
        let value = if self.eat(':') {
            let first_value = self.expr()?;
            let mut pairs = vec![(hashable(first, first_at)?, first_value)];
            loop {
                self.skip_ws();
                if self.eat('}') {
                    break;
                }
                self.expect(',')?;
                self.skip_ws();
                if self.eat('}') {
                    break;
                }
                let key_at = self.pos;
                let key = hashable(self.expr()?, key_at)?;
                self.skip_ws();
                self.expect(':')?;
                let item = self.expr()?;
                pairs.push((key, item));
            }
            Value::dict(pairs)
        } else {
            let mut members = vec![hashable(first, first_at)?];
            loop {
                self.skip_ws();
                if self.eat('}') {
                    break;
                }
                self.expect(',')?;
                self.skip_ws();
                if self.eat('}') {
                    break;
                }
                let member_at = self.pos;
                members.push(hashable(self.expr()?, member_at)?);
            }
            Value::set(members)
        };
        self.leave();
        Ok(value)
    }
}

fn is_string_prefix(prefix: &str) -> bool {
    matches!(prefix.to_ascii_lowercase().as_str(), "" | "r" | "u" | "b" | "br" | "rb")
}

fn hashable(value: Value, at: usize) -> Result<Value, LiteralError> {
    if value.is_hashable() {
        Ok(value)
    } else {
        Err(LiteralError::new(format!("unhashable type: '{}'", value.type_name()), at))
    }
}

/// Digits with `_` separators removed, `None` if a separator is misplaced
fn clean_digits(raw: &str) -> Option<String> {
    if raw.is_empty() || raw.starts_with('_') || raw.ends_with('_') || raw.contains("__") {
        return None;
    }
    if raw.contains("_.") || raw.contains("._") || raw.contains("_e") || raw.contains("e_") {
        return None;
    }
    Some(raw.replace('_', ""))
}

fn signed_int(magnitude: i128, negative: bool, at: usize) -> Result<Value, LiteralError> {
    let signed = if negative { -magnitude } else { magnitude };
    i64::try_from(signed)
        .map(Value::Int)
        .map_err(|_| LiteralError::new("integer literal out of range", at))
}

fn push_char(buf: &mut Buf, c: char, at: usize) -> Result<(), LiteralError> {
    match buf {
        Buf::Text(s) => s.push(c),
        Buf::Bytes(b) => {
            if !c.is_ascii() {
                return Err(LiteralError::new("bytes can only contain ASCII literal characters", at));
            }
            b.push(c as u8);
        }
    }
    Ok(())
}

fn push_code(buf: &mut Buf, code: u32, at: usize) -> Result<(), LiteralError> {
    match buf {
        Buf::Text(s) => {
            let c = char::from_u32(code)
                .ok_or_else(|| LiteralError::new(format!("invalid code point {:#x}", code), at))?;
            s.push(c);
        }
        Buf::Bytes(b) => {
            let byte = u8::try_from(code)
                .map_err(|_| LiteralError::new("byte escape out of range", at))?;
            b.push(byte);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rt(value: Value) {
        let text = represent(&value).unwrap();
        assert_eq!(parse(&text).unwrap(), value, "round trip through {}", text);
    }

    #[test]
    fn test_represent_matches_literal_conventions() {
        assert_eq!(represent(&Value::Bool(false)).unwrap(), "False");
        assert_eq!(represent(&Value::from("Some string")).unwrap(), "'Some string'");
        assert_eq!(represent(&Value::Int(65535)).unwrap(), "65535");
        assert_eq!(represent(&Value::Float(3.1415)).unwrap(), "3.1415");
        assert_eq!(represent(&Value::bytes(&b"Some bytes"[..])).unwrap(), "b'Some bytes'");
        assert_eq!(
            represent(&Value::tuple([Value::Int(1), Value::Int(2), Value::Int(3), Value::None])).unwrap(),
            "(1, 2, 3, None)"
        );
        assert_eq!(
            represent(&Value::list([Value::Int(-1), Value::Int(0), Value::from("repeat €₽")])).unwrap(),
            "[-1, 0, 'repeat €₽']"
        );
        assert_eq!(represent(&Value::set([Value::from("first")])).unwrap(), "{'first'}");
        assert_eq!(
            represent(&Value::dict([(Value::Int(1), Value::from("one")), (Value::Int(2), Value::from("two"))])).unwrap(),
            "{1: 'one', 2: 'two'}"
        );
    }

    #[test]
    fn test_represent_edge_shapes() {
        assert_eq!(represent(&Value::tuple([])).unwrap(), "()");
        assert_eq!(represent(&Value::tuple([Value::Int(1)])).unwrap(), "(1,)");
        assert_eq!(represent(&Value::set([])).unwrap(), "set()");
        assert_eq!(represent(&Value::dict([])).unwrap(), "{}");
        assert_eq!(represent(&Value::Float(1.0)).unwrap(), "1.0");
        assert_eq!(represent(&Value::Float(f64::NEG_INFINITY)).unwrap(), "-inf");
    }

    #[test]
    fn test_quote_selection_and_escapes() {
        assert_eq!(represent(&Value::from("it's")).unwrap(), "\"it's\"");
        assert_eq!(represent(&Value::from("a'b\"c")).unwrap(), "'a\\'b\"c'");
        assert_eq!(represent(&Value::from("tab\there\n")).unwrap(), "'tab\\there\\n'");
        assert_eq!(represent(&Value::from("\u{7}")).unwrap(), "'\\x07'");
        assert_eq!(represent(&Value::bytes(vec![0u8, 0xff, b'a'])).unwrap(), "b'\\x00\\xffa'");
    }

    #[test]
    fn test_round_trips() {
        rt(Value::from("quotes ' and \" and \\ backslash"));
        rt(Value::from("control \u{1} \u{2028} and astral \u{1F600}"));
        rt(Value::bytes((0u8..=255).collect::<Vec<_>>()));
        rt(Value::Float(0.1));
        rt(Value::Float(1e300));
        rt(Value::Float(-2.5e-10));
        rt(Value::Int(i64::MIN));
        rt(Value::Int(i64::MAX));
        rt(Value::tuple([Value::tuple([]), Value::list([Value::set([])]), Value::dict([])]));
        rt(Value::dict([(Value::tuple([Value::Int(1), Value::Bool(true)]), Value::None)]));
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(parse("0xff").unwrap(), Value::Int(255));
        assert_eq!(parse("0o17").unwrap(), Value::Int(15));
        assert_eq!(parse("-0b101").unwrap(), Value::Int(-5));
        assert_eq!(parse("1_000").unwrap(), Value::Int(1000));
        assert_eq!(parse("--3").unwrap(), Value::Int(3));
        assert_eq!(parse(".5").unwrap(), Value::Float(0.5));
        assert_eq!(parse("5.").unwrap(), Value::Float(5.0));
        assert_eq!(parse("1e3").unwrap(), Value::Float(1000.0));
        assert_eq!(parse("-inf").unwrap(), Value::Float(f64::NEG_INFINITY));
        assert!(parse("01").is_err());
        assert!(parse("9223372036854775808").is_err());
        assert!(parse("1j").is_err());
    }

    #[test]
    fn test_parse_strings() {
        assert_eq!(parse("'a' \"b\"").unwrap(), Value::from("ab"));
        assert_eq!(parse("r'\\n'").unwrap(), Value::from("\\n"));
        assert_eq!(parse("'''multi\nline'''").unwrap(), Value::from("multi\nline"));
        assert_eq!(parse("'\\u20ac\\x41\\101'").unwrap(), Value::from("€AA"));
        assert_eq!(parse("B'\\x00'").unwrap(), Value::bytes(vec![0u8]));
        assert!(parse("b'€'").is_err());
        assert!(parse("'a' b'b'").is_err());
        assert!(parse("'unterminated").is_err());
        assert!(parse("f'x'").is_err());
    }

    #[test]
    fn test_parse_containers() {
        assert_eq!(parse("(1)").unwrap(), Value::Int(1));
        assert_eq!(parse("(1,)").unwrap(), Value::tuple([Value::Int(1)]));
        assert_eq!(parse("[1, 2,]").unwrap(), Value::list([Value::Int(1), Value::Int(2)]));
        assert_eq!(parse("{1, 1, 2}").unwrap(), Value::set([Value::Int(1), Value::Int(2)]));
        assert_eq!(parse("set( )").unwrap(), Value::set([]));
        assert_eq!(
            parse("{1: 'a', 1: 'b'}").unwrap(),
            Value::dict([(Value::Int(1), Value::from("b"))])
        );
        assert!(parse("{[1]: 2}").is_err());
        assert!(parse("{[1]}").is_err());
        assert!(parse("[1 2]").is_err());
    }

    #[test]
    fn test_rejects_non_literals() {
        assert!(parse("").is_err());
        assert!(parse("   ").is_err());
        assert!(parse("Eval it!").is_err());
        assert!(parse("__import__('os')").is_err());
        assert!(parse("1 + 2").is_err());
        assert!(parse("-'a'").is_err());
        assert!(parse("some_path").is_err());
    }

    #[test]
    fn test_depth_limit() {
        let deep = format!("{}{}", "[".repeat(MAX_DEPTH + 1), "]".repeat(MAX_DEPTH + 1));
        assert!(parse(&deep).is_err());
        let fine = format!("{}{}", "[".repeat(MAX_DEPTH), "]".repeat(MAX_DEPTH));
        assert!(parse(&fine).is_ok());
    }
}
