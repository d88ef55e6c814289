//! Token reader: the pull-based half of the JSON collaborator interface.

use crate::{JsonError, JsonToken};

/// Pull-based JSON token stream.
///
/// `next_token` returns `Ok(None)` once the root value is complete.
pub trait TokenReader {
    fn next_token(&mut self) -> Result<Option<JsonToken>, JsonError>;

    /// The token the reader is positioned on.
    fn current_token(&self) -> Option<JsonToken>;

    /// Field name owning the current token, inside an object.
    fn current_name(&self) -> Option<&str>;

    /// Text of the current string, number or field name token.
    fn text(&self) -> &str;

    fn i64_value(&self) -> Result<i64, JsonError>;

    fn f64_value(&self) -> Result<f64, JsonError>;

    /// When positioned on a start token, advances to the matching end token.
    /// A no-op on any other token.
    fn skip_children(&mut self) -> Result<(), JsonError> {
        if !matches!(
            self.current_token(),
            Some(JsonToken::StartObject | JsonToken::StartArray)
        ) {
            return Ok(());
        }
        let mut depth = 1usize;
        while depth > 0 {
            match self.next_token()? {
                Some(JsonToken::StartObject | JsonToken::StartArray) => depth += 1,
                Some(JsonToken::EndObject | JsonToken::EndArray) => depth -= 1,
                Some(_) => {}
                None => return Err(JsonError::UnexpectedEnd),
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Object,
    Array,
}

#[derive(Debug)]
struct Frame {
    scope: Scope,
    has_members: bool,
    name: Option<String>,
}

/// [`TokenReader`] over an in-memory UTF-8 document.
pub struct JsonReader<'a> {
    data: &'a [u8],
    x: usize,
    frames: Vec<Frame>,
    after_name: bool,
    root_started: bool,
    token: Option<JsonToken>,
    token_start: usize,
    text: String,
}

impl<'a> JsonReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            x: 0,
            frames: Vec::new(),
            after_name: false,
            root_started: false,
            token: None,
            token_start: 0,
            text: String::new(),
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.data.get(self.x) {
            self.x += 1;
        }
    }

    fn peek(&self) -> Result<u8, JsonError> {
        self.data.get(self.x).copied().ok_or(JsonError::UnexpectedEnd)
    }

    fn emit(&mut self, token: JsonToken) -> Result<Option<JsonToken>, JsonError> {
        self.token = Some(token);
        Ok(Some(token))
    }

    fn read_value(&mut self) -> Result<Option<JsonToken>, JsonError> {
        self.skip_whitespace();
        self.token_start = self.x;
        self.text.clear();
        match self.peek()? {
            b'{' => {
                self.x += 1;
                self.frames.push(Frame { scope: Scope::Object, has_members: false, name: None });
                self.emit(JsonToken::StartObject)
            }
            b'[' => {
                self.x += 1;
                self.frames.push(Frame { scope: Scope::Array, has_members: false, name: None });
                self.emit(JsonToken::StartArray)
            }
            b'"' => {
                self.text = self.read_str()?;
                self.emit(JsonToken::String)
            }
            b't' => self.read_literal("true", JsonToken::True),
            b'f' => self.read_literal("false", JsonToken::False),
            b'n' => self.read_literal("null", JsonToken::Null),
            b'-' | b'0'..=b'9' => {
                self.read_num()?;
                self.emit(JsonToken::Number)
            }
            _ => Err(JsonError::Invalid(self.x)),
        }
    }

    fn read_literal(&mut self, literal: &str, token: JsonToken) -> Result<Option<JsonToken>, JsonError> {
        let end = self.x + literal.len();
        match self.data.get(self.x..end) {
            Some(bytes) if bytes == literal.as_bytes() => {
                self.x = end;
                self.text.push_str(literal);
                self.emit(token)
            }
            Some(_) => Err(JsonError::Invalid(self.x)),
            None => Err(JsonError::UnexpectedEnd),
        }
    }

    fn read_num(&mut self) -> Result<(), JsonError> {
        let start = self.x;
        let data = self.data;
        let digits = |mut x: usize| -> usize {
            while x < data.len() && data[x].is_ascii_digit() {
                x += 1;
            }
            x
        };
        let mut x = start;
        if data.get(x) == Some(&b'-') {
            x += 1;
        }
        let int_end = digits(x);
        if int_end == x {
            return Err(JsonError::Invalid(start));
        }
        x = int_end;
        if data.get(x) == Some(&b'.') {
            let frac_end = digits(x + 1);
            if frac_end == x + 1 {
                return Err(JsonError::Invalid(x));
            }
            x = frac_end;
        }
        if let Some(b'e' | b'E') = data.get(x) {
            x += 1;
            if let Some(b'+' | b'-') = data.get(x) {
                x += 1;
            }
            let exp_end = digits(x);
            if exp_end == x {
                return Err(JsonError::Invalid(x));
            }
            x = exp_end;
        }
        let text = std::str::from_utf8(&data[start..x]).map_err(|_| JsonError::InvalidUtf8)?;
        self.text.push_str(text);
        self.x = x;
        Ok(())
    }

    fn read_str(&mut self) -> Result<String, JsonError> {
        if self.peek()? != b'"' {
            return Err(JsonError::Invalid(self.x));
        }
        let x0 = self.x + 1;
        let x1 = find_ending_quote(self.data, x0)?;
        let value = decode_json_string(&self.data[x0..x1], x0)?;
        self.x = x1 + 1;
        Ok(value)
    }

    /// Consumes `,` between members, or rejects a missing one.
    fn member_separator(&mut self) -> Result<(), JsonError> {
        let needs_comma = self.frames.last().is_some_and(|f| f.has_members);
        if needs_comma {
            if self.peek()? != b',' {
                return Err(JsonError::Invalid(self.x));
            }
            self.x += 1;
            self.skip_whitespace();
        }
        if let Some(frame) = self.frames.last_mut() {
            frame.has_members = true;
        }
        Ok(())
    }

    fn close(&mut self, token: JsonToken) -> Result<Option<JsonToken>, JsonError> {
        self.x += 1;
        self.frames.pop();
        self.text.clear();
        self.emit(token)
    }
}

impl TokenReader for JsonReader<'_> {
    fn next_token(&mut self) -> Result<Option<JsonToken>, JsonError> {
        self.skip_whitespace();
        if self.after_name {
            if self.peek()? != b':' {
                return Err(JsonError::Invalid(self.x));
            }
            self.x += 1;
            self.after_name = false;
            return self.read_value();
        }
        let scope = self.frames.last().map(|f| f.scope);
        match scope {
            None => {
                if self.root_started {
                    if self.x < self.data.len() {
                        return Err(JsonError::Invalid(self.x));
                    }
                    self.token = None;
                    return Ok(None);
                }
                if self.x >= self.data.len() {
                    return Ok(None);
                }
                self.root_started = true;
                self.read_value()
            }
            Some(Scope::Object) => {
                if self.peek()? == b'}' {
                    return self.close(JsonToken::EndObject);
                }
                self.member_separator()?;
                self.token_start = self.x;
                let name = self.read_str()?;
                self.text.clear();
                self.text.push_str(&name);
                if let Some(frame) = self.frames.last_mut() {
                    frame.name = Some(name);
                }
                self.after_name = true;
                self.emit(JsonToken::FieldName)
            }
            Some(Scope::Array) => {
                if self.peek()? == b']' {
                    return self.close(JsonToken::EndArray);
                }
                self.member_separator()?;
                self.read_value()
            }
        }
    }

    fn current_token(&self) -> Option<JsonToken> {
        self.token
    }

    fn current_name(&self) -> Option<&str> {
        // A start token belongs to the enclosing object, not the one it opens.
        let owner = match self.token {
            Some(JsonToken::StartObject | JsonToken::StartArray) => self.frames.len().checked_sub(2),
            _ => self.frames.len().checked_sub(1),
        }?;
        let frame = &self.frames[owner];
        match frame.scope {
            Scope::Object => frame.name.as_deref(),
            Scope::Array => None,
        }
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn i64_value(&self) -> Result<i64, JsonError> {
        match self.token {
            Some(JsonToken::Number) => self.text.parse().map_err(|_| JsonError::Invalid(self.token_start)),
            _ => Err(JsonError::Invalid(self.token_start)),
        }
    }

    fn f64_value(&self) -> Result<f64, JsonError> {
        match self.token {
            Some(JsonToken::Number) => self.text.parse().map_err(|_| JsonError::Invalid(self.token_start)),
            _ => Err(JsonError::Invalid(self.token_start)),
        }
    }
}

/// Index of the closing quote of a string body starting at `x`.
fn find_ending_quote(data: &[u8], mut x: usize) -> Result<usize, JsonError> {
    while x < data.len() {
        match data[x] {
            b'"' => return Ok(x),
            b'\\' => x += 2,
            _ => x += 1,
        }
    }
    Err(JsonError::UnexpectedEnd)
}

/// Decodes a string body (between the quotes), handling escape sequences.
fn decode_json_string(bytes: &[u8], start: usize) -> Result<String, JsonError> {
    if !bytes.contains(&b'\\') {
        return std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| JsonError::InvalidUtf8);
    }
    let mut quoted = Vec::with_capacity(bytes.len() + 2);
    quoted.push(b'"');
    quoted.extend_from_slice(bytes);
    quoted.push(b'"');
    serde_json::from_slice(&quoted).map_err(|_| JsonError::Invalid(start))
}
