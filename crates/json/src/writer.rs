//! Token writer: the emitting half of the JSON collaborator interface.

use datameta_buffers::{BinarySink, Writer};

/// Emits JSON structure and scalars in document order.
///
/// Implementations insert separators; callers only describe structure.
pub trait TokenWriter {
    fn start_object(&mut self);
    fn end_object(&mut self);
    fn start_array(&mut self);
    fn end_array(&mut self);
    fn field_name(&mut self, name: &str);
    fn string(&mut self, value: &str);
    fn i64(&mut self, value: i64);
    fn f64(&mut self, value: f64);
    /// Writes pre-formatted number text verbatim, e.g. an arbitrary-precision decimal.
    fn number_text(&mut self, text: &str);
    fn bool(&mut self, value: bool);
    fn null(&mut self);

    fn string_field(&mut self, name: &str, value: &str) {
        self.field_name(name);
        self.string(value);
    }

    fn i64_field(&mut self, name: &str, value: i64) {
        self.field_name(name);
        self.i64(value);
    }

    fn f64_field(&mut self, name: &str, value: f64) {
        self.field_name(name);
        self.f64(value);
    }

    fn bool_field(&mut self, name: &str, value: bool) {
        self.field_name(name);
        self.bool(value);
    }

    fn null_field(&mut self, name: &str) {
        self.field_name(name);
        self.null();
    }

    fn object_field_start(&mut self, name: &str) {
        self.field_name(name);
        self.start_object();
    }

    fn array_field_start(&mut self, name: &str) {
        self.field_name(name);
        self.start_array();
    }
}

/// Options controlling [`JsonWriter`] output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonWriterOptions {
    /// Newlines and two-space indentation instead of compact output.
    pub pretty: bool,
}

/// [`TokenWriter`] over a growable [`Writer`] buffer, producing UTF-8 JSON.
pub struct JsonWriter {
    pub writer: Writer,
    pub options: JsonWriterOptions,
    // One entry per open container: whether it already holds a member.
    frames: Vec<bool>,
    after_name: bool,
}

impl Default for JsonWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonWriter {
    pub fn new() -> Self {
        Self::with_options(JsonWriterOptions::default())
    }

    pub fn pretty() -> Self {
        Self::with_options(JsonWriterOptions { pretty: true })
    }

    pub fn with_options(options: JsonWriterOptions) -> Self {
        Self {
            writer: Writer::new(),
            options,
            frames: Vec::new(),
            after_name: false,
        }
    }

    /// Returns the bytes written so far and resets the structural state.
    pub fn flush(&mut self) -> Vec<u8> {
        self.frames.clear();
        self.after_name = false;
        self.writer.flush()
    }

    pub fn into_string(mut self) -> String {
        let bytes = self.flush();
        String::from_utf8(bytes).unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into_owned())
    }

    fn newline(&mut self) {
        self.writer.put_u8(b'\n');
        for _ in 0..self.frames.len() {
            self.writer.put_slice(b"  ");
        }
    }

    /// Separator before a value or field name.
    fn before_value(&mut self) {
        if self.after_name {
            self.after_name = false;
            return;
        }
        let pretty = self.options.pretty;
        if let Some(has_members) = self.frames.last_mut() {
            if *has_members {
                self.writer.put_u8(b',');
            }
            *has_members = true;
            if pretty {
                self.newline();
            }
        }
    }

    fn open(&mut self, bracket: u8) {
        self.before_value();
        self.writer.put_u8(bracket);
        self.frames.push(false);
    }

    fn close(&mut self, bracket: u8) {
        let had_members = self.frames.pop().unwrap_or(false);
        if self.options.pretty && had_members {
            self.newline();
        }
        self.writer.put_u8(bracket);
    }

    fn raw(&mut self, text: &str) {
        self.before_value();
        self.writer.put_slice(text.as_bytes());
    }

    fn quoted(&mut self, text: &str) {
        let bytes = text.as_bytes();
        let plain = bytes.iter().all(|&b| (32..=126).contains(&b) && b != b'"' && b != b'\\');
        if plain {
            self.writer.ensure_capacity(bytes.len() + 2);
            self.writer.put_u8(b'"');
            self.writer.put_slice(bytes);
            self.writer.put_u8(b'"');
        } else {
            let escaped = serde_json::to_string(text).unwrap_or_else(|_| "\"\"".to_string());
            self.writer.put_slice(escaped.as_bytes());
        }
    }
}

impl TokenWriter for JsonWriter {
    fn start_object(&mut self) {
        self.open(b'{');
    }

    fn end_object(&mut self) {
        self.close(b'}');
    }

    fn start_array(&mut self) {
        self.open(b'[');
    }

    fn end_array(&mut self) {
        self.close(b']');
    }

    fn field_name(&mut self, name: &str) {
        self.before_value();
        self.quoted(name);
        self.writer.put_u8(b':');
        if self.options.pretty {
            self.writer.put_u8(b' ');
        }
        self.after_name = true;
    }

    fn string(&mut self, value: &str) {
        self.before_value();
        self.quoted(value);
    }

    fn i64(&mut self, value: i64) {
        self.raw(&value.to_string());
    }

    fn f64(&mut self, value: f64) {
        self.raw(&format_float(value));
    }

    fn number_text(&mut self, text: &str) {
        self.raw(text);
    }

    fn bool(&mut self, value: bool) {
        self.raw(if value { "true" } else { "false" });
    }

    fn null(&mut self) {
        self.raw("null");
    }
}

/// Shortest round-trip text; non-finite values have no JSON number form and
/// are written as `null`.
fn format_float(f: f64) -> String {
    if !f.is_finite() {
        "null".to_string()
    } else if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        format!("{}", f)
    }
}
