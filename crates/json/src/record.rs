//! The per-type JSON record contract and the member loop generated readers share.

use datameta_core::DataMetaEntity;
use tracing::debug;

use crate::envelope::is_reserved_key;
use crate::{JsonCodecError, JsonToken, TokenReader, TokenWriter};

/// Read-time policy for JSON records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadOptions {
    /// Skip unrecognized field names instead of failing.
    pub ignore_unknown: bool,
}

impl ReadOptions {
    pub const STRICT: ReadOptions = ReadOptions { ignore_unknown: false };
    pub const LENIENT: ReadOptions = ReadOptions { ignore_unknown: true };
}

/// JSON codec for one generated record type.
pub trait JsonRecordCodec {
    type Record: DataMetaEntity + Default;

    /// Fully qualified name stored in the envelope's data type key.
    fn type_name(&self) -> &'static str;

    /// Writes the body fields into the currently open object.
    fn write<W: TokenWriter + ?Sized>(&self, out: &mut W, value: &Self::Record) -> Result<(), JsonCodecError>;

    /// Populates `target` from the members of an object whose start token was
    /// already consumed, up to and including its end token.
    fn read_into<R: TokenReader + ?Sized>(
        &self,
        src: &mut R,
        target: &mut Self::Record,
        options: ReadOptions,
    ) -> Result<(), JsonCodecError>;

    fn read<R: TokenReader + ?Sized>(&self, src: &mut R, options: ReadOptions) -> Result<Self::Record, JsonCodecError> {
        let mut value = Self::Record::default();
        self.read_into(src, &mut value, options)?;
        Ok(value)
    }

    /// Writes `value` as a nested object under `name`.
    fn write_field<W: TokenWriter + ?Sized>(
        &self,
        name: &str,
        out: &mut W,
        value: &Self::Record,
    ) -> Result<(), JsonCodecError> {
        out.object_field_start(name);
        self.write(out, value)?;
        out.end_object();
        Ok(())
    }
}

/// Drives the member loop of an object whose start token was consumed.
///
/// For every member `on_field` is called with the field name while `src` sits
/// on the member's value token; it returns `false` for a name it does not
/// know. Reserved envelope keys never reach `on_field`.
pub fn read_object_fields<R, F>(src: &mut R, options: ReadOptions, mut on_field: F) -> Result<(), JsonCodecError>
where
    R: TokenReader + ?Sized,
    F: FnMut(&str, &mut R) -> Result<bool, JsonCodecError>,
{
    loop {
        match src.next_token()? {
            Some(JsonToken::EndObject) => return Ok(()),
            Some(JsonToken::FieldName) => {
                let name = src.text().to_owned();
                if src.next_token()?.is_none() {
                    return Err(JsonCodecError::malformed(format!("no value for field {name:?}")));
                }
                if is_reserved_key(&name) {
                    src.skip_children()?;
                    continue;
                }
                if on_field(&name, src)? {
                    continue;
                }
                if !options.ignore_unknown {
                    return Err(JsonCodecError::malformed(format!("unknown field {name:?}")));
                }
                debug!(field = %name, "skipping unknown field");
                src.skip_children()?;
            }
            Some(token) => {
                return Err(JsonCodecError::malformed(format!(
                    "expected a field name, found {token:?}"
                )))
            }
            None => return Err(JsonCodecError::malformed("document ended inside an object")),
        }
    }
}
