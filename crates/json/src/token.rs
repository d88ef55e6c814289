/// One step of a pull-based JSON token stream.
///
/// Scalar payloads are not carried in the token; read them from the
/// [`TokenReader`](crate::TokenReader) while it is positioned on the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonToken {
    StartObject,
    EndObject,
    StartArray,
    EndArray,
    FieldName,
    String,
    Number,
    True,
    False,
    Null,
}
