//! Explicit name -> codec registry backing dynamic type resolution.

use std::any::{type_name, Any, TypeId};
use std::fmt;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::{JsonCodecError, JsonReader, JsonRecordCodec, JsonToken, ReadOptions, TokenReader};

type DecodeFn =
    Box<dyn Fn(&mut dyn TokenReader, ReadOptions) -> Result<Box<dyn Any + Send>, JsonCodecError> + Send + Sync>;

/// A registered record type: its envelope name plus a type-erased decoder.
pub struct TypeHandle {
    name: &'static str,
    record_type: &'static str,
    type_id: TypeId,
    decode: DecodeFn,
}

impl TypeHandle {
    /// Name as written in the envelope.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Reads the members of an object whose start token was consumed.
    pub fn read(&self, src: &mut dyn TokenReader, options: ReadOptions) -> Result<Box<dyn Any + Send>, JsonCodecError> {
        (self.decode)(src, options)
    }

    /// Decodes a complete document.
    pub fn decode(&self, json: &str, options: ReadOptions) -> Result<Box<dyn Any + Send>, JsonCodecError> {
        let mut reader = JsonReader::new(json.as_bytes());
        match reader.next_token()? {
            Some(JsonToken::StartObject) => self.read(&mut reader, options),
            found => Err(JsonCodecError::malformed(format!("expected an object, found {found:?}"))),
        }
    }

    /// Decodes a complete document and downcasts it to `T`.
    pub fn decode_as<T: 'static>(&self, json: &str, options: ReadOptions) -> Result<T, JsonCodecError> {
        if !self.is::<T>() {
            return Err(self.mismatch::<T>());
        }
        self.decode(json, options)?
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|_| self.mismatch::<T>())
    }

    fn mismatch<T>(&self) -> JsonCodecError {
        JsonCodecError::TypeMismatch {
            name: self.name.to_string(),
            expected: type_name::<T>(),
        }
    }
}

impl fmt::Debug for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeHandle")
            .field("name", &self.name)
            .field("record_type", &self.record_type)
            .finish()
    }
}

/// Immutable registry of JSON record codecs keyed by envelope type name.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: IndexMap<&'static str, TypeHandle>,
}

impl TypeRegistry {
    pub fn builder() -> TypeRegistryBuilder {
        TypeRegistryBuilder::default()
    }

    pub fn resolve(&self, name: &str) -> Result<&TypeHandle, JsonCodecError> {
        let handle = self
            .types
            .get(name)
            .ok_or_else(|| JsonCodecError::TypeNotFound(name.to_string()))?;
        trace!(record = name, "resolved record type");
        Ok(handle)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.types.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct TypeRegistryBuilder {
    types: IndexMap<&'static str, TypeHandle>,
}

impl TypeRegistryBuilder {
    /// Adds `codec` under its [`type_name`](JsonRecordCodec::type_name).
    /// A later registration of the same name replaces the earlier one.
    pub fn register<C>(mut self, codec: C) -> Self
    where
        C: JsonRecordCodec + Send + Sync + 'static,
        C::Record: Send + 'static,
    {
        let name = codec.type_name();
        let handle = TypeHandle {
            name,
            record_type: type_name::<C::Record>(),
            type_id: TypeId::of::<C::Record>(),
            decode: Box::new(move |src: &mut dyn TokenReader, options: ReadOptions| {
                let record = codec.read(src, options)?;
                Ok(Box::new(record) as Box<dyn Any + Send>)
            }),
        };
        if self.types.insert(name, handle).is_some() {
            debug!(record = name, "record type registered twice, keeping the latest");
        }
        self
    }

    pub fn build(self) -> TypeRegistry {
        debug!(types = self.types.len(), "type registry built");
        TypeRegistry { types: self.types }
    }
}
