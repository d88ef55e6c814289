//! datameta-core - record-level building blocks shared by the binary and JSON codecs.
//!
//! Nothing in here touches a wire format. Generated records implement
//! [`DataMetaEntity`] (and usually [`Verifiable`]) and track their optional
//! fields with a [`PresenceBitSet`].

pub mod bitset;
pub mod entity;
pub mod version;

pub use bitset::{long_array_len, BitSetError, DomainBitSet, PresenceBitSet};
pub use entity::{
    DataMetaEntity, DataMetaSame, EqSame, Mapping, MappingKeySame, Migrator, Verifiable,
    VerificationError,
};
pub use version::{SemanticVersion, VersionError};
