//! Traits every generated record participates in.

use std::marker::PhantomData;

use thiserror::Error;

use crate::SemanticVersion;

/// A DataMeta record: any value carrying the semantic version of its schema.
pub trait DataMetaEntity {
    fn version(&self) -> &SemanticVersion;
}

/// A record that fails its own consistency check, e.g. a required field left unset.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("verification failed: {message}")]
pub struct VerificationError {
    pub message: String,
}

impl VerificationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The staple failure for a required field that was never set.
    pub fn required_field(name: &str) -> Self {
        Self::new(format!("required field {name:?} is not set"))
    }
}

/// Contract for a verifiable entity. All generated records are verifiable.
pub trait Verifiable: DataMetaEntity {
    /// `Ok(())` means the entity is consistent.
    fn verify(&self) -> Result<(), VerificationError>;
}

/// Converts one entity into another, most commonly across schema versions.
pub trait Migrator<S: DataMetaEntity, T: DataMetaEntity> {
    type Error;

    fn migrate(&self, source: &S) -> Result<T, Self::Error>;
}

/// A key/value pair entity.
pub trait Mapping: DataMetaEntity {
    type Key: PartialEq;
    type Value;

    fn key(&self) -> &Self::Key;
    fn set_key(&mut self, key: Self::Key);
    fn value(&self) -> &Self::Value;
}

/// Pluggable sameness, decoupled from `PartialEq` so a type can carry several
/// equality definitions (full, key-only, ...).
pub trait DataMetaSame<T: ?Sized> {
    fn is_same(&self, one: &T, another: &T) -> bool;

    /// Two absent values are the same; absent and present never are.
    fn is_same_opt(&self, one: Option<&T>, another: Option<&T>) -> bool {
        match (one, another) {
            (None, None) => true,
            (Some(a), Some(b)) => self.is_same(a, b),
            _ => false,
        }
    }
}

/// Sameness backed by the type's own `PartialEq`.
pub struct EqSame<T: ?Sized>(PhantomData<fn(&T)>);

impl<T: ?Sized> EqSame<T> {
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T: ?Sized> Default for EqSame<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialEq + ?Sized> DataMetaSame<T> for EqSame<T> {
    fn is_same(&self, one: &T, another: &T) -> bool {
        one == another
    }
}

/// Sameness of [`Mapping`] entities by key alone.
pub struct MappingKeySame<M>(PhantomData<fn(&M)>);

impl<M> MappingKeySame<M> {
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<M> Default for MappingKeySame<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Mapping> DataMetaSame<M> for MappingKeySame<M> {
    fn is_same(&self, one: &M, another: &M) -> bool {
        one.key() == another.key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static V1: SemanticVersion = SemanticVersion::new(1, 0, 0);

    struct Pair {
        key: String,
        value: i64,
    }

    impl DataMetaEntity for Pair {
        fn version(&self) -> &SemanticVersion {
            &V1
        }
    }

    impl Mapping for Pair {
        type Key = String;
        type Value = i64;

        fn key(&self) -> &String {
            &self.key
        }

        fn set_key(&mut self, key: String) {
            self.key = key;
        }

        fn value(&self) -> &i64 {
            &self.value
        }
    }

    impl Verifiable for Pair {
        fn verify(&self) -> Result<(), VerificationError> {
            if self.key.is_empty() {
                return Err(VerificationError::required_field("key"));
            }
            Ok(())
        }
    }

    struct Doubler;

    impl Migrator<Pair, Pair> for Doubler {
        type Error = VerificationError;

        fn migrate(&self, source: &Pair) -> Result<Pair, VerificationError> {
            source.verify()?;
            Ok(Pair {
                key: source.key.clone(),
                value: source.value * 2,
            })
        }
    }

    #[test]
    fn mapping_sameness_uses_key_only() {
        let a = Pair { key: "k".into(), value: 1 };
        let mut b = Pair { key: "x".into(), value: 2 };
        let same = MappingKeySame::<Pair>::new();
        assert!(!same.is_same(&a, &b));
        b.set_key("k".into());
        assert!(same.is_same(&a, &b));
        assert_ne!(a.value(), b.value());
    }

    #[test]
    fn eq_same_handles_absent_values() {
        let same = EqSame::<str>::new();
        assert!(same.is_same_opt(None, None));
        assert!(!same.is_same_opt(Some("a"), None));
        assert!(same.is_same_opt(Some("a"), Some("a")));
    }

    #[test]
    fn migrator_propagates_verification_failure() {
        let bad = Pair { key: String::new(), value: 3 };
        let err = Doubler.migrate(&bad).err().unwrap();
        assert_eq!(err.to_string(), "verification failed: required field \"key\" is not set");
        let good = Pair { key: "a".into(), value: 3 };
        assert_eq!(Doubler.migrate(&good).unwrap().value, 6);
    }
}
