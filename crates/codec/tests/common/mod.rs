//! Hand-written records in the shape the code generator emits.

#![allow(dead_code)]

use std::collections::HashSet;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use datameta_buffers::{BinarySink, BinarySource};
use datameta_codec::{
    read_bitset, read_decimal, read_list, read_set, read_text, read_vint, read_vlong, write_bitset,
    write_collection, write_decimal, write_text, write_vint, write_vlong, CodecError, Records, RecordCodec,
    VarLongCodec, ZoneId, ZonedCodec, ZonedDateTime,
};
use datameta_core::{
    DataMetaEntity, PresenceBitSet, SemanticVersion, Verifiable, VerificationError,
};

pub static TESTING_DM_VERSION: SemanticVersion = SemanticVersion::new(1, 0, 0);
pub static DM_TESTING_VERSION: SemanticVersion = SemanticVersion::new(1, 2, 0);

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestingDm {
    pub id: i64,
    pub color: Option<String>,
    pub longs: Option<HashSet<i64>>,
    pub whens: Option<Vec<ZonedDateTime>>,
}

impl DataMetaEntity for TestingDm {
    fn version(&self) -> &SemanticVersion {
        &TESTING_DM_VERSION
    }
}

impl Verifiable for TestingDm {
    fn verify(&self) -> Result<(), VerificationError> {
        if self.id < 0 {
            return Err(VerificationError::new(format!("id must not be negative: {}", self.id)));
        }
        Ok(())
    }
}

pub struct TestingDmCodec;

const COLOR: usize = 0;
const LONGS: usize = 1;
const WHENS: usize = 2;

impl RecordCodec for TestingDmCodec {
    type Record = TestingDm;

    fn write<W: BinarySink + ?Sized>(&self, out: &mut W, value: &TestingDm) -> Result<(), CodecError> {
        value.verify()?;
        let mut bits = PresenceBitSet::new(3);
        if value.color.is_some() {
            bits.set(COLOR)?;
        }
        if value.longs.is_some() {
            bits.set(LONGS)?;
        }
        if value.whens.is_some() {
            bits.set(WHENS)?;
        }
        write_bitset(out, &bits);
        write_vlong(out, value.id);
        if let Some(color) = &value.color {
            write_text(out, color);
        }
        write_collection(out, value.longs.as_ref(), &VarLongCodec)?;
        write_collection(out, value.whens.as_ref(), &ZonedCodec)?;
        Ok(())
    }

    fn read_into<R: BinarySource + ?Sized>(&self, src: &mut R, target: &mut TestingDm) -> Result<(), CodecError> {
        let bits = read_bitset(src, 3)?;
        target.id = read_vlong(src)?;
        target.color = if bits.get(COLOR) { Some(read_text(src)?) } else { None };
        target.longs = if bits.get(LONGS) { Some(read_set(src, &VarLongCodec)?) } else { None };
        target.whens = if bits.get(WHENS) { Some(read_list(src, &ZonedCodec)?) } else { None };
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DmTesting {
    pub salary: BigDecimal,
    pub embedded: TestingDm,
    pub embs: Option<Vec<TestingDm>>,
}

impl DataMetaEntity for DmTesting {
    fn version(&self) -> &SemanticVersion {
        &DM_TESTING_VERSION
    }
}

pub struct DmTestingCodec;

impl RecordCodec for DmTestingCodec {
    type Record = DmTesting;

    fn write<W: BinarySink + ?Sized>(&self, out: &mut W, value: &DmTesting) -> Result<(), CodecError> {
        let mut bits = PresenceBitSet::new(1);
        if value.embs.is_some() {
            bits.set(0)?;
        }
        write_bitset(out, &bits);
        write_decimal(out, &value.salary);
        TestingDmCodec.write(out, &value.embedded)?;
        write_collection(out, value.embs.as_ref(), &Records(&TestingDmCodec))
    }

    fn read_into<R: BinarySource + ?Sized>(&self, src: &mut R, target: &mut DmTesting) -> Result<(), CodecError> {
        let bits = read_bitset(src, 1)?;
        target.salary = read_decimal(src)?;
        TestingDmCodec.read_into(src, &mut target.embedded)?;
        target.embs = if bits.get(0) {
            Some(read_list(src, &Records(&TestingDmCodec))?)
        } else {
            None
        };
        Ok(())
    }
}

/// A small hashable record, so it can live in a set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Tag {
    pub name: String,
    pub weight: i32,
}

impl DataMetaEntity for Tag {
    fn version(&self) -> &SemanticVersion {
        &TESTING_DM_VERSION
    }
}

pub struct TagCodec;

impl RecordCodec for TagCodec {
    type Record = Tag;

    fn write<W: BinarySink + ?Sized>(&self, out: &mut W, value: &Tag) -> Result<(), CodecError> {
        write_text(out, &value.name);
        write_vint(out, value.weight);
        Ok(())
    }

    fn read_into<R: BinarySource + ?Sized>(&self, src: &mut R, target: &mut Tag) -> Result<(), CodecError> {
        target.name = read_text(src)?;
        target.weight = read_vint(src)?;
        Ok(())
    }
}

pub fn sample_tags() -> Vec<Tag> {
    vec![
        Tag { name: "alpha".to_string(), weight: 1 },
        Tag { name: "beta".to_string(), weight: -300 },
        Tag { name: "gamma".to_string(), weight: 70_000 },
    ]
}

pub fn zoned(text: &str) -> ZonedDateTime {
    ZonedDateTime::parse_iso(text).unwrap()
}

pub fn zone(id: &str) -> ZoneId {
    ZoneId::parse(id).unwrap()
}

pub fn decimal(text: &str) -> BigDecimal {
    BigDecimal::from_str(text).unwrap()
}

pub fn sample_testing_dm() -> TestingDm {
    TestingDm {
        id: 3_141_592_653,
        color: Some("teal".to_string()),
        longs: Some(HashSet::from([1111, 222, 33])),
        whens: Some(vec![
            zoned("2016-12-30T12:12:54.719Z[UTC]"),
            zoned("2020-07-04T09:30:00-05:00[America/Chicago]"),
            zoned("1999-12-31T23:59:59.999Z"),
        ]),
    }
}

pub fn sample_dm_testing() -> DmTesting {
    DmTesting {
        salary: decimal("12345678909876543210123456789.56"),
        embedded: sample_testing_dm(),
        embs: Some(vec![
            TestingDm { id: 1, ..TestingDm::default() },
            sample_testing_dm(),
        ]),
    }
}
