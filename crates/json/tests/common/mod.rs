//! Records and JSON codecs in the shape the code generator emits.

#![allow(dead_code)]

use std::collections::HashSet;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use datameta_codec::ZonedDateTime;
use datameta_core::{DataMetaEntity, SemanticVersion};
use datameta_json::fields::{
    read_byte_array, read_list, read_nested, read_nullable, read_record_list, read_set,
    write_byte_array_field, write_collection_field, write_record_collection_field, write_scalar_field,
};
use datameta_json::{
    read_object_fields, JsonCodecError, JsonRecordCodec, JsonScalar, ReadOptions, TokenReader,
    TokenWriter, TypeRegistry,
};

pub static TESTING_DM_VERSION: SemanticVersion = SemanticVersion::new(1, 0, 0);
pub static DM_TESTING_VERSION: SemanticVersion = SemanticVersion::new(1, 2, 0);

pub const TESTING_DM_TYPE: &str = "datameta.test.TestingDm";
pub const DM_TESTING_TYPE: &str = "datameta.test.DmTesting";

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

pub struct TestingDmJson;

impl JsonRecordCodec for TestingDmJson {
    type Record = TestingDm;

    fn type_name(&self) -> &'static str {
        TESTING_DM_TYPE
    }

    fn write<W: TokenWriter + ?Sized>(&self, out: &mut W, value: &TestingDm) -> Result<(), JsonCodecError> {
        out.i64_field("id", value.id);
        if let Some(color) = &value.color {
            out.string_field("color", color);
        }
        write_collection_field(out, "longs", value.longs.as_ref());
        write_collection_field(out, "whens", value.whens.as_ref());
        Ok(())
    }

    fn read_into<R: TokenReader + ?Sized>(
        &self,
        src: &mut R,
        target: &mut TestingDm,
        options: ReadOptions,
    ) -> Result<(), JsonCodecError> {
        read_object_fields(src, options, |name, src| {
            match name {
                "id" => target.id = i64::read_json(src)?,
                "color" => target.color = read_nullable(src, |r| String::read_json(r))?,
                "longs" => target.longs = read_nullable(src, read_set)?,
                "whens" => target.whens = read_nullable(src, read_list)?,
                _ => return Ok(false),
            }
            Ok(true)
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DmTesting {
    pub salary: BigDecimal,
    pub embedded: TestingDm,
    pub embs: Option<Vec<TestingDm>>,
    pub raw: Option<Vec<u8>>,
}

impl DataMetaEntity for DmTesting {
    fn version(&self) -> &SemanticVersion {
        &DM_TESTING_VERSION
    }
}

pub struct DmTestingJson;

impl JsonRecordCodec for DmTestingJson {
    type Record = DmTesting;

    fn type_name(&self) -> &'static str {
        DM_TESTING_TYPE
    }

    fn write<W: TokenWriter + ?Sized>(&self, out: &mut W, value: &DmTesting) -> Result<(), JsonCodecError> {
        write_scalar_field(out, "salary", &value.salary);
        TestingDmJson.write_field("embedded", out, &value.embedded)?;
        write_record_collection_field(out, "embs", value.embs.as_ref(), &TestingDmJson)?;
        if let Some(raw) = &value.raw {
            write_byte_array_field(out, "raw", raw);
        }
        Ok(())
    }

    fn read_into<R: TokenReader + ?Sized>(
        &self,
        src: &mut R,
        target: &mut DmTesting,
        options: ReadOptions,
    ) -> Result<(), JsonCodecError> {
        read_object_fields(src, options, |name, src| {
            match name {
                "salary" => target.salary = BigDecimal::read_json(src)?,
                "embedded" => target.embedded = read_nested(src, &TestingDmJson, options)?,
                "embs" => target.embs = read_nullable(src, |r| read_record_list(r, &TestingDmJson, options))?,
                "raw" => target.raw = read_nullable(src, read_byte_array)?,
                _ => return Ok(false),
            }
            Ok(true)
        })
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

pub struct TagJson;

impl JsonRecordCodec for TagJson {
    type Record = Tag;

    fn type_name(&self) -> &'static str {
        "datameta.test.Tag"
    }

    fn write<W: TokenWriter + ?Sized>(&self, out: &mut W, value: &Tag) -> Result<(), JsonCodecError> {
        out.string_field("name", &value.name);
        write_scalar_field(out, "weight", &value.weight);
        Ok(())
    }

    fn read_into<R: TokenReader + ?Sized>(
        &self,
        src: &mut R,
        target: &mut Tag,
        options: ReadOptions,
    ) -> Result<(), JsonCodecError> {
        read_object_fields(src, options, |name, src| {
            match name {
                "name" => target.name = String::read_json(src)?,
                "weight" => target.weight = i32::read_json(src)?,
                _ => return Ok(false),
            }
            Ok(true)
        })
    }
}

pub fn sample_tags() -> Vec<Tag> {
    vec![
        Tag { name: "alpha".to_string(), weight: 1 },
        Tag { name: "beta".to_string(), weight: -300 },
        Tag { name: "gamma".to_string(), weight: 70_000 },
    ]
}

pub fn registry() -> TypeRegistry {
    TypeRegistry::builder()
        .register(TestingDmJson)
        .register(DmTestingJson)
        .build()
}

pub fn zoned(text: &str) -> ZonedDateTime {
    ZonedDateTime::parse_iso(text).unwrap()
}

pub fn decimal(text: &str) -> BigDecimal {
    BigDecimal::from_str(text).unwrap()
}

pub fn sample_testing_dm() -> TestingDm {
    TestingDm {
        id: 3_141_592_653,
        color: Some("teal \"quoted\"".to_string()),
        longs: Some(HashSet::from([1111, 222, 33])),
        whens: Some(vec![
            zoned("2016-12-30T12:12:54.719Z[UTC]"),
            zoned("2020-07-04T09:30:00-05:00[America/Chicago]"),
            zoned("1999-12-31T23:59:59.999+05:30"),
        ]),
    }
}

pub fn sample_dm_testing() -> DmTesting {
    DmTesting {
        salary: decimal("12345678909876543210123456789.56"),
        embedded: sample_testing_dm(),
        embs: Some(vec![TestingDm { id: 1, ..TestingDm::default() }, sample_testing_dm()]),
        raw: Some(vec![0, 1, 127, 128, 255]),
    }
}
