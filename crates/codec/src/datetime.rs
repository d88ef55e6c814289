//! Zoned date-times: the binary zoned/UTC forms and the ISO text form.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, TimeZone, Timelike, Utc};
use datameta_buffers::{BinarySink, BinarySource};

use crate::varint::{read_vint, read_vlong, write_vint, write_vlong};
use crate::zone::{format_offset, parse_offset, TimeZoneRegistry, ZoneId};
use crate::CodecError;

/// An instant together with the zone it was observed in.
///
/// Two values are equal only when both the instant and the zone match, so
/// `12:00Z` and `12:00Z[UTC]` are different values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ZonedDateTime {
    instant: DateTime<Utc>,
    zone: ZoneId,
}

impl ZonedDateTime {
    pub fn new(instant: DateTime<Utc>, zone: ZoneId) -> Self {
        Self { instant, zone }
    }

    pub fn from_epoch_millis(millis: i64, zone: ZoneId) -> Result<Self, CodecError> {
        let instant = DateTime::from_timestamp_millis(millis)
            .ok_or_else(|| CodecError::InvalidDateTime(format!("epoch millis {millis} out of range")))?;
        Ok(Self::new(instant, zone))
    }

    /// Resolves a wall-clock time in `zone`. An ambiguous local time takes the
    /// earlier offset; a local time inside a gap is rejected.
    pub fn from_local(local: NaiveDateTime, zone: ZoneId) -> Result<Self, CodecError> {
        let instant = match zone {
            ZoneId::Offset(offset) => offset
                .from_local_datetime(&local)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
            ZoneId::Region(tz) => tz
                .from_local_datetime(&local)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
        };
        instant
            .map(|instant| Self::new(instant, zone))
            .ok_or_else(|| CodecError::InvalidDateTime(format!("{local} does not exist in {zone}")))
    }

    pub fn instant(&self) -> DateTime<Utc> {
        self.instant
    }

    pub fn zone(&self) -> ZoneId {
        self.zone
    }

    pub fn epoch_millis(&self) -> i64 {
        self.instant.timestamp_millis()
    }

    pub fn offset(&self) -> FixedOffset {
        self.zone.offset_at(&self.instant)
    }

    /// Wall-clock time in the value's own zone.
    pub fn local(&self) -> NaiveDateTime {
        self.instant.with_timezone(&self.offset()).naive_local()
    }

    pub fn with_zone_same_instant(&self, zone: ZoneId) -> Self {
        Self::new(self.instant, zone)
    }

    pub fn with_zone_same_local(&self, zone: ZoneId) -> Result<Self, CodecError> {
        Self::from_local(self.local(), zone)
    }

    /// ISO-8601 extended text, keeping the `[zone]` suffix for named regions.
    pub fn to_iso_string(&self) -> String {
        let local = self.local();
        let mut out = local.format("%Y-%m-%dT%H:%M:%S").to_string();
        let nanos = local.nanosecond() % 1_000_000_000;
        if nanos != 0 {
            let digits = format!("{nanos:09}");
            out.push('.');
            out.push_str(digits.trim_end_matches('0'));
        }
        out.push_str(&format_offset(self.offset().local_minus_utc()));
        if let ZoneId::Region(tz) = self.zone {
            out.push('[');
            out.push_str(tz.name());
            out.push(']');
        }
        out
    }

    /// Parses the text produced by [`to_iso_string`](Self::to_iso_string).
    ///
    /// Without a bracket suffix the zone is the fixed offset from the text.
    pub fn parse_iso(text: &str) -> Result<Self, CodecError> {
        let invalid = || CodecError::InvalidDateTime(text.to_string());
        let (stamp, zone) = match text.strip_suffix(']') {
            Some(head) => {
                let open = head.rfind('[').ok_or_else(invalid)?;
                (&head[..open], Some(ZoneId::parse(&head[open + 1..])?))
            }
            None => (text, None),
        };
        let parsed = parse_stamp(stamp).ok_or_else(invalid)?;
        let zone = zone.unwrap_or_else(|| ZoneId::Offset(parsed.offset().fix()));
        Ok(Self::new(parsed.with_timezone(&Utc), zone))
    }
}

/// `<local date-time><offset>`; seconds may be omitted and years outside
/// 0000..=9999 carry an explicit sign, as `%Y` prints them.
fn parse_stamp(stamp: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(stamp) {
        return Some(parsed);
    }
    let t = stamp.find('T')?;
    let split = t + stamp[t..].find(|c: char| matches!(c, 'Z' | '+' | '-'))?;
    let (local, offset) = stamp.split_at(split);
    let offset = match offset {
        "Z" => FixedOffset::east_opt(0)?,
        other => parse_offset(other)?,
    };
    let local = NaiveDateTime::parse_from_str(local, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(local, "%Y-%m-%dT%H:%M"))
        .ok()?;
    offset.from_local_datetime(&local).single()
}

impl fmt::Display for ZonedDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso_string())
    }
}

impl FromStr for ZonedDateTime {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_iso(s)
    }
}

/// VarInt(zone key) + VarLong(epoch millis).
pub fn write_zoned<W: BinarySink + ?Sized>(out: &mut W, value: &ZonedDateTime) -> Result<(), CodecError> {
    let key = TimeZoneRegistry::global().key_of(&value.zone.id())?;
    write_vint(out, key);
    write_vlong(out, value.epoch_millis());
    Ok(())
}

pub fn read_zoned<R: BinarySource + ?Sized>(src: &mut R) -> Result<ZonedDateTime, CodecError> {
    let zone = TimeZoneRegistry::global().zone_of(read_vint(src)?)?;
    ZonedDateTime::from_epoch_millis(read_vlong(src)?, zone)
}

/// VarLong(epoch millis) of the wall-clock time read as UTC.
///
/// The zone is dropped; a value that was not already in UTC comes back at a
/// different instant.
pub fn write_utc<W: BinarySink + ?Sized>(out: &mut W, value: &ZonedDateTime) {
    let millis = Utc.from_utc_datetime(&value.local()).timestamp_millis();
    write_vlong(out, millis);
}

/// Reads a value written by [`write_utc`]; the zone is always `Z`.
pub fn read_utc<R: BinarySource + ?Sized>(src: &mut R) -> Result<ZonedDateTime, CodecError> {
    ZonedDateTime::from_epoch_millis(read_vlong(src)?, ZoneId::utc())
}
