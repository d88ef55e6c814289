//! Zone identifiers and the process-wide zone dictionary.
//!
//! The binary datetime form stores a small integer key instead of the zone
//! name. Keys are assigned by registration order, so the order of
//! [`REGISTERED_ZONES`] is part of the wire contract: appending is safe,
//! reordering or removing breaks previously written data.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, FixedOffset, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use indexmap::IndexSet;
use tracing::debug;

use crate::CodecError;

/// Zone ids in key order.
pub const REGISTERED_ZONES: [&str; 10] = [
    "Z",
    "UTC",
    "GMT",
    "America/New_York",
    "America/Chicago",
    "America/Denver",
    "America/Phoenix",
    "America/Los_Angeles",
    "America/Anchorage",
    "Pacific/Honolulu",
];

/// Either a fixed offset (`Z`, `+05:30`) or a named region (`America/Chicago`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneId {
    Offset(FixedOffset),
    Region(Tz),
}

impl ZoneId {
    /// The zero offset, whose id is `Z`.
    pub fn utc() -> Self {
        ZoneId::Offset(Utc.fix())
    }

    pub fn parse(id: &str) -> Result<Self, CodecError> {
        if id == "Z" {
            return Ok(Self::utc());
        }
        if id.starts_with('+') || id.starts_with('-') {
            return parse_offset(id)
                .map(ZoneId::Offset)
                .ok_or_else(|| CodecError::UnsupportedZone(id.to_string()));
        }
        Tz::from_str(id)
            .map(ZoneId::Region)
            .map_err(|_| CodecError::UnsupportedZone(id.to_string()))
    }

    pub fn id(&self) -> String {
        match self {
            ZoneId::Offset(offset) => format_offset(offset.local_minus_utc()),
            ZoneId::Region(tz) => tz.name().to_string(),
        }
    }

    pub fn is_region(&self) -> bool {
        matches!(self, ZoneId::Region(_))
    }

    /// Offset in effect at `instant`.
    pub fn offset_at(&self, instant: &DateTime<Utc>) -> FixedOffset {
        match self {
            ZoneId::Offset(offset) => *offset,
            ZoneId::Region(tz) => tz.offset_from_utc_datetime(&instant.naive_utc()).fix(),
        }
    }
}

impl Hash for ZoneId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            ZoneId::Offset(offset) => {
                0u8.hash(state);
                offset.local_minus_utc().hash(state);
            }
            ZoneId::Region(tz) => {
                1u8.hash(state);
                tz.name().hash(state);
            }
        }
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

impl FromStr for ZoneId {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// `Z` for zero, otherwise `±HH:MM` with `:SS` only when the seconds are non-zero.
pub(crate) fn format_offset(total_seconds: i32) -> String {
    if total_seconds == 0 {
        return "Z".to_string();
    }
    let sign = if total_seconds < 0 { '-' } else { '+' };
    let abs = total_seconds.unsigned_abs();
    let (h, m, s) = (abs / 3600, abs / 60 % 60, abs % 60);
    if s == 0 {
        format!("{sign}{h:02}:{m:02}")
    } else {
        format!("{sign}{h:02}:{m:02}:{s:02}")
    }
}

/// Accepts `±HH`, `±HHMM`, `±HH:MM` and `±HH:MM:SS`.
pub(crate) fn parse_offset(text: &str) -> Option<FixedOffset> {
    let (sign, rest) = text.split_at(1);
    let digits: String = rest.chars().filter(|&c| c != ':').collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) || !matches!(digits.len(), 2 | 4 | 6) {
        return None;
    }
    let part = |ix: usize| -> i32 { digits.get(ix..ix + 2).and_then(|d| d.parse().ok()).unwrap_or(0) };
    let (h, m, s) = (part(0), part(2), part(4));
    if h > 18 || m > 59 || s > 59 {
        return None;
    }
    let total = h * 3600 + m * 60 + s;
    if sign == "-" {
        FixedOffset::west_opt(total)
    } else {
        FixedOffset::east_opt(total)
    }
}

/// Immutable id <-> key dictionary, built once on first access.
#[derive(Debug)]
pub struct TimeZoneRegistry {
    ids: IndexSet<&'static str>,
}

impl TimeZoneRegistry {
    /// The process-wide registry over [`REGISTERED_ZONES`].
    pub fn global() -> &'static TimeZoneRegistry {
        static REGISTRY: OnceLock<TimeZoneRegistry> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            let registry = TimeZoneRegistry {
                ids: REGISTERED_ZONES.iter().copied().collect(),
            };
            debug!(zones = registry.len(), "time zone registry initialized");
            registry
        })
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn key_of(&self, id: &str) -> Result<i32, CodecError> {
        self.ids
            .get_index_of(id)
            .map(|ix| ix as i32)
            .ok_or_else(|| CodecError::UnsupportedZone(id.to_string()))
    }

    pub fn id_of(&self, key: i32) -> Result<&'static str, CodecError> {
        usize::try_from(key)
            .ok()
            .and_then(|ix| self.ids.get_index(ix))
            .copied()
            .ok_or(CodecError::UnknownZoneKey(key))
    }

    pub fn zone_of(&self, key: i32) -> Result<ZoneId, CodecError> {
        ZoneId::parse(self.id_of(key)?)
    }

    /// Registered ids in key order.
    pub fn all_ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.ids.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_follow_registration_order() {
        let registry = TimeZoneRegistry::global();
        assert_eq!(registry.len(), REGISTERED_ZONES.len());
        assert_eq!(registry.key_of("Z"), Ok(0));
        assert_eq!(registry.key_of("UTC"), Ok(1));
        assert_eq!(registry.key_of("Pacific/Honolulu"), Ok(9));
        assert_eq!(registry.id_of(4), Ok("America/Chicago"));
        assert_eq!(
            registry.all_ids().collect::<Vec<_>>(),
            REGISTERED_ZONES.to_vec()
        );
    }

    #[test]
    fn every_registered_id_resolves_to_a_zone() {
        let registry = TimeZoneRegistry::global();
        for key in 0..registry.len() as i32 {
            let zone = registry.zone_of(key).unwrap();
            assert_eq!(zone.id(), registry.id_of(key).unwrap());
        }
    }

    #[test]
    fn unregistered_zone_is_unsupported() {
        let registry = TimeZoneRegistry::global();
        assert_eq!(
            registry.key_of("Europe/Paris"),
            Err(CodecError::UnsupportedZone("Europe/Paris".to_string()))
        );
        assert_eq!(registry.id_of(10), Err(CodecError::UnknownZoneKey(10)));
        assert_eq!(registry.id_of(-1), Err(CodecError::UnknownZoneKey(-1)));
    }

    #[test]
    fn offsets_parse_and_print() {
        assert_eq!(ZoneId::parse("Z").unwrap(), ZoneId::utc());
        assert_eq!(ZoneId::parse("+05:30").unwrap().id(), "+05:30");
        assert_eq!(ZoneId::parse("-0800").unwrap().id(), "-08:00");
        assert_eq!(ZoneId::parse("+01:02:03").unwrap().id(), "+01:02:03");
        assert!(ZoneId::parse("+25:00").is_err());
        assert!(ZoneId::parse("Mars/Olympus").is_err());
    }

    #[test]
    fn region_offset_tracks_daylight_saving() {
        let zone = ZoneId::parse("America/New_York").unwrap();
        let winter = Utc.with_ymd_and_hms(2020, 1, 15, 12, 0, 0).unwrap();
        let summer = Utc.with_ymd_and_hms(2020, 7, 15, 12, 0, 0).unwrap();
        assert_eq!(zone.offset_at(&winter).local_minus_utc(), -5 * 3600);
        assert_eq!(zone.offset_at(&summer).local_minus_utc(), -4 * 3600);
    }
}
