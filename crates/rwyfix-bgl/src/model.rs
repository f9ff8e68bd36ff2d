//! Decoded model: typed fields with byte provenance, and the container root.
//!
//! Every decoded field keeps its absolute offset and the exact source bytes,
//! so the patcher can later overwrite it in place without re-walking the
//! container. Records own their children outright; the tree has no sharing
//! and no back-references.

use std::fmt;

use crate::records::{Airport, IlsVor, Waypoint};
use crate::Error;

/// Identifies the codec that produced a [`Field`]'s value, so the patcher can
/// re-encode a replacement the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    /// Little-endian unsigned integer.
    UInt,
    /// 4-byte IEEE-754 float.
    Float,
    /// Fixed-width NUL-trimmed string.
    Text,
    /// Base-38 identifier; `shifted` drops the 5 low bits before decoding.
    Ident { shifted: bool },
    /// Quantized longitude.
    Longitude,
    /// Quantized latitude.
    Latitude,
    /// Runway-number token (1-36 plus compass directions).
    RunwayNumber,
    /// Runway-designator token (L/R/C/W/A/B).
    RunwayDesignator,
    /// Start-type category nibble.
    StartType,
    /// ILS/VOR type byte.
    IlsVorType,
    /// Packed region (low 11 bits) and airport identifiers.
    RegionAirport,
}

impl Codec {
    /// Get the name of this codec.
    pub const fn name(&self) -> &'static str {
        match self {
            Codec::UInt => "UInt",
            Codec::Float => "Float",
            Codec::Text => "Text",
            Codec::Ident { .. } => "Ident",
            Codec::Longitude => "Longitude",
            Codec::Latitude => "Latitude",
            Codec::RunwayNumber => "RunwayNumber",
            Codec::RunwayDesignator => "RunwayDesignator",
            Codec::StartType => "StartType",
            Codec::IlsVorType => "IlsVorType",
            Codec::RegionAirport => "RegionAirport",
        }
    }
}

/// Which part of its byte span a field actually occupies.
///
/// Nibble-packed fields share their single byte with an unrelated field; the
/// patcher must preserve the other half bit-exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Packing {
    /// The field owns its whole byte range.
    Full,
    /// The field lives in the low nibble of one shared byte.
    LowNibble,
    /// The field lives in the high nibble of one shared byte.
    HighNibble,
}

/// A decoded logical value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    UInt(u64),
    Float(f64),
    Text(String),
    /// Region and airport identifiers packed into one integer.
    RegionAirport { region: String, airport: String },
}

impl FieldValue {
    /// Plain textual form of the value.
    pub fn text(&self) -> String {
        match self {
            FieldValue::UInt(v) => v.to_string(),
            FieldValue::Float(v) => v.to_string(),
            FieldValue::Text(s) => s.clone(),
            FieldValue::RegionAirport { region, airport } => format!("{region}/{airport}"),
        }
    }
}

/// The atomic decoded unit: a typed value plus its byte provenance.
#[derive(Debug, Clone)]
pub struct Field {
    /// Absolute offset of the owning byte range.
    pub offset: u64,
    /// The exact source bytes; `raw.len()` is the field width.
    pub raw: Vec<u8>,
    /// The decoded value.
    pub value: FieldValue,
    /// Human-readable form; defaults to the value's textual form but mapped
    /// codecs override it (runway tokens, enum names).
    pub display: String,
    /// The codec that produced `value`.
    pub codec: Codec,
    /// Nibble packing within the byte range.
    pub packing: Packing,
}

impl Field {
    /// Byte width of the field.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Whether the field spans zero bytes.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

impl fmt::Display for Field {
    /// `display [value] (raw hex) @ OFFSET`, with the bracketed value shown
    /// only when the display string is a mapped form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display)?;
        let text = self.value.text();
        if text != self.display {
            write!(f, " [{text}]")?;
        }
        let hex: Vec<String> = self.raw.iter().map(|b| format!("{b:02X}")).collect();
        write!(f, " ({}) @ {:X}", hex.join(" "), self.offset)
    }
}

/// Display string of an optional field, empty when absent.
pub fn display_of(field: &Option<Field>) -> &str {
    field.as_ref().map(|f| f.display.as_str()).unwrap_or("")
}

/// A top-level record that failed to decode and was dropped from its parent
/// collection.
#[derive(Debug)]
pub struct DecodeIssue {
    /// Record kind name.
    pub record: &'static str,
    /// Absolute offset of the record span.
    pub offset: u64,
    /// The decode error.
    pub error: Error,
}

impl fmt::Display for DecodeIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "dropped {} record at {:#x}: {}",
            self.record, self.offset, self.error
        )
    }
}

/// The decoded container: ordered record collections in stream order.
#[derive(Debug, Default)]
pub struct Bgl {
    /// Name of the backing stream.
    pub name: String,
    pub airports: Vec<Airport>,
    pub ils_vors: Vec<IlsVor>,
    pub waypoints: Vec<Waypoint>,
    /// Records dropped because of per-record decode errors.
    pub issues: Vec<DecodeIssue>,
}

impl Bgl {
    /// Create an empty container model.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Look up an airport by its decoded identifier.
    pub fn airport(&self, ident: &str) -> Option<&Airport> {
        self.airports
            .iter()
            .find(|a| display_of(&a.ident) == ident)
    }
}

impl fmt::Display for Bgl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
