//! Field codecs for the bespoke BGL encodings.
//!
//! These are pure functions over raw bytes or raw integers; all stream access
//! happens in the record decoders. Each decoder here has a matching inverse
//! only where the patcher needs one (runway-number and runway-designator
//! tokens); everything else is decode-only.

use byteorder::{ByteOrder, LittleEndian};

use crate::{Error, Result};

/// Number of symbols in the identifier alphabet {space, '0'-'9', 'A'-'Z'}.
const IDENT_BASE: u64 = 38;

/// 2^28, the quantization denominator shared by both angle encodings.
const ANGLE_STEPS: f64 = 268_435_456.0;

const LONGITUDE_SCALE: f64 = 360.0 / (3.0 * ANGLE_STEPS);
const LATITUDE_SCALE: f64 = 180.0 / (2.0 * ANGLE_STEPS);

/// Decode an unsigned little-endian integer of 1-8 bytes.
pub fn decode_uint(raw: &[u8]) -> u64 {
    let mut value = 0u64;
    for (i, byte) in raw.iter().enumerate().take(8) {
        value |= u64::from(*byte) << (i * 8);
    }
    value
}

/// Encode an unsigned integer as `width` little-endian bytes.
pub fn encode_uint(value: u64, width: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; width];
    for (i, byte) in bytes.iter_mut().enumerate().take(8) {
        *byte = (value >> (i * 8)) as u8;
    }
    bytes
}

/// Decode a 4-byte little-endian IEEE-754 float.
pub fn decode_f32(raw: &[u8]) -> f32 {
    LittleEndian::read_f32(raw)
}

/// Decode a fixed-width string, trimming trailing NUL padding.
pub fn decode_string(raw: &[u8]) -> Result<String> {
    let end = raw
        .iter()
        .rposition(|&b| b != 0)
        .map(|p| p + 1)
        .unwrap_or(0);
    Ok(std::str::from_utf8(&raw[..end])?.to_string())
}

/// Decode a base-38 identifier from its packed integer form.
///
/// Symbols come out most-significant first; value 0 decodes to the empty
/// string. Primary identifiers carry 5 low bits of unrelated data and are
/// decoded with `shifted`; identifiers embedded as cross-references (the ILS
/// idents inside a runway record) are not.
pub fn decode_ident(value: u64, shifted: bool) -> Result<String> {
    if value == 0 {
        return Ok(String::new());
    }
    let mut calc = if shifted { value >> 5 } else { value };
    let mut symbols = Vec::new();
    while calc >= IDENT_BASE {
        symbols.push(ident_char(calc % IDENT_BASE)?);
        calc /= IDENT_BASE;
    }
    symbols.push(ident_char(calc)?);
    symbols.reverse();
    Ok(symbols.into_iter().collect())
}

/// Map one base-38 symbol value to its character. Value 1 is reserved.
fn ident_char(value: u64) -> Result<char> {
    match value {
        0 => Ok(' '),
        2..=11 => Ok((value as u8 + 46) as char),
        12..=37 => Ok((value as u8 + 53) as char),
        _ => Err(Error::InvalidIdentSymbol(value)),
    }
}

/// Decode a quantized longitude from its 4-byte unsigned form.
pub fn decode_longitude(raw: u32) -> f64 {
    f64::from(raw) * LONGITUDE_SCALE - 180.0
}

/// Decode a quantized latitude from its 4-byte unsigned form.
pub fn decode_latitude(raw: u32) -> f64 {
    90.0 - f64::from(raw) * LATITUDE_SCALE
}

/// Display string for a stored runway number.
///
/// 1-36 are zero-padded runway headings, 37-44 are helipad compass
/// directions, and everything else (including 0) displays as empty.
pub fn runway_number_display(value: u64) -> String {
    match value {
        1..=36 => format!("{value:02}"),
        37 => "n".to_string(),
        38 => "ne".to_string(),
        39 => "e".to_string(),
        40 => "se".to_string(),
        41 => "s".to_string(),
        42 => "sw".to_string(),
        43 => "w".to_string(),
        44 => "nw".to_string(),
        _ => String::new(),
    }
}

/// Inverse of [`runway_number_display`], rejecting anything outside
/// {1..36} and the eight compass tokens.
pub fn runway_number_to_int(token: &str) -> Result<u8> {
    match token {
        "n" => return Ok(37),
        "ne" => return Ok(38),
        "e" => return Ok(39),
        "se" => return Ok(40),
        "s" => return Ok(41),
        "sw" => return Ok(42),
        "w" => return Ok(43),
        "nw" => return Ok(44),
        _ => {}
    }
    let n: u8 = token
        .parse()
        .map_err(|_| Error::InvalidRunwayNumber(token.to_string()))?;
    if (1..=36).contains(&n) {
        Ok(n)
    } else {
        Err(Error::InvalidRunwayNumber(token.to_string()))
    }
}

/// Display string for a stored runway designator.
pub fn runway_designator_display(value: u64) -> &'static str {
    match value {
        1 => "L",
        2 => "R",
        3 => "C",
        4 => "W",
        5 => "A",
        6 => "B",
        _ => "",
    }
}

/// Inverse of [`runway_designator_display`], accepting only
/// {'', L, R, C, W, A, B}.
pub fn runway_designator_to_int(token: &str) -> Result<u8> {
    match token {
        "" => Ok(0),
        "L" => Ok(1),
        "R" => Ok(2),
        "C" => Ok(3),
        "W" => Ok(4),
        "A" => Ok(5),
        "B" => Ok(6),
        _ => Err(Error::InvalidRunwayDesignator(token.to_string())),
    }
}

/// Category stored in the high nibble of a start subrecord's packed byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum StartType {
    Unknown = 0,
    Runway = 1,
    Water = 2,
    Helipad = 3,
    Track = 4,
}

impl StartType {
    /// Get the name of this start type.
    pub const fn name(&self) -> &'static str {
        match self {
            StartType::Unknown => "Unknown",
            StartType::Runway => "Runway",
            StartType::Water => "Water",
            StartType::Helipad => "Helipad",
            StartType::Track => "Track",
        }
    }
}

impl TryFrom<u8> for StartType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(StartType::Unknown),
            1 => Ok(StartType::Runway),
            2 => Ok(StartType::Water),
            3 => Ok(StartType::Helipad),
            4 => Ok(StartType::Track),
            _ => Err(Error::UnknownStartType(value)),
        }
    }
}

impl std::fmt::Display for StartType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Navaid category stored in the type byte of an ILS/VOR record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum IlsVorType {
    VorTerminal = 1,
    VorLow = 2,
    VorHigh = 3,
    Ils = 4,
    /// VOR test facility (VOT) with voice.
    VorVot = 5,
}

impl IlsVorType {
    /// Get the name of this navaid type.
    pub const fn name(&self) -> &'static str {
        match self {
            IlsVorType::VorTerminal => "VorTerminal",
            IlsVorType::VorLow => "VorLow",
            IlsVorType::VorHigh => "VorHigh",
            IlsVorType::Ils => "Ils",
            IlsVorType::VorVot => "VorVot",
        }
    }
}

impl TryFrom<u8> for IlsVorType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(IlsVorType::VorTerminal),
            2 => Ok(IlsVorType::VorLow),
            3 => Ok(IlsVorType::VorHigh),
            4 => Ok(IlsVorType::Ils),
            5 => Ok(IlsVorType::VorVot),
            _ => Err(Error::UnknownIlsVorType(value)),
        }
    }
}

impl std::fmt::Display for IlsVorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uint_roundtrip() {
        assert_eq!(decode_uint(&[0x34, 0x12]), 0x1234);
        assert_eq!(encode_uint(0x1234, 2), vec![0x34, 0x12]);
        assert_eq!(encode_uint(9, 1), vec![9]);
        assert_eq!(decode_uint(&encode_uint(0xDEADBEEF, 4)), 0xDEADBEEF);
    }

    #[test]
    fn test_string_trims_trailing_nuls() {
        assert_eq!(decode_string(b"ILS 09L\0").unwrap(), "ILS 09L");
        assert_eq!(decode_string(b"\0\0\0").unwrap(), "");
        assert!(decode_string(&[0xFF, 0xFE, 0x00]).is_err());
    }

    #[test]
    fn test_ident_decode() {
        // "ABC" = ((12 * 38) + 13) * 38 + 14
        let packed = ((12 * 38 + 13) * 38 + 14) as u64;
        assert_eq!(decode_ident(packed, false).unwrap(), "ABC");
        assert_eq!(decode_ident(packed << 5, true).unwrap(), "ABC");
        // "7" = symbol 9
        assert_eq!(decode_ident(9, false).unwrap(), "7");
        assert_eq!(decode_ident(0, true).unwrap(), "");
        assert_eq!(decode_ident(0, false).unwrap(), "");
    }

    #[test]
    fn test_ident_reserved_symbol_fails() {
        assert!(decode_ident(1, false).is_err());
        // Symbol 1 in a higher digit position.
        assert!(decode_ident(38 + 12, false).is_err());
        assert!(decode_ident(1 << 5, true).is_err());
    }

    #[test]
    fn test_angle_boundaries() {
        assert_eq!(decode_longitude(0), -180.0);
        assert_eq!(decode_longitude(805_306_368), 180.0); // 3 * 2^28
        assert_eq!(decode_latitude(0), 90.0);
        assert_eq!(decode_latitude(536_870_912), -90.0); // 2 * 2^28
        // Monotonic over the raw domain.
        assert!(decode_longitude(1) > decode_longitude(0));
        assert!(decode_latitude(1) < decode_latitude(0));
    }

    #[test]
    fn test_runway_number_display() {
        assert_eq!(runway_number_display(0), "");
        assert_eq!(runway_number_display(9), "09");
        assert_eq!(runway_number_display(36), "36");
        assert_eq!(runway_number_display(37), "n");
        assert_eq!(runway_number_display(44), "nw");
        assert_eq!(runway_number_display(45), "");
    }

    #[test]
    fn test_runway_number_roundtrip() {
        for n in 1..=36u8 {
            assert_eq!(runway_number_to_int(&runway_number_display(n.into())).unwrap(), n);
        }
        for n in 37..=44u8 {
            assert_eq!(runway_number_to_int(&runway_number_display(n.into())).unwrap(), n);
        }
        assert!(runway_number_to_int("0").is_err());
        assert!(runway_number_to_int("37").is_err());
        assert!(runway_number_to_int("x").is_err());
        assert!(runway_number_to_int("").is_err());
    }

    #[test]
    fn test_runway_designator_tokens() {
        assert_eq!(runway_designator_display(0), "");
        assert_eq!(runway_designator_display(1), "L");
        assert_eq!(runway_designator_display(6), "B");
        assert_eq!(runway_designator_display(7), "");
        assert_eq!(runway_designator_to_int("").unwrap(), 0);
        assert_eq!(runway_designator_to_int("C").unwrap(), 3);
        assert!(runway_designator_to_int("Z").is_err());
        assert!(runway_designator_to_int("l").is_err());
    }

    #[test]
    fn test_enum_bytes() {
        assert_eq!(StartType::try_from(1).unwrap(), StartType::Runway);
        assert!(StartType::try_from(5).is_err());
        assert_eq!(IlsVorType::try_from(4).unwrap(), IlsVorType::Ils);
        assert!(IlsVorType::try_from(0).is_err());
        assert!(IlsVorType::try_from(6).is_err());
    }
}
