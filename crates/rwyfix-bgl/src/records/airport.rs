//! Airport records and their subrecord tree.
//!
//! An airport record carries a 0x44-byte fixed header (magnetic variation and
//! identifier) followed by a subrecord region holding the name, runways,
//! departure/arrival procedures, start positions, and taxiway-path
//! containers.

use std::fmt;
use std::io::{Read, Seek};

use rwyfix_common::ByteSource;

use crate::codec::{self, StartType};
use crate::model::{display_of, Codec, Field, FieldValue, Packing};
use crate::records::{self, subrecord};
use crate::Result;

/// Fixed header size of an airport record.
const AIRPORT_HEADER_SIZE: u32 = 0x44;
/// Fixed header size of a departure/arrival procedure record.
const PROCEDURE_HEADER_SIZE: u32 = 0x14;

/// Fixed size of one taxiway-path entry, excluding its material blocks.
const TAXIWAY_ENTRY_SIZE: u64 = 48;
/// Size of one material block trailing a taxiway-path entry.
const MATERIAL_BLOCK_SIZE: u64 = 44;
/// Taxiway-path type nibble marking a runway segment.
const TAXIWAY_PATH_RUNWAY: u8 = 0x2;

/// A decoded airport with all recognized subrecords.
#[derive(Debug, Clone, Default)]
pub struct Airport {
    pub offset: u64,
    pub size: u32,
    pub name: Option<Field>,
    pub magvar: Option<Field>,
    pub ident: Option<Field>,
    pub runways: Vec<Runway>,
    pub departures: Vec<Procedure>,
    pub arrivals: Vec<Procedure>,
    pub starts: Vec<Start>,
    pub taxiway_paths: Vec<TaxiwayPath>,
}

impl Airport {
    fn new(offset: u64, size: u32) -> Self {
        Self {
            offset,
            size,
            ..Default::default()
        }
    }
}

impl fmt::Display for Airport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{}", name.display),
            None => write!(f, "{}", display_of(&self.ident)),
        }
    }
}

/// A runway subrecord: both runway ends plus cross-referenced ILS idents.
#[derive(Debug, Clone, Default)]
pub struct Runway {
    pub offset: u64,
    pub size: u32,
    pub heading: Option<Field>,
    pub primary_number: Option<Field>,
    pub primary_designator: Option<Field>,
    pub primary_ils: Option<Field>,
    pub secondary_number: Option<Field>,
    pub secondary_designator: Option<Field>,
    pub secondary_ils: Option<Field>,
}

impl fmt::Display for Runway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{} / {}{}",
            display_of(&self.primary_number),
            display_of(&self.primary_designator),
            display_of(&self.secondary_number),
            display_of(&self.secondary_designator)
        )
    }
}

/// A departure or arrival procedure with its runway transitions.
#[derive(Debug, Clone, Default)]
pub struct Procedure {
    pub offset: u64,
    pub size: u32,
    pub name: Option<Field>,
    pub runway_transitions: Vec<RunwayTransition>,
}

impl fmt::Display for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", display_of(&self.name))
    }
}

/// A runway transition child of a procedure.
#[derive(Debug, Clone, Default)]
pub struct RunwayTransition {
    pub offset: u64,
    pub size: u32,
    pub number: Option<Field>,
    pub designator: Option<Field>,
}

impl fmt::Display for RunwayTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", display_of(&self.number), display_of(&self.designator))
    }
}

/// A start position; its packed byte holds start-type (high nibble) and
/// runway designator (low nibble).
#[derive(Debug, Clone, Default)]
pub struct Start {
    pub offset: u64,
    pub size: u32,
    pub number: Option<Field>,
    pub designator: Option<Field>,
    pub start_type: Option<Field>,
}

impl fmt::Display for Start {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", display_of(&self.number), display_of(&self.designator))
    }
}

/// A runway-typed taxiway-path entry; other entry types are skipped during
/// decoding.
#[derive(Debug, Clone, Default)]
pub struct TaxiwayPath {
    pub offset: u64,
    pub size: u32,
    pub path_type: Option<Field>,
    pub number: Option<Field>,
    pub designator: Option<Field>,
}

impl fmt::Display for TaxiwayPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}{}",
            display_of(&self.path_type),
            display_of(&self.number),
            display_of(&self.designator)
        )
    }
}

/// Decode an airport record span, dispatching its subrecord region.
pub(crate) fn parse_airport<S: Read + Seek>(
    src: &mut ByteSource<S>,
    offset: u64,
    size: u32,
) -> Result<Airport> {
    let mut airport = Airport::new(offset, size);
    airport.magvar = Some(records::f32_field(src, offset + 0x24)?);
    airport.ident = Some(
        records::ident_field(src, offset + 0x28, 4, true)
            .map_err(|e| e.in_field("Airport", "ident", offset + 0x28))?,
    );

    records::walk_subrecords(src, offset, size, AIRPORT_HEADER_SIZE, |src, kind, off, len| {
        match kind {
            subrecord::NAME => airport.name = Some(records::name_field(src, off, len)?),
            subrecord::RUNWAY => airport.runways.push(parse_runway(src, off, len)?),
            subrecord::DEPARTURE => airport.departures.push(parse_procedure(src, off, len)?),
            subrecord::ARRIVAL => airport.arrivals.push(parse_procedure(src, off, len)?),
            subrecord::START => airport.starts.push(parse_start(src, off, len)?),
            subrecord::TAXIWAY_PATH_CONTAINER => {
                airport.taxiway_paths.extend(parse_taxiway_paths(src, off)?)
            }
            _ => {}
        }
        Ok(())
    })?;

    Ok(airport)
}

fn parse_runway<S: Read + Seek>(
    src: &mut ByteSource<S>,
    offset: u64,
    size: u32,
) -> Result<Runway> {
    let mut runway = Runway {
        offset,
        size,
        ..Default::default()
    };
    runway.primary_number = Some(records::runway_number_field(src, offset + 0x08)?);
    runway.primary_designator = Some(records::runway_designator_field(src, offset + 0x09)?);
    runway.secondary_number = Some(records::runway_number_field(src, offset + 0x0A)?);
    runway.secondary_designator = Some(records::runway_designator_field(src, offset + 0x0B)?);
    // The ILS idents are cross-references, stored without the 5-bit pre-shift.
    runway.primary_ils = Some(
        records::ident_field(src, offset + 0x0C, 4, false)
            .map_err(|e| e.in_field("Runway", "primary_ils", offset + 0x0C))?,
    );
    runway.secondary_ils = Some(
        records::ident_field(src, offset + 0x10, 4, false)
            .map_err(|e| e.in_field("Runway", "secondary_ils", offset + 0x10))?,
    );
    runway.heading = Some(records::f32_field(src, offset + 0x28)?);
    Ok(runway)
}

fn parse_procedure<S: Read + Seek>(
    src: &mut ByteSource<S>,
    offset: u64,
    size: u32,
) -> Result<Procedure> {
    let mut procedure = Procedure {
        offset,
        size,
        ..Default::default()
    };
    procedure.name = Some(records::text_field(src, offset + 0x0C, 8)?);

    records::walk_subrecords(
        src,
        offset,
        size,
        PROCEDURE_HEADER_SIZE,
        |src, kind, off, len| {
            if kind == subrecord::RUNWAY_TRANSITIONS {
                procedure
                    .runway_transitions
                    .push(parse_runway_transition(src, off, len)?);
            }
            Ok(())
        },
    )?;

    Ok(procedure)
}

fn parse_runway_transition<S: Read + Seek>(
    src: &mut ByteSource<S>,
    offset: u64,
    size: u32,
) -> Result<RunwayTransition> {
    Ok(RunwayTransition {
        offset,
        size,
        number: Some(records::runway_number_field(src, offset + 0x07)?),
        designator: Some(records::runway_designator_field(src, offset + 0x08)?),
    })
}

fn parse_start<S: Read + Seek>(src: &mut ByteSource<S>, offset: u64, size: u32) -> Result<Start> {
    let mut start = Start {
        offset,
        size,
        ..Default::default()
    };
    start.number = Some(records::runway_number_field(src, offset + 0x06)?);

    // One byte packs start-type (high nibble) and designator (low nibble).
    let packed_offset = offset + 0x07;
    let raw = src.read(packed_offset, 1)?;
    let type_nibble = raw[0] >> 4;
    let designator_nibble = raw[0] & 0x0F;

    let start_type = StartType::try_from(type_nibble)
        .map_err(|e| e.in_field("Start", "start_type", packed_offset))?;
    start.start_type = Some(Field {
        offset: packed_offset,
        raw: raw.clone(),
        value: FieldValue::UInt(u64::from(type_nibble)),
        display: start_type.name().to_string(),
        codec: Codec::StartType,
        packing: Packing::HighNibble,
    });
    start.designator = Some(Field {
        offset: packed_offset,
        raw,
        value: FieldValue::UInt(u64::from(designator_nibble)),
        display: codec::runway_designator_display(u64::from(designator_nibble)).to_string(),
        codec: Codec::RunwayDesignator,
        packing: Packing::LowNibble,
    });
    Ok(start)
}

/// Decode a taxiway-path container, surfacing only runway-typed entries.
///
/// Every entry spans 48 bytes plus its trailing material blocks; entries of
/// other types still advance the cursor by their full span.
fn parse_taxiway_paths<S: Read + Seek>(
    src: &mut ByteSource<S>,
    offset: u64,
) -> Result<Vec<TaxiwayPath>> {
    let count = src.read_u16(offset + 0x06)?;
    let mut paths = Vec::new();
    let mut entry = offset + 0x08;
    for _ in 0..count {
        let material_count = src.read_u8(entry + 0x2C)?;
        let span = TAXIWAY_ENTRY_SIZE + u64::from(material_count) * MATERIAL_BLOCK_SIZE;

        let type_raw = src.read(entry + 0x04, 1)?;
        let type_nibble = type_raw[0] & 0x0F;
        if type_nibble == TAXIWAY_PATH_RUNWAY {
            let mut path = TaxiwayPath {
                offset: entry,
                size: span as u32,
                ..Default::default()
            };
            path.path_type = Some(Field {
                offset: entry + 0x04,
                raw: type_raw,
                value: FieldValue::UInt(u64::from(type_nibble)),
                display: type_nibble.to_string(),
                codec: Codec::UInt,
                packing: Packing::LowNibble,
            });
            path.number = Some(records::runway_number_field(src, entry + 0x05)?);

            // The designator shares its byte: high nibble here, unrelated
            // data below.
            let designator_raw = src.read(entry + 0x03, 1)?;
            let designator_nibble = designator_raw[0] >> 4;
            path.designator = Some(Field {
                offset: entry + 0x03,
                raw: designator_raw,
                value: FieldValue::UInt(u64::from(designator_nibble)),
                display: codec::runway_designator_display(u64::from(designator_nibble))
                    .to_string(),
                codec: Codec::RunwayDesignator,
                packing: Packing::HighNibble,
            });
            paths.push(path);
        }

        entry += span;
    }
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::testutil::{
        airport_record, name_subrecord, procedure_subrecord, runway_subrecord, start_subrecord,
        taxiway_container, transition_subrecord, TaxiwayEntry,
    };
    use crate::Error;

    fn parse(bytes: Vec<u8>) -> Result<Airport> {
        let size = bytes.len() as u32;
        let mut src = ByteSource::new(Cursor::new(bytes));
        parse_airport(&mut src, 0, size)
    }

    #[test]
    fn test_airport_header_fields() {
        let airport = parse(airport_record("KJFK", -12.5, vec![])).unwrap();
        assert_eq!(display_of(&airport.ident), "KJFK");
        let magvar = airport.magvar.unwrap();
        assert_eq!(magvar.value, FieldValue::Float(-12.5));
        assert_eq!(magvar.offset, 0x24);
        assert!(airport.runways.is_empty());
    }

    #[test]
    fn test_airport_name_subrecord() {
        let airport = parse(airport_record(
            "EDDB",
            2.0,
            vec![name_subrecord("Berlin Brandenburg")],
        ))
        .unwrap();
        assert_eq!(airport.name.unwrap().display, "Berlin Brandenburg");
    }

    #[test]
    fn test_runway_subrecord_fields() {
        let airport = parse(airport_record(
            "KJFK",
            0.0,
            vec![runway_subrecord(9, 1, 27, 2)],
        ))
        .unwrap();
        assert_eq!(airport.runways.len(), 1);
        let runway = &airport.runways[0];
        assert_eq!(runway.to_string(), "09L / 27R");
        assert_eq!(runway.primary_number.as_ref().unwrap().offset, 0x44 + 0x08);
        assert_eq!(display_of(&runway.primary_ils), "");
    }

    #[test]
    fn test_start_nibble_split() {
        let airport = parse(airport_record(
            "KJFK",
            0.0,
            vec![start_subrecord(9, StartType::Runway as u8, 1)],
        ))
        .unwrap();
        let start = &airport.starts[0];
        assert_eq!(start.to_string(), "09L");
        let start_type = start.start_type.as_ref().unwrap();
        assert_eq!(start_type.display, "Runway");
        assert_eq!(start_type.packing, Packing::HighNibble);
        let designator = start.designator.as_ref().unwrap();
        assert_eq!(designator.packing, Packing::LowNibble);
        // Both halves share the packed byte as provenance.
        assert_eq!(designator.offset, start_type.offset);
        assert_eq!(designator.raw, start_type.raw);
    }

    #[test]
    fn test_start_unknown_type_fails() {
        let err = parse(airport_record("KJFK", 0.0, vec![start_subrecord(9, 0xF, 1)]))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Field {
                record: "Start",
                field: "start_type",
                ..
            }
        ));
        assert!(!err.is_structural());
    }

    #[test]
    fn test_procedure_transitions() {
        let airport = parse(airport_record(
            "KJFK",
            0.0,
            vec![procedure_subrecord(
                subrecord::DEPARTURE,
                "DEPA1",
                vec![transition_subrecord(27, 2), transition_subrecord(9, 0)],
            )],
        ))
        .unwrap();
        let departure = &airport.departures[0];
        assert_eq!(departure.name.as_ref().unwrap().display, "DEPA1");
        assert_eq!(departure.runway_transitions.len(), 2);
        assert_eq!(departure.runway_transitions[0].to_string(), "27R");
        assert_eq!(departure.runway_transitions[1].to_string(), "09");
    }

    #[test]
    fn test_taxiway_paths_filter_and_stride() {
        // Entry 0: apron type with two material blocks, must be skipped but
        // still advance the cursor by 48 + 2*44. Entry 1: runway type.
        let airport = parse(airport_record(
            "KJFK",
            0.0,
            vec![taxiway_container(&[
                TaxiwayEntry {
                    path_type: 0x1,
                    number: 0,
                    designator: 0,
                    material_count: 2,
                },
                TaxiwayEntry {
                    path_type: TAXIWAY_PATH_RUNWAY,
                    number: 27,
                    designator: 2,
                    material_count: 0,
                },
            ])],
        ))
        .unwrap();
        assert_eq!(airport.taxiway_paths.len(), 1);
        let path = &airport.taxiway_paths[0];
        assert_eq!(path.to_string(), "2 - 27R");
        assert_eq!(path.designator.as_ref().unwrap().packing, Packing::HighNibble);
    }

    #[test]
    fn test_unrecognized_subrecord_skipped() {
        let mut unknown = vec![0u8; 0x10];
        unknown[0] = 0x77; // kind id nothing dispatches on
        unknown[2] = 0x10; // declared length
        let airport = parse(airport_record(
            "KJFK",
            0.0,
            vec![unknown, runway_subrecord(9, 0, 27, 0)],
        ))
        .unwrap();
        assert_eq!(airport.runways.len(), 1);
    }

    #[test]
    fn test_zero_length_subrecord_rejected() {
        let mut stalled = vec![0u8; 0x10];
        stalled[0] = 0xCE;
        // Declared length of zero would stall the cursor.
        let err = parse(airport_record("KJFK", 0.0, vec![stalled])).unwrap_err();
        assert!(matches!(err, Error::RecordTooShort { declared: 0, .. }));
        assert!(err.is_structural());
    }
}
