//! ILS/VOR navaid records and their localizer, DME, and glideslope children.

use std::fmt;
use std::io::{Read, Seek};

use rwyfix_common::ByteSource;

use crate::codec::{self, IlsVorType};
use crate::model::{display_of, Codec, Field, FieldValue, Packing};
use crate::records::{self, subrecord};
use crate::Result;

/// Fixed header size of an ILS/VOR record.
const ILS_VOR_HEADER_SIZE: u32 = 0x28;

/// Bit width of the region half of the packed region/airport field.
const REGION_BITS: u32 = 11;

/// A decoded ILS or VOR station.
#[derive(Debug, Clone, Default)]
pub struct IlsVor {
    pub offset: u64,
    pub size: u32,
    pub navaid_type: Option<Field>,
    pub name: Option<Field>,
    pub ident: Option<Field>,
    pub region_airport: Option<Field>,
    pub longitude: Option<Field>,
    pub latitude: Option<Field>,
    pub magvar: Option<Field>,
    pub localizer: Option<Localizer>,
    pub dme: Option<Dme>,
    pub glideslope: Option<Glideslope>,
}

impl fmt::Display for IlsVor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{}", name.display),
            None => write!(f, "{}", display_of(&self.ident)),
        }
    }
}

/// ILS localizer beam parameters.
#[derive(Debug, Clone, Default)]
pub struct Localizer {
    pub offset: u64,
    pub size: u32,
    pub runway_number: Option<Field>,
    pub runway_designator: Option<Field>,
    pub heading: Option<Field>,
    pub width: Option<Field>,
}

/// Distance-measuring equipment position and range.
#[derive(Debug, Clone, Default)]
pub struct Dme {
    pub offset: u64,
    pub size: u32,
    pub longitude: Option<Field>,
    pub latitude: Option<Field>,
    pub elevation: Option<Field>,
    pub range: Option<Field>,
}

/// Glideslope antenna position, range, and pitch.
#[derive(Debug, Clone, Default)]
pub struct Glideslope {
    pub offset: u64,
    pub size: u32,
    pub longitude: Option<Field>,
    pub latitude: Option<Field>,
    pub elevation: Option<Field>,
    pub range: Option<Field>,
    pub pitch: Option<Field>,
}

/// Decode an ILS/VOR record span, dispatching its subrecord region.
pub(crate) fn parse_ils_vor<S: Read + Seek>(
    src: &mut ByteSource<S>,
    offset: u64,
    size: u32,
) -> Result<IlsVor> {
    let mut navaid = IlsVor {
        offset,
        size,
        ..Default::default()
    };

    let type_offset = offset + 0x06;
    let type_raw = src.read(type_offset, 1)?;
    let navaid_type = IlsVorType::try_from(type_raw[0])
        .map_err(|e| e.in_field("IlsVor", "navaid_type", type_offset))?;
    navaid.navaid_type = Some(Field {
        offset: type_offset,
        raw: type_raw,
        value: FieldValue::UInt(u64::from(navaid_type as u8)),
        display: navaid_type.name().to_string(),
        codec: Codec::IlsVorType,
        packing: Packing::Full,
    });

    navaid.longitude = Some(records::longitude_field(src, offset + 0x08)?);
    navaid.latitude = Some(records::latitude_field(src, offset + 0x0C)?);
    navaid.magvar = Some(records::f32_field(src, offset + 0x1C)?);
    navaid.ident = Some(
        records::ident_field(src, offset + 0x20, 4, true)
            .map_err(|e| e.in_field("IlsVor", "ident", offset + 0x20))?,
    );
    if navaid_type == IlsVorType::Ils {
        navaid.region_airport = Some(
            region_airport_field(src, offset + 0x24)
                .map_err(|e| e.in_field("IlsVor", "region_airport", offset + 0x24))?,
        );
    }

    records::walk_subrecords(
        src,
        offset,
        size,
        ILS_VOR_HEADER_SIZE,
        |src, kind, off, len| {
            match kind {
                subrecord::NAME => navaid.name = Some(records::name_field(src, off, len)?),
                subrecord::ILS_LOCALIZER => navaid.localizer = Some(parse_localizer(src, off, len)?),
                subrecord::DME => navaid.dme = Some(parse_dme(src, off, len)?),
                subrecord::GLIDESLOPE => navaid.glideslope = Some(parse_glideslope(src, off, len)?),
                _ => {}
            }
            Ok(())
        },
    )?;

    Ok(navaid)
}

/// Decode the packed region/airport cross-reference: airport ident in the
/// high bits, region ident in the low 11, both base-38 without pre-shift.
fn region_airport_field<S: Read + Seek>(src: &mut ByteSource<S>, offset: u64) -> Result<Field> {
    let raw = src.read(offset, 4)?;
    let packed = codec::decode_uint(&raw);
    let airport = codec::decode_ident(packed >> REGION_BITS, false)?;
    let region = codec::decode_ident(packed & ((1 << REGION_BITS) - 1), false)?;
    let value = FieldValue::RegionAirport { region, airport };
    let display = value.text();
    Ok(Field {
        offset,
        raw,
        value,
        display,
        codec: Codec::RegionAirport,
        packing: Packing::Full,
    })
}

fn parse_localizer<S: Read + Seek>(
    src: &mut ByteSource<S>,
    offset: u64,
    size: u32,
) -> Result<Localizer> {
    Ok(Localizer {
        offset,
        size,
        runway_number: Some(records::runway_number_field(src, offset + 0x06)?),
        runway_designator: Some(records::runway_designator_field(src, offset + 0x07)?),
        heading: Some(records::f32_field(src, offset + 0x08)?),
        width: Some(records::f32_field(src, offset + 0x0C)?),
    })
}

fn parse_dme<S: Read + Seek>(src: &mut ByteSource<S>, offset: u64, size: u32) -> Result<Dme> {
    Ok(Dme {
        offset,
        size,
        longitude: Some(records::longitude_field(src, offset + 0x08)?),
        latitude: Some(records::latitude_field(src, offset + 0x0C)?),
        elevation: Some(records::uint_field(src, offset + 0x10, 4)?),
        range: Some(records::f32_field(src, offset + 0x14)?),
    })
}

fn parse_glideslope<S: Read + Seek>(
    src: &mut ByteSource<S>,
    offset: u64,
    size: u32,
) -> Result<Glideslope> {
    Ok(Glideslope {
        offset,
        size,
        longitude: Some(records::longitude_field(src, offset + 0x08)?),
        latitude: Some(records::latitude_field(src, offset + 0x0C)?),
        elevation: Some(records::uint_field(src, offset + 0x10, 4)?),
        range: Some(records::f32_field(src, offset + 0x14)?),
        pitch: Some(records::f32_field(src, offset + 0x18)?),
    })
}
