//! Record decoders, one module per section kind.
//!
//! Shared here: the field readers that combine a byte-source read with a
//! codec, and the self-delimited subrecord walk that every composite record
//! uses. Field offsets inside each decoder are fixed relative to the record
//! start; compatibility with stored containers depends on them being exact.

use std::io::{Read, Seek};

use rwyfix_common::ByteSource;

use crate::codec;
use crate::model::{Codec, Field, FieldValue, Packing};
use crate::{Error, Result};

mod airport;
mod navaid;
mod waypoint;

pub use airport::{Airport, Procedure, Runway, RunwayTransition, Start, TaxiwayPath};
pub use navaid::{Dme, Glideslope, IlsVor, Localizer};
pub use waypoint::Waypoint;

pub(crate) use airport::parse_airport;
pub(crate) use navaid::parse_ils_vor;
pub(crate) use waypoint::parse_waypoint;

/// Subrecord kind identifiers, the 2-byte value opening every subrecord.
pub(crate) mod subrecord {
    pub const NAME: u16 = 0x19;
    pub const RUNWAY: u16 = 0xCE;
    pub const DEPARTURE: u16 = 0x42;
    pub const ARRIVAL: u16 = 0x48;
    pub const RUNWAY_TRANSITIONS: u16 = 0x46;
    pub const START: u16 = 0x11;
    pub const TAXIWAY_PATH_CONTAINER: u16 = 0xD4;
    pub const ILS_LOCALIZER: u16 = 0x14;
    pub const DME: u16 = 0x16;
    pub const GLIDESLOPE: u16 = 0x15;
}

/// Minimum record span: 2-byte kind id plus 4-byte self-inclusive length.
pub(crate) const RECORD_PREFIX_SIZE: u32 = 6;

/// Walk a record's subrecord region using the 6-byte prefix protocol.
///
/// Reads kind id and declared length at the cursor, hands both to `visit`,
/// and advances by the declared length whether or not the kind was
/// recognized. A declared length below the prefix size would stall the
/// cursor and is rejected as a structural error.
pub(crate) fn walk_subrecords<S, F>(
    src: &mut ByteSource<S>,
    offset: u64,
    size: u32,
    header_size: u32,
    mut visit: F,
) -> Result<()>
where
    S: Read + Seek,
    F: FnMut(&mut ByteSource<S>, u16, u64, u32) -> Result<()>,
{
    let end = offset + u64::from(size);
    let mut cursor = offset + u64::from(header_size);
    while cursor < end {
        let kind = src.read_u16(cursor)?;
        let declared = src.read_u32(cursor + 0x02)?;
        if declared < RECORD_PREFIX_SIZE {
            return Err(Error::RecordTooShort {
                offset: cursor,
                declared,
            });
        }
        visit(src, kind, cursor, declared)?;
        cursor += u64::from(declared);
    }
    Ok(())
}

fn field(offset: u64, raw: Vec<u8>, value: FieldValue, codec: Codec) -> Field {
    let display = value.text();
    Field {
        offset,
        raw,
        value,
        display,
        codec,
        packing: Packing::Full,
    }
}

pub(crate) fn uint_field<S: Read + Seek>(
    src: &mut ByteSource<S>,
    offset: u64,
    width: usize,
) -> Result<Field> {
    let raw = src.read(offset, width)?;
    let value = codec::decode_uint(&raw);
    Ok(field(offset, raw, FieldValue::UInt(value), Codec::UInt))
}

pub(crate) fn f32_field<S: Read + Seek>(src: &mut ByteSource<S>, offset: u64) -> Result<Field> {
    let raw = src.read(offset, 4)?;
    let value = f64::from(codec::decode_f32(&raw));
    Ok(field(offset, raw, FieldValue::Float(value), Codec::Float))
}

pub(crate) fn text_field<S: Read + Seek>(
    src: &mut ByteSource<S>,
    offset: u64,
    len: usize,
) -> Result<Field> {
    let raw = src.read(offset, len)?;
    let value = codec::decode_string(&raw)?;
    Ok(field(offset, raw, FieldValue::Text(value), Codec::Text))
}

/// Name subrecord payload: the string follows a 6-byte label prefix.
pub(crate) fn name_field<S: Read + Seek>(
    src: &mut ByteSource<S>,
    offset: u64,
    size: u32,
) -> Result<Field> {
    text_field(src, offset + 0x06, size as usize - 6)
}

pub(crate) fn ident_field<S: Read + Seek>(
    src: &mut ByteSource<S>,
    offset: u64,
    width: usize,
    shifted: bool,
) -> Result<Field> {
    let raw = src.read(offset, width)?;
    let packed = codec::decode_uint(&raw);
    let ident = codec::decode_ident(packed, shifted)?;
    Ok(field(
        offset,
        raw,
        FieldValue::Text(ident),
        Codec::Ident { shifted },
    ))
}

pub(crate) fn longitude_field<S: Read + Seek>(
    src: &mut ByteSource<S>,
    offset: u64,
) -> Result<Field> {
    let raw = src.read(offset, 4)?;
    let value = codec::decode_longitude(codec::decode_uint(&raw) as u32);
    Ok(field(offset, raw, FieldValue::Float(value), Codec::Longitude))
}

pub(crate) fn latitude_field<S: Read + Seek>(
    src: &mut ByteSource<S>,
    offset: u64,
) -> Result<Field> {
    let raw = src.read(offset, 4)?;
    let value = codec::decode_latitude(codec::decode_uint(&raw) as u32);
    Ok(field(offset, raw, FieldValue::Float(value), Codec::Latitude))
}

pub(crate) fn runway_number_field<S: Read + Seek>(
    src: &mut ByteSource<S>,
    offset: u64,
) -> Result<Field> {
    let raw = src.read(offset, 1)?;
    let value = u64::from(raw[0]);
    Ok(Field {
        offset,
        raw,
        display: codec::runway_number_display(value),
        value: FieldValue::UInt(value),
        codec: Codec::RunwayNumber,
        packing: Packing::Full,
    })
}

pub(crate) fn runway_designator_field<S: Read + Seek>(
    src: &mut ByteSource<S>,
    offset: u64,
) -> Result<Field> {
    let raw = src.read(offset, 1)?;
    let value = u64::from(raw[0]);
    Ok(Field {
        offset,
        raw,
        display: codec::runway_designator_display(value).to_string(),
        value: FieldValue::UInt(value),
        codec: Codec::RunwayDesignator,
        packing: Packing::Full,
    })
}
