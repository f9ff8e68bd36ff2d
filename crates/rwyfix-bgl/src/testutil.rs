//! Synthetic container builders for tests.
//!
//! All builders produce byte-exact record images so decoder tests exercise
//! the real offsets, and `ContainerBuilder` lays out a minimal but complete
//! header / section table / subsection table around them.

use byteorder::{ByteOrder, LittleEndian};

use crate::records::subrecord;

pub fn put_u16(buf: &mut [u8], offset: usize, value: u16) {
    LittleEndian::write_u16(&mut buf[offset..offset + 2], value);
}

pub fn put_u32(buf: &mut [u8], offset: usize, value: u32) {
    LittleEndian::write_u32(&mut buf[offset..offset + 4], value);
}

pub fn put_f32(buf: &mut [u8], offset: usize, value: f32) {
    LittleEndian::write_f32(&mut buf[offset..offset + 4], value);
}

/// Inverse of the base-38 identifier decoder, for building fixtures.
pub fn encode_ident(ident: &str, shifted: bool) -> u32 {
    let mut value = 0u32;
    for ch in ident.chars() {
        let symbol = match ch {
            ' ' => 0,
            '0'..='9' => ch as u32 - 46,
            'A'..='Z' => ch as u32 - 53,
            _ => panic!("character {ch:?} not encodable"),
        };
        value = value * 38 + symbol;
    }
    if shifted {
        value << 5
    } else {
        value
    }
}

/// An airport record: 0x44-byte header plus appended subrecords.
pub fn airport_record(ident: &str, magvar: f32, subrecords: Vec<Vec<u8>>) -> Vec<u8> {
    let mut buf = vec![0u8; 0x44];
    put_u16(&mut buf, 0x00, 0x3C);
    put_f32(&mut buf, 0x24, magvar);
    put_u32(&mut buf, 0x28, encode_ident(ident, true));
    for sub in subrecords {
        buf.extend_from_slice(&sub);
    }
    let total = buf.len() as u32;
    put_u32(&mut buf, 0x02, total);
    buf
}

pub fn name_subrecord(name: &str) -> Vec<u8> {
    let mut buf = vec![0u8; 6 + name.len()];
    put_u16(&mut buf, 0x00, subrecord::NAME);
    buf[6..].copy_from_slice(name.as_bytes());
    let total = buf.len() as u32;
    put_u32(&mut buf, 0x02, total);
    buf
}

pub fn runway_subrecord(
    primary_number: u8,
    primary_designator: u8,
    secondary_number: u8,
    secondary_designator: u8,
) -> Vec<u8> {
    let mut buf = vec![0u8; 0x30];
    put_u16(&mut buf, 0x00, subrecord::RUNWAY);
    put_u32(&mut buf, 0x02, 0x30);
    buf[0x08] = primary_number;
    buf[0x09] = primary_designator;
    buf[0x0A] = secondary_number;
    buf[0x0B] = secondary_designator;
    put_f32(&mut buf, 0x28, 92.5);
    buf
}

pub fn start_subrecord(number: u8, start_type: u8, designator: u8) -> Vec<u8> {
    let mut buf = vec![0u8; 0x0C];
    put_u16(&mut buf, 0x00, subrecord::START);
    put_u32(&mut buf, 0x02, 0x0C);
    buf[0x06] = number;
    buf[0x07] = (start_type << 4) | (designator & 0x0F);
    buf
}

/// A departure or arrival procedure with appended transition children.
pub fn procedure_subrecord(kind: u16, name: &str, children: Vec<Vec<u8>>) -> Vec<u8> {
    assert!(name.len() <= 8);
    let mut buf = vec![0u8; 0x14];
    put_u16(&mut buf, 0x00, kind);
    buf[0x0C..0x0C + name.len()].copy_from_slice(name.as_bytes());
    for child in children {
        buf.extend_from_slice(&child);
    }
    let total = buf.len() as u32;
    put_u32(&mut buf, 0x02, total);
    buf
}

pub fn transition_subrecord(number: u8, designator: u8) -> Vec<u8> {
    let mut buf = vec![0u8; 0x0C];
    put_u16(&mut buf, 0x00, subrecord::RUNWAY_TRANSITIONS);
    put_u32(&mut buf, 0x02, 0x0C);
    buf[0x07] = number;
    buf[0x08] = designator;
    buf
}

pub struct TaxiwayEntry {
    pub path_type: u8,
    pub number: u8,
    pub designator: u8,
    pub material_count: u8,
}

/// A taxiway-path container with 48-byte entries, each trailed by
/// `material_count` 44-byte material blocks.
pub fn taxiway_container(entries: &[TaxiwayEntry]) -> Vec<u8> {
    let mut buf = vec![0u8; 0x08];
    put_u16(&mut buf, 0x00, subrecord::TAXIWAY_PATH_CONTAINER);
    put_u16(&mut buf, 0x06, entries.len() as u16);
    for e in entries {
        let mut entry = vec![0u8; 48 + usize::from(e.material_count) * 44];
        entry[0x03] = e.designator << 4;
        entry[0x04] = e.path_type & 0x0F;
        entry[0x05] = e.number;
        entry[0x2C] = e.material_count;
        buf.extend_from_slice(&entry);
    }
    let total = buf.len() as u32;
    put_u32(&mut buf, 0x02, total);
    buf
}

/// An ILS/VOR record: 0x28-byte header plus appended children.
pub fn ils_vor_record(
    navaid_type: u8,
    ident: &str,
    region_airport: u32,
    children: Vec<Vec<u8>>,
) -> Vec<u8> {
    let mut buf = vec![0u8; 0x28];
    put_u16(&mut buf, 0x00, 0x13);
    buf[0x06] = navaid_type;
    put_u32(&mut buf, 0x20, encode_ident(ident, true));
    put_u32(&mut buf, 0x24, region_airport);
    for child in children {
        buf.extend_from_slice(&child);
    }
    let total = buf.len() as u32;
    put_u32(&mut buf, 0x02, total);
    buf
}

pub fn localizer_subrecord(number: u8, designator: u8, heading: f32, width: f32) -> Vec<u8> {
    let mut buf = vec![0u8; 0x10];
    put_u16(&mut buf, 0x00, subrecord::ILS_LOCALIZER);
    put_u32(&mut buf, 0x02, 0x10);
    buf[0x06] = number;
    buf[0x07] = designator;
    put_f32(&mut buf, 0x08, heading);
    put_f32(&mut buf, 0x0C, width);
    buf
}

pub fn dme_subrecord(elevation: u32, range: f32) -> Vec<u8> {
    let mut buf = vec![0u8; 0x18];
    put_u16(&mut buf, 0x00, subrecord::DME);
    put_u32(&mut buf, 0x02, 0x18);
    put_u32(&mut buf, 0x10, elevation);
    put_f32(&mut buf, 0x14, range);
    buf
}

pub fn glideslope_subrecord(elevation: u32, range: f32, pitch: f32) -> Vec<u8> {
    let mut buf = vec![0u8; 0x1C];
    put_u16(&mut buf, 0x00, subrecord::GLIDESLOPE);
    put_u32(&mut buf, 0x02, 0x1C);
    put_u32(&mut buf, 0x10, elevation);
    put_f32(&mut buf, 0x14, range);
    put_f32(&mut buf, 0x18, pitch);
    buf
}

pub fn waypoint_record(ident: &str, longitude_raw: u32, latitude_raw: u32) -> Vec<u8> {
    let mut buf = vec![0u8; 0x18];
    put_u16(&mut buf, 0x00, 0x22);
    put_u32(&mut buf, 0x02, 0x18);
    put_u32(&mut buf, 0x08, longitude_raw);
    put_u32(&mut buf, 0x0C, latitude_raw);
    put_u32(&mut buf, 0x14, encode_ident(ident, true));
    buf
}

const HEADER_SIZE: usize = 0x18;
const SECTION_ENTRY_SIZE: usize = 0x14;
/// Stride the walker derives from a zero flags word.
const SUBSECTION_STRIDE: usize = 0x10;

/// Lays out a container: header, section table, one subsection per section,
/// then the concatenated record runs.
#[derive(Default)]
pub struct ContainerBuilder {
    sections: Vec<(u32, Vec<Vec<u8>>)>,
}

impl ContainerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn section(mut self, kind: u32, records: Vec<Vec<u8>>) -> Self {
        self.sections.push((kind, records));
        self
    }

    pub fn build(self) -> Vec<u8> {
        let count = self.sections.len();
        let table_offset = HEADER_SIZE;
        let subsections_offset = table_offset + count * SECTION_ENTRY_SIZE;
        let mut next_record_offset = subsections_offset + count * SUBSECTION_STRIDE;

        let mut buf = vec![0u8; next_record_offset];
        put_u32(&mut buf, 0x04, HEADER_SIZE as u32);
        put_u32(&mut buf, 0x14, count as u32);

        for (index, (kind, records)) in self.sections.iter().enumerate() {
            let entry = table_offset + index * SECTION_ENTRY_SIZE;
            put_u32(&mut buf, entry, *kind);
            // Flags word stays zero, selecting the 0x10 stride.
            put_u32(&mut buf, entry + 0x08, 1);
            let subsection = subsections_offset + index * SUBSECTION_STRIDE;
            put_u32(&mut buf, entry + 0x0C, subsection as u32);

            put_u32(&mut buf, subsection + 0x04, records.len() as u32);
            put_u32(&mut buf, subsection + 0x08, next_record_offset as u32);
            next_record_offset += records.iter().map(Vec::len).sum::<usize>();
        }

        for (_, records) in &self.sections {
            for record in records {
                buf.extend_from_slice(record);
            }
        }
        buf
    }
}
