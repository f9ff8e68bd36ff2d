//! BGL container walking: header, section table, subsection table.
//!
//! The walker turns the table hierarchy into record spans and routes each
//! span to the decoder matching its section kind. Section kinds it does not
//! recognize are ignored; their subsection geometry is format-generic, so
//! skipping them cannot corrupt the walk.

use std::fs::OpenOptions;
use std::io::{Read, Seek};
use std::path::Path;

use rwyfix_common::ByteSource;

use crate::model::{Bgl, DecodeIssue};
use crate::records::{self, RECORD_PREFIX_SIZE};
use crate::{Error, Result};

/// Section kind tags found in the section table.
const SECTION_AIRPORT: u32 = 0x03;
const SECTION_ILS_VOR: u32 = 0x13;
const SECTION_WAYPOINT: u32 = 0x22;

/// Absolute offset of the header-size field.
const HEADER_SIZE_OFFSET: u64 = 0x04;
/// Absolute offset of the section-count field.
const SECTION_COUNT_OFFSET: u64 = 0x14;
/// Stride of one section-table entry.
const SECTION_ENTRY_SIZE: u64 = 0x14;

/// Decode a whole container from a byte source.
///
/// Structural errors abort the parse; per-record decode errors drop only the
/// offending record and are reported on [`Bgl::issues`].
pub fn parse_bgl<S: Read + Seek>(name: &str, src: &mut ByteSource<S>) -> Result<Bgl> {
    let mut bgl = Bgl::new(name);
    let header_size = u64::from(src.read_u32(HEADER_SIZE_OFFSET)?);
    let section_count = src.read_u32(SECTION_COUNT_OFFSET)?;

    for index in 0..section_count {
        let section_offset = header_size + u64::from(index) * SECTION_ENTRY_SIZE;
        let kind = src.read_u32(section_offset)?;
        match kind {
            SECTION_AIRPORT => {
                let records = walk_section(
                    src,
                    section_offset,
                    "Airport",
                    &mut bgl.issues,
                    records::parse_airport,
                )?;
                bgl.airports.extend(records);
            }
            SECTION_ILS_VOR => {
                let records = walk_section(
                    src,
                    section_offset,
                    "IlsVor",
                    &mut bgl.issues,
                    records::parse_ils_vor,
                )?;
                bgl.ils_vors.extend(records);
            }
            SECTION_WAYPOINT => {
                let records = walk_section(
                    src,
                    section_offset,
                    "Waypoint",
                    &mut bgl.issues,
                    records::parse_waypoint,
                )?;
                bgl.waypoints.extend(records);
            }
            _ => {}
        }
    }

    Ok(bgl)
}

/// Walk one section's subsections and record runs, decoding each record span.
fn walk_section<S, T, P>(
    src: &mut ByteSource<S>,
    section_offset: u64,
    kind_name: &'static str,
    issues: &mut Vec<DecodeIssue>,
    parse: P,
) -> Result<Vec<T>>
where
    S: Read + Seek,
    P: Fn(&mut ByteSource<S>, u64, u32) -> Result<T>,
{
    // Format quirk: the subsection stride is one of two fixed values,
    // selected by a single flag bit.
    let flags = src.read_u32(section_offset + 0x04)?;
    let stride = u64::from(((flags & 0x10000) | 0x40000) >> 14);
    let subsection_count = src.read_u32(section_offset + 0x08)?;
    let first_subsection = u64::from(src.read_u32(section_offset + 0x0C)?);

    let mut out = Vec::new();
    for index in 0..subsection_count {
        let subsection = first_subsection + u64::from(index) * stride;
        let record_count = src.read_u32(subsection + 0x04)?;
        let mut record_offset = u64::from(src.read_u32(subsection + 0x08)?);

        for _ in 0..record_count {
            let declared = src.read_u32(record_offset + 0x02)?;
            if declared < RECORD_PREFIX_SIZE {
                return Err(Error::RecordTooShort {
                    offset: record_offset,
                    declared,
                });
            }
            match parse(src, record_offset, declared) {
                Ok(record) => out.push(record),
                Err(e) if e.is_structural() => return Err(e),
                Err(e) => issues.push(DecodeIssue {
                    record: kind_name,
                    offset: record_offset,
                    error: e,
                }),
            }
            record_offset += u64::from(declared);
        }
    }
    Ok(out)
}

/// An open BGL file: the decoded model plus the stream it was decoded from.
///
/// Decoding completes before any patch is issued, and a patch never changes
/// record lengths or offsets, so the model stays a valid read-only snapshot
/// for the life of the handle.
#[derive(Debug)]
pub struct BglFile {
    source: ByteSource<std::fs::File>,
    bgl: Bgl,
}

impl BglFile {
    /// Open and fully decode a BGL file. `writable` controls whether later
    /// patches may commit.
    pub fn open<P: AsRef<Path>>(path: P, writable: bool) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(writable)
            .open(path)
            .map_err(rwyfix_common::Error::from)?;
        let name = path.display().to_string();
        let mut source = ByteSource::new(file);
        let bgl = parse_bgl(&name, &mut source)?;
        Ok(Self { source, bgl })
    }

    /// The decoded container model.
    pub fn bgl(&self) -> &Bgl {
        &self.bgl
    }

    /// Split into the model and the writable stream, for patching decoded
    /// fields back into the file.
    pub fn parts_mut(&mut self) -> (&Bgl, &mut ByteSource<std::fs::File>) {
        (&self.bgl, &mut self.source)
    }
}
