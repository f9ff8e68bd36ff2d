//! In-place field patching.
//!
//! A patch re-encodes a new logical value through the codec that produced
//! the decoded field, then overwrites only the field's own bytes. Fields
//! sharing a byte with unrelated data (the nibble-packed start and
//! taxiway-path designators) re-read the live byte first so the other
//! nibble survives bit-exactly. Patches never change record lengths or
//! offsets, so the decoded model stays valid across them.

use std::io::{Read, Seek, Write};

use rwyfix_common::ByteSource;

use crate::codec;
use crate::model::{Codec, Field, Packing};
use crate::{Error, Result};

/// Overwrite `field` with the re-encoded `new_token`.
///
/// Validation and byte assembly always run; with `commit` false the final
/// write is suppressed, making a dry run byte-identical in everything but
/// the write itself. A validation failure rejects the patch before any byte
/// is touched.
pub fn patch<S: Read + Write + Seek>(
    src: &mut ByteSource<S>,
    field: &Field,
    new_token: &str,
    commit: bool,
) -> Result<()> {
    let encoded = encode(field, new_token)?;
    let bytes = match field.packing {
        Packing::Full => encoded,
        Packing::LowNibble => {
            let current = src.read_u8(field.offset)?;
            vec![(current & 0xF0) | (encoded[0] & 0x0F)]
        }
        Packing::HighNibble => {
            let current = src.read_u8(field.offset)?;
            vec![(current & 0x0F) | (encoded[0] << 4)]
        }
    };
    if commit {
        src.write(field.offset, &bytes)?;
    }
    Ok(())
}

/// Re-encode a token through the field's codec, producing exactly the
/// field's width in bytes. Only the token codecs have inverses.
fn encode(field: &Field, token: &str) -> Result<Vec<u8>> {
    let value = match field.codec {
        Codec::RunwayNumber => codec::runway_number_to_int(token)?,
        Codec::RunwayDesignator => codec::runway_designator_to_int(token)?,
        _ => return Err(Error::Unpatchable(field.codec.name())),
    };
    Ok(codec::encode_uint(u64::from(value), field.len()))
}
