//! BGL navigation-data decoder and in-place field patcher.
//!
//! BGL containers store navigation data (airports, runways, procedures,
//! navaids, waypoints, taxiway geometry) in a hierarchical binary layout.
//! This crate walks that layout into a typed model that keeps byte
//! provenance for every field, and can later overwrite individual fields in
//! place without disturbing their neighbors.
//!
//! # Container layout
//!
//! All integers are little-endian, all offsets absolute from container start:
//! - Header: size at 0x04, section count at 0x14
//! - Section table at `header_size`, 0x14-byte entries carrying a kind tag,
//!   a flags word (selects one of two subsection strides), a subsection
//!   count, and the first subsection offset
//! - Subsection entries: record count and record-list offset
//! - Records and subrecords: a 2-byte kind id followed by a 4-byte
//!   self-inclusive length; the cursor advances by the declared length even
//!   for unrecognized kinds
//!
//! Several fields use bespoke encodings: base-38 packed identifiers,
//! quantized longitude/latitude angles, runway-number and designator tokens,
//! and two nibble-packed bytes shared between unrelated fields.
//!
//! # Example
//!
//! ```no_run
//! use rwyfix_bgl::{display_of, patch, BglFile};
//!
//! let mut file = BglFile::open("APX12345.bgl", true)?;
//! let (bgl, src) = file.parts_mut();
//!
//! if let Some(airport) = bgl.airport("KJFK") {
//!     for runway in &airport.runways {
//!         if display_of(&runway.primary_number) == "09" {
//!             patch(src, runway.primary_number.as_ref().unwrap(), "27", true)?;
//!         }
//!     }
//! }
//! # Ok::<(), rwyfix_bgl::Error>(())
//! ```

pub mod codec;
mod error;
mod file;
mod model;
mod patch;
pub mod records;

#[cfg(test)]
pub(crate) mod testutil;

pub use error::{Error, Result};
pub use file::{parse_bgl, BglFile};
pub use model::{display_of, Bgl, Codec, DecodeIssue, Field, FieldValue, Packing};
pub use patch::patch;

// Re-export record types at the crate root
pub use records::{
    Airport, Dme, Glideslope, IlsVor, Localizer, Procedure, Runway, RunwayTransition, Start,
    TaxiwayPath, Waypoint,
};
