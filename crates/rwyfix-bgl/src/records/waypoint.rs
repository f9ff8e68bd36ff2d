//! Waypoint records: flat position plus identifier.

use std::fmt;
use std::io::{Read, Seek};

use rwyfix_common::ByteSource;

use crate::model::{display_of, Field};
use crate::records;
use crate::Result;

/// A decoded en-route waypoint.
#[derive(Debug, Clone, Default)]
pub struct Waypoint {
    pub offset: u64,
    pub size: u32,
    pub ident: Option<Field>,
    pub longitude: Option<Field>,
    pub latitude: Option<Field>,
}

impl fmt::Display for Waypoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", display_of(&self.ident))
    }
}

pub(crate) fn parse_waypoint<S: Read + Seek>(
    src: &mut ByteSource<S>,
    offset: u64,
    size: u32,
) -> Result<Waypoint> {
    Ok(Waypoint {
        offset,
        size,
        longitude: Some(records::longitude_field(src, offset + 0x08)?),
        latitude: Some(records::latitude_field(src, offset + 0x0C)?),
        ident: Some(
            records::ident_field(src, offset + 0x14, 4, true)
                .map_err(|e| e.in_field("Waypoint", "ident", offset + 0x14))?,
        ),
    })
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::model::FieldValue;
    use crate::testutil::waypoint_record;

    #[test]
    fn test_waypoint_fields() {
        let bytes = waypoint_record("OTTO", 0, 0);
        let size = bytes.len() as u32;
        let mut src = ByteSource::new(Cursor::new(bytes));
        let waypoint = parse_waypoint(&mut src, 0, size).unwrap();
        assert_eq!(display_of(&waypoint.ident), "OTTO");
        assert_eq!(waypoint.longitude.unwrap().value, FieldValue::Float(-180.0));
        assert_eq!(waypoint.latitude.unwrap().value, FieldValue::Float(90.0));
    }
}
