//! Random-access byte source over a seekable stream.
//!
//! [`ByteSource`] is the only type in the workspace that touches backing
//! storage. Every access re-seeks to an absolute offset; there is no caching
//! layer, since decoding is dominated by small reads against one open stream.

use std::io::{self, Read, Seek, SeekFrom, Write};

use byteorder::{ByteOrder, LittleEndian};

use crate::{Error, Result};

/// Random-access reads and in-place overwrites against a seekable stream.
///
/// Generic over the stream type so production code can run on [`std::fs::File`]
/// while tests run on `Cursor<Vec<u8>>`.
///
/// # Example
///
/// ```
/// use std::io::Cursor;
/// use rwyfix_common::ByteSource;
///
/// let mut source = ByteSource::new(Cursor::new(vec![0x01, 0x02, 0x03, 0x04]));
/// assert_eq!(source.read_u32(0).unwrap(), 0x04030201);
/// assert_eq!(source.read(2, 2).unwrap(), vec![0x03, 0x04]);
/// ```
#[derive(Debug)]
pub struct ByteSource<S> {
    stream: S,
}

impl<S> ByteSource<S> {
    /// Wrap a seekable stream.
    pub fn new(stream: S) -> Self {
        Self { stream }
    }

    /// Consume the source and return the underlying stream.
    pub fn into_inner(self) -> S {
        self.stream
    }
}

impl<S: Read + Seek> ByteSource<S> {
    /// Read exactly `len` bytes starting at absolute `offset`.
    pub fn read(&mut self, offset: u64, len: usize) -> Result<Vec<u8>> {
        self.stream.seek(SeekFrom::Start(offset))?;
        let mut buf = vec![0u8; len];
        self.stream.read_exact(&mut buf).map_err(|e| {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                Error::OutOfBounds { offset, len }
            } else {
                Error::Io(e)
            }
        })?;
        Ok(buf)
    }

    /// Read a single byte at `offset`.
    pub fn read_u8(&mut self, offset: u64) -> Result<u8> {
        self.read(offset, 1).map(|b| b[0])
    }

    /// Read a little-endian u16 at `offset`.
    pub fn read_u16(&mut self, offset: u64) -> Result<u16> {
        self.read(offset, 2).map(|b| LittleEndian::read_u16(&b))
    }

    /// Read a little-endian u32 at `offset`.
    pub fn read_u32(&mut self, offset: u64) -> Result<u32> {
        self.read(offset, 4).map(|b| LittleEndian::read_u32(&b))
    }
}

impl<S: Write + Read + Seek> ByteSource<S> {
    /// Overwrite exactly `bytes.len()` bytes at absolute `offset`.
    ///
    /// The span must already lie inside the stream; a write never grows the
    /// backing storage.
    pub fn write(&mut self, offset: u64, bytes: &[u8]) -> Result<()> {
        let stream_len = self.stream.seek(SeekFrom::End(0))?;
        let end = offset
            .checked_add(bytes.len() as u64)
            .ok_or(Error::OutOfBounds {
                offset,
                len: bytes.len(),
            })?;
        if end > stream_len {
            return Err(Error::OutOfBounds {
                offset,
                len: bytes.len(),
            });
        }
        self.stream.seek(SeekFrom::Start(offset))?;
        self.stream.write_all(bytes)?;
        Ok(())
    }
}
