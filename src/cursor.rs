//! Byte-level decoding primitives for InterOp streams.
//!
//! This module provides [`ByteCursor`], a forward-only wrapper over any
//! [`Read`] source that decodes the little-endian primitives InterOp files
//! are built from, tracks the stream offset for error reporting, and can
//! distinguish a clean end of stream from a truncated record.

use std::{
    fs::File,
    io::{self, BufReader, Read},
    path::Path,
};

use byteorder::{ByteOrder, LittleEndian};

use crate::{InteropError, Result};

/// Boxed byte source used by the `from_path` constructors.
pub type BoxedByteSource = Box<dyn Read + Send>;

/// Opens a file as a byte source, transparently decompressing when the
/// `niffler` feature is enabled.
pub(crate) fn open_path<P: AsRef<Path>>(path: P) -> Result<BoxedByteSource> {
    let rdr = File::open(&path).map(BufReader::new)?;

    #[cfg(feature = "niffler")]
    {
        match niffler::send::get_reader(Box::new(rdr)) {
            Ok((pt, _format)) => Ok(pt),
            // Too short for any compression magic; read the bytes plainly
            Err(niffler::Error::FileTooShort) => {
                Ok(Box::new(File::open(path).map(BufReader::new)?))
            }
            Err(e) => Err(e.into()),
        }
    }
    #[cfg(not(feature = "niffler"))]
    {
        Ok(Box::new(rdr))
    }
}

/// Forward-only cursor over a byte stream with typed little-endian reads.
///
/// All InterOp metric files are sequences of tightly packed little-endian
/// fields with no alignment padding, so every decoder in this crate is built
/// on the same small set of operations: read a fixed-width primitive, read a
/// counted run of bytes, and ask whether the stream has ended cleanly.
///
/// # End-of-stream semantics
///
/// [`at_end`](ByteCursor::at_end) answers by *attempting* a one-byte read
/// rather than consulting a flag left over from a previous read. A byte
/// obtained this way is stashed and delivered by the next read, so probing
/// never loses data. This matters at record boundaries: a stream that ends
/// exactly between records is a clean end, while a stream that ends inside
/// a record produces [`InteropError::Truncated`] with the offset of the
/// short read.
///
/// # Examples
///
/// ```rust
/// use interop::ByteCursor;
/// use std::io::Cursor;
///
/// # fn main() -> interop::Result<()> {
/// let mut cursor = ByteCursor::new(Cursor::new(vec![1u8, 0, 2, 0, 0, 0]));
/// assert_eq!(cursor.read_u16()?, 1);
/// assert_eq!(cursor.read_u32()?, 2);
/// assert!(cursor.at_end()?);
/// assert_eq!(cursor.position(), 6);
/// # Ok(())
/// # }
/// ```
pub struct ByteCursor<R: Read> {
    /// Inner reader providing the data stream
    inner: R,

    /// Byte obtained by an end-of-stream probe, delivered by the next read
    peeked: Option<u8>,

    /// Number of bytes consumed so far (probed bytes not yet delivered
    /// are excluded)
    position: u64,
}

impl<R: Read> ByteCursor<R> {
    /// Creates a cursor over the given byte source.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            peeked: None,
            position: 0,
        }
    }

    /// Returns the number of bytes consumed so far.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Returns `true` if the stream has ended cleanly.
    ///
    /// Probes by attempting to read one byte. A byte obtained by the probe
    /// is stashed and returned by the next read, so calling this between
    /// records never discards data.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use interop::ByteCursor;
    /// use std::io::Cursor;
    ///
    /// # fn main() -> interop::Result<()> {
    /// let mut cursor = ByteCursor::new(Cursor::new(vec![7u8]));
    /// assert!(!cursor.at_end()?);
    /// assert_eq!(cursor.read_u8()?, 7); // the probed byte is not lost
    /// assert!(cursor.at_end()?);
    /// # Ok(())
    /// # }
    /// ```
    pub fn at_end(&mut self) -> Result<bool> {
        if self.peeked.is_some() {
            return Ok(false);
        }
        let mut probe = [0u8; 1];
        loop {
            match self.inner.read(&mut probe) {
                Ok(0) => return Ok(true),
                Ok(_) => {
                    self.peeked = Some(probe[0]);
                    return Ok(false);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Fills `buf` completely or fails.
    ///
    /// A short read is reported as [`InteropError::Truncated`] carrying the
    /// offset at which the read began, the number of bytes requested, and
    /// the number actually available.
    pub fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        if buf.is_empty() {
            return Ok(());
        }
        let offset = self.position;
        let mut filled = 0;
        if let Some(byte) = self.peeked.take() {
            buf[0] = byte;
            filled = 1;
        }
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => {
                    return Err(InteropError::Truncated {
                        offset,
                        expected: buf.len(),
                        found: filled,
                    });
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        self.position += buf.len() as u64;
        Ok(())
    }

    /// Reads a single byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.fill(&mut buf)?;
        Ok(buf[0])
    }

    /// Reads a little-endian `u16`.
    pub fn read_u16(&mut self) -> Result<u16> {
        let mut buf = [0u8; 2];
        self.fill(&mut buf)?;
        Ok(LittleEndian::read_u16(&buf))
    }

    /// Reads a little-endian `u32`.
    pub fn read_u32(&mut self) -> Result<u32> {
        let mut buf = [0u8; 4];
        self.fill(&mut buf)?;
        Ok(LittleEndian::read_u32(&buf))
    }

    /// Reads a little-endian `u64`.
    pub fn read_u64(&mut self) -> Result<u64> {
        let mut buf = [0u8; 8];
        self.fill(&mut buf)?;
        Ok(LittleEndian::read_u64(&buf))
    }

    /// Reads a little-endian `i16`.
    pub fn read_i16(&mut self) -> Result<i16> {
        let mut buf = [0u8; 2];
        self.fill(&mut buf)?;
        Ok(LittleEndian::read_i16(&buf))
    }

    /// Reads a little-endian `i32`.
    pub fn read_i32(&mut self) -> Result<i32> {
        let mut buf = [0u8; 4];
        self.fill(&mut buf)?;
        Ok(LittleEndian::read_i32(&buf))
    }

    /// Reads a little-endian IEEE-754 `f32`.
    pub fn read_f32(&mut self) -> Result<f32> {
        let mut buf = [0u8; 4];
        self.fill(&mut buf)?;
        Ok(LittleEndian::read_f32(&buf))
    }

    /// Reads a little-endian IEEE-754 `f64`.
    pub fn read_f64(&mut self) -> Result<f64> {
        let mut buf = [0u8; 8];
        self.fill(&mut buf)?;
        Ok(LittleEndian::read_f64(&buf))
    }

    /// Reads exactly `len` bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.fill(&mut buf)?;
        Ok(buf)
    }

    /// Reads a length-prefixed string: a `u16` byte count followed by that
    /// many bytes.
    ///
    /// The bytes are not required to be valid UTF-8; invalid sequences are
    /// replaced rather than rejected, since string content is identifying
    /// metadata and never drives control flow.
    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_u16()? as usize;
        let bytes = self.read_bytes(len)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
