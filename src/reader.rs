use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::Error;

/// Sequential, forward-only reader over the capture file.
///
/// The capture container is consumed strictly front to back, so all we track
/// is the cursor position and the total file size. Hitting the end of the
/// file is only acceptable at a record boundary; [`ByteReader::read_block`]
/// distinguishes that case from a truncated record.
pub struct ByteReader {
    inner: BufReader<File>,
    pos: u64,
    size: u64,
}

impl ByteReader {
    pub fn open(path: &Path) -> Result<Self, Error> {
        let file = File::open(path)?;
        let size = file.metadata()?.len();
        Ok(ByteReader {
            inner: BufReader::new(file),
            pos: 0,
            size,
        })
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn remaining(&self) -> bool {
        self.pos < self.size
    }

    /// Read exactly `len` bytes, or `None` if the reader is exactly at the
    /// end of the file. Running out of bytes partway through is a
    /// [`Error::TruncatedCapture`].
    pub fn read_block(
        &mut self,
        len: usize,
        what: &'static str,
    ) -> Result<Option<Vec<u8>>, Error> {
        if len == 0 {
            return Ok(Some(Vec::new()));
        }
        if !self.remaining() {
            return Ok(None);
        }
        if self.pos + len as u64 > self.size {
            return Err(Error::TruncatedCapture(what));
        }
        let mut buf = vec![0; len];
        self.inner.read_exact(&mut buf)?;
        self.pos += len as u64;
        Ok(Some(buf))
    }

    /// Like [`ByteReader::read_block`] but for reads that must succeed, e.g.
    /// a segment payload whose size the segment header just announced.
    pub fn read_exact_block(
        &mut self,
        len: usize,
        what: &'static str,
    ) -> Result<Vec<u8>, Error> {
        self.read_block(len, what)?
            .ok_or(Error::TruncatedCapture(what))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn reader_over(bytes: &[u8]) -> ByteReader {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(bytes).unwrap();
        ByteReader::open(f.path()).unwrap()
    }

    #[test]
    fn clean_eof_at_boundary() {
        let mut r = reader_over(&[1, 2, 3, 4]);
        assert_eq!(r.read_block(4, "rec").unwrap(), Some(vec![1, 2, 3, 4]));
        assert!(!r.remaining());
        assert_eq!(r.read_block(4, "rec").unwrap(), None);
    }

    #[test]
    fn truncated_mid_record() {
        let mut r = reader_over(&[1, 2, 3]);
        assert!(matches!(
            r.read_block(4, "rec"),
            Err(Error::TruncatedCapture("rec"))
        ));
    }
}
