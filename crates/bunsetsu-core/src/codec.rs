//! Big-endian integer codec shared by every persisted binary format.
//!
//! All on-disk integers (grammar graph, matrix image, feature tables, the
//! dictionary container) are 4-byte network byte order. Field order is a
//! format contract and never derived from in-memory layout.

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("truncated buffer: need {needed} bytes at offset {offset}")]
    Truncated { offset: usize, needed: usize },

    #[error("invalid length field: {0}")]
    InvalidLength(i32),
}

/// Read a big-endian i32 at a byte offset. Out of range returns `None`.
#[inline]
pub fn read_i32_be(buf: &[u8], offset: usize) -> Option<i32> {
    let bytes = buf.get(offset..offset.checked_add(4)?)?;
    Some(i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Read the `index`-th big-endian i32 of an int array stored in `buf`.
#[inline]
pub fn read_i32_at(buf: &[u8], index: usize) -> Option<i32> {
    read_i32_be(buf, index.checked_mul(4)?)
}

#[inline]
pub fn write_i32_be(out: &mut Vec<u8>, value: i32) {
    out.extend_from_slice(&value.to_be_bytes());
}

/// Encode a slice of i32 as consecutive big-endian words.
pub fn ints_to_be_bytes(values: &[i32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(values.len() * 4);
    for &v in values {
        write_i32_be(&mut out, v);
    }
    out
}

/// Sequential reader over a big-endian buffer.
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.buf.len())
            .ok_or(CodecError::Truncated {
                offset: self.pos,
                needed: n,
            })?;
        let bytes = &self.buf[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_i32(&mut self) -> Result<i32, CodecError> {
        let b = self.read_bytes(4)?;
        Ok(i32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Read a count/length field, rejecting negative values.
    pub fn read_len(&mut self) -> Result<usize, CodecError> {
        let v = self.read_i32()?;
        usize::try_from(v).map_err(|_| CodecError::InvalidLength(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_byte_order() {
        let mut out = Vec::new();
        write_i32_be(&mut out, 0x0102_0304);
        assert_eq!(out, vec![1, 2, 3, 4]);
        assert_eq!(read_i32_be(&out, 0), Some(0x0102_0304));
    }

    #[test]
    fn test_read_past_end_is_none() {
        let buf = [0u8, 0, 0, 1, 9];
        assert_eq!(read_i32_at(&buf, 0), Some(1));
        assert_eq!(read_i32_at(&buf, 1), None);
        assert_eq!(read_i32_be(&buf, usize::MAX), None);
    }

    #[test]
    fn test_reader_reports_truncation() {
        let buf = ints_to_be_bytes(&[3, -1]);
        let mut r = Reader::new(&buf);
        assert_eq!(r.read_len().unwrap(), 3);
        assert!(matches!(r.read_len(), Err(CodecError::InvalidLength(-1))));
        assert!(matches!(
            r.read_i32(),
            Err(CodecError::Truncated { offset: 8, needed: 4 })
        ));
    }
}
