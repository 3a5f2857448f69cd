use std::collections::TryReserveError;
use std::io::{Error, ErrorKind, Write};

/// An owned, growable byte arena with a read cursor (`start`) and a fill
/// mark (`end`). Bytes in `start..end` are buffered but not yet consumed.
///
/// Growth is explicit: `grow_to_at_least` doubles the capacity until it can
/// hold the requested number of bytes and keeps everything already buffered.
#[derive(Debug, Default, Clone)]
pub struct ByteBuffer {
    data: Vec<u8>,
    start: usize,
    end: usize,
}

impl ByteBuffer {
    pub fn with_capacity(capacity: usize) -> ByteBuffer {
        ByteBuffer {
            data: vec![0u8; capacity],
            start: 0,
            end: 0,
        }
    }

    /// Wraps bytes that are already fully buffered.
    pub fn from_vec(data: Vec<u8>) -> ByteBuffer {
        let end = data.len();
        ByteBuffer {
            data,
            start: 0,
            end,
        }
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Number of buffered bytes not yet consumed.
    pub fn available(&self) -> usize {
        self.end - self.start
    }

    pub fn unread(&self) -> &[u8] {
        &self.data[self.start..self.end]
    }

    pub fn consume(&mut self, n: usize) {
        self.start = (self.start + n).min(self.end);
    }

    pub fn clear(&mut self) {
        self.start = 0;
        self.end = 0;
    }

    /// Moves the unread bytes to the front of the arena.
    pub fn compact(&mut self) {
        if self.start == 0 {
            return;
        }
        self.data.copy_within(self.start..self.end, 0);
        self.end -= self.start;
        self.start = 0;
    }

    /// Ensures the arena can hold `required` bytes from its front, doubling
    /// the capacity as many times as needed.
    pub fn grow_to_at_least(&mut self, required: usize) -> Result<(), TryReserveError> {
        if self.data.len() >= required {
            return Ok(());
        }
        let mut new_capacity = self.data.len().max(1);
        while new_capacity < required {
            new_capacity = new_capacity.saturating_mul(2);
        }
        self.data.try_reserve_exact(new_capacity - self.data.len())?;
        self.data.resize(new_capacity, 0u8);
        Ok(())
    }

    /// The writable region after the fill mark.
    pub fn spare_mut(&mut self) -> &mut [u8] {
        &mut self.data[self.end..]
    }

    /// Marks `n` bytes of the spare region as filled.
    pub fn commit(&mut self, n: usize) {
        self.end = (self.end + n).min(self.data.len());
    }
}

impl Write for ByteBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let required = self.end + buf.len();
        self.grow_to_at_least(required)
            .map_err(|e| Error::new(ErrorKind::OutOfMemory, e))?;
        self.data[self.end..required].copy_from_slice(buf);
        self.end = required;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::ByteBuffer;
    use std::io::Write;

    #[test]
    fn test_grow_preserves_buffered_bytes() {
        let mut buf = ByteBuffer::with_capacity(4);
        buf.write_all(&[1, 2, 3]).unwrap();
        buf.grow_to_at_least(9).unwrap();
        assert_eq!(buf.capacity(), 16);
        assert_eq!(buf.unread(), &[1, 2, 3]);
    }

    #[test]
    fn test_compact() {
        let mut buf = ByteBuffer::from_vec(vec![1, 2, 3, 4, 5]);
        buf.consume(3);
        buf.compact();
        assert_eq!(buf.unread(), &[4, 5]);
        assert_eq!(buf.spare_mut().len(), 3);
        buf.spare_mut()[0] = 6;
        buf.commit(1);
        assert_eq!(buf.unread(), &[4, 5, 6]);
    }

    #[test]
    fn test_grow_is_noop_when_large_enough() {
        let mut buf = ByteBuffer::with_capacity(32);
        buf.grow_to_at_least(10).unwrap();
        assert_eq!(buf.capacity(), 32);
    }
}
