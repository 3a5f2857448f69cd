use crate::shapefile::error::{Result, ShapefileError};
use geoshape_common::utils::ByteBuffer;
use std::io::prelude::*;
use std::io::SeekFrom;
use tracing::debug;

/// Where a reader gets its bytes from. Implementations keep a window of
/// buffered bytes starting at `position()`.
pub trait ByteSource {
    /// Tries to buffer at least `n` bytes from the current position and
    /// returns how many are buffered. Fewer than `n` means the source ended.
    fn fill(&mut self, n: usize) -> Result<usize>;

    /// The buffered bytes, starting at the current position.
    fn bytes(&self) -> &[u8];

    fn consume(&mut self, n: usize);

    /// Absolute byte offset of the current position.
    fn position(&self) -> u64;

    /// Moves to an absolute byte offset. Sources that cannot seek only
    /// accept their current position and fail with `NotSeekable` otherwise.
    fn seek(&mut self, offset: u64) -> Result<()>;

    fn can_seek(&self) -> bool;

    /// Total size, when known.
    fn len(&self) -> Option<u64>;
}

/// A source whose every byte is already in memory.
pub struct WholeFileSource {
    data: Vec<u8>,
    pos: usize,
}

impl WholeFileSource {
    pub fn new(data: Vec<u8>) -> WholeFileSource {
        WholeFileSource { data, pos: 0 }
    }
}

impl ByteSource for WholeFileSource {
    fn fill(&mut self, _n: usize) -> Result<usize> {
        Ok(self.data.len() - self.pos)
    }

    fn bytes(&self) -> &[u8] {
        &self.data[self.pos..]
    }

    fn consume(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.data.len());
    }

    fn position(&self) -> u64 {
        self.pos as u64
    }

    fn seek(&mut self, offset: u64) -> Result<()> {
        self.pos = (offset as usize).min(self.data.len());
        Ok(())
    }

    fn can_seek(&self) -> bool {
        true
    }

    fn len(&self) -> Option<u64> {
        Some(self.data.len() as u64)
    }
}

type SeekFn<R> = fn(&mut R, u64) -> std::io::Result<u64>;

fn seek_from_start<R: Seek>(reader: &mut R, offset: u64) -> std::io::Result<u64> {
    reader.seek(SeekFrom::Start(offset))
}

/// Returns the current position and the total size of a seekable reader,
/// leaving it where it was.
fn measure<R: Seek>(reader: &mut R) -> std::io::Result<(u64, u64)> {
    let start = reader.stream_position()?;
    let end = reader.seek(SeekFrom::End(0))?;
    reader.seek(SeekFrom::Start(start))?;
    Ok((start, end))
}

/// Reads a stream in chunks, compacting the window before each refill and
/// growing it when a single record is larger than a chunk. Sequential
/// reading never seeks, so pipes and sockets can be streamed forward-only.
pub struct StreamingSource<R: Read> {
    reader: R,
    seek_to: Option<SeekFn<R>>,
    buffer: ByteBuffer,
    offset: u64,
    chunk_size: usize,
    len: Option<u64>,
}

impl<R: Read> StreamingSource<R> {
    /// Streams `reader` from its current position, treated as offset 0,
    /// without ever seeking. The total size is unknown.
    pub fn forward_only(reader: R, chunk_size: usize) -> StreamingSource<R> {
        let chunk_size = chunk_size.max(8);
        StreamingSource {
            reader,
            seek_to: None,
            buffer: ByteBuffer::with_capacity(chunk_size),
            offset: 0,
            chunk_size,
            len: None,
        }
    }
}

impl<R: Read + Seek> StreamingSource<R> {
    /// Streams a seekable reader from its current position. A reader whose
    /// seek fails is streamed forward-only instead.
    pub fn new(mut reader: R, chunk_size: usize) -> StreamingSource<R> {
        match measure(&mut reader) {
            Ok((start, end)) => {
                let mut source = StreamingSource::forward_only(reader, chunk_size);
                source.seek_to = Some(seek_from_start::<R> as SeekFn<R>);
                source.offset = start;
                source.len = Some(end);
                source
            }
            Err(e) => {
                debug!(error = %e, "reader cannot seek, streaming forward only");
                StreamingSource::forward_only(reader, chunk_size)
            }
        }
    }
}

impl<R: Read> ByteSource for StreamingSource<R> {
    fn fill(&mut self, n: usize) -> Result<usize> {
        if self.buffer.available() >= n {
            return Ok(self.buffer.available());
        }
        self.buffer.compact();
        let required = n.max(self.chunk_size);
        self.buffer
            .grow_to_at_least(required)
            .map_err(|source| ShapefileError::BufferGrowth {
                requested: required,
                source,
            })?;
        while self.buffer.available() < n {
            let read = match self.reader.read(self.buffer.spare_mut()) {
                Ok(read) => read,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            if read == 0 {
                break;
            }
            self.buffer.commit(read);
        }
        Ok(self.buffer.available())
    }

    fn bytes(&self) -> &[u8] {
        self.buffer.unread()
    }

    fn consume(&mut self, n: usize) {
        let n = n.min(self.buffer.available());
        self.buffer.consume(n);
        self.offset += n as u64;
    }

    fn position(&self) -> u64 {
        self.offset
    }

    fn seek(&mut self, offset: u64) -> Result<()> {
        if offset == self.offset {
            return Ok(());
        }
        let seek_to = self.seek_to.ok_or(ShapefileError::NotSeekable)?;
        seek_to(&mut self.reader, offset)?;
        self.buffer.clear();
        self.offset = offset;
        Ok(())
    }

    fn can_seek(&self) -> bool {
        self.seek_to.is_some()
    }

    fn len(&self) -> Option<u64> {
        self.len
    }
}

#[cfg(test)]
mod test {
    use super::{ByteSource, StreamingSource, WholeFileSource};
    use crate::shapefile::error::ShapefileError;
    use std::io::{Cursor, Read, Seek, SeekFrom};

    /// A reader that refuses to seek, like a pipe behind a `Seek` impl.
    struct Unseekable(Cursor<Vec<u8>>);

    impl Read for Unseekable {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.0.read(buf)
        }
    }

    impl Seek for Unseekable {
        fn seek(&mut self, _pos: SeekFrom) -> std::io::Result<u64> {
            Err(std::io::Error::new(std::io::ErrorKind::Unsupported, "not seekable"))
        }
    }

    #[test]
    fn test_streaming_source_refills_and_grows() {
        let data: Vec<u8> = (0..100u8).collect();
        let mut src = StreamingSource::new(Cursor::new(data), 8);
        assert!(src.can_seek());
        assert_eq!(src.len(), Some(100));
        assert!(src.fill(4).unwrap() >= 4);
        src.consume(6);
        assert_eq!(src.position(), 6);
        // larger than a chunk; the window must grow and keep its bytes
        assert!(src.fill(30).unwrap() >= 30);
        assert_eq!(src.bytes()[0], 6);
        assert_eq!(src.bytes()[29], 35);
        src.seek(90).unwrap();
        assert_eq!(src.fill(20).unwrap(), 10);
        assert_eq!(src.bytes()[0], 90);
    }

    #[test]
    fn test_unseekable_reader_streams_forward_only() {
        let data: Vec<u8> = (0..40u8).collect();
        let mut src = StreamingSource::new(Unseekable(Cursor::new(data)), 8);
        assert!(!src.can_seek());
        assert_eq!(src.len(), None);
        assert!(src.fill(12).unwrap() >= 12);
        src.consume(12);
        src.seek(12).unwrap();
        assert_eq!(src.bytes()[0], 12);
        assert!(matches!(src.seek(0), Err(ShapefileError::NotSeekable)));
        assert_eq!(src.fill(100).unwrap(), 28);
        assert_eq!(src.bytes()[27], 39);
    }

    #[test]
    fn test_whole_file_source() {
        let mut src = WholeFileSource::new(vec![1, 2, 3, 4]);
        assert_eq!(src.fill(100).unwrap(), 4);
        src.consume(3);
        assert_eq!(src.bytes(), &[4]);
        src.seek(1).unwrap();
        assert_eq!(src.position(), 1);
        assert_eq!(src.bytes(), &[2, 3, 4]);
    }
}
