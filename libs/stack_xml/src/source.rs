use embedded_io::{Read, Seek, SeekFrom};

use crate::{Error, Result};

/// A seekable stream of characters the parser reads from.
///
/// Built-in sources widen every byte to a `char` (Latin-1), implement this
/// trait yourself to feed already decoded text.
pub trait Source {
    /// Total number of characters in the document.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Moves the read position to the character at `offset`.
    fn seek(&mut self, offset: usize) -> Result<()>;

    /// Reads the next character, `None` at the end of the input.
    fn read_char(&mut self) -> Result<Option<char>>;

    /// True once the read position has reached [`Source::len`], or a read
    /// came up short.
    fn at_end(&self) -> bool;

    /// Creates a copy with its own read position over the same data.
    fn try_clone(&self) -> Result<Self>
    where
        Self: Sized;
}

/// Reads characters from a borrowed byte buffer.
/// ```
/// # use stack_xml::{MemorySource, Source};
/// let mut source = MemorySource::new(b"<a>");
/// assert_eq!(source.len(), 3);
/// assert_eq!(source.read_char().unwrap(), Some('<'));
/// source.seek(2).unwrap();
/// assert_eq!(source.read_char().unwrap(), Some('>'));
/// assert!(source.at_end());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct MemorySource<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> MemorySource<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        MemorySource { data, pos: 0 }
    }
}

impl Source for MemorySource<'_> {
    fn len(&self) -> usize {
        self.data.len()
    }

    fn seek(&mut self, offset: usize) -> Result<()> {
        if offset > self.data.len() {
            self.pos = self.data.len();
            return Err(Error::IoError(embedded_io::ErrorKind::InvalidInput));
        }
        self.pos = offset;
        Ok(())
    }

    fn read_char(&mut self) -> Result<Option<char>> {
        let Some(&byte) = self.data.get(self.pos) else {
            return Ok(None);
        };
        self.pos += 1;
        Ok(Some(char::from(byte)))
    }

    fn at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    fn try_clone(&self) -> Result<Self> {
        Ok(*self)
    }
}

/// Adapts a cloneable `embedded_io` handle into a [`Source`].
///
/// The length is taken once on construction by seeking to the end.
#[derive(Debug, Clone)]
pub struct IoSource<R> {
    reader: R,
    len: usize,
    pos: usize,
    eof: bool,
}

impl<R: Read + Seek> IoSource<R> {
    pub fn new(mut reader: R) -> Result<Self> {
        let len = reader
            .seek(SeekFrom::End(0))
            .map_err(Error::from_io_error)? as usize;
        reader
            .seek(SeekFrom::Start(0))
            .map_err(Error::from_io_error)?;
        trace!("IoSource with {len} bytes");
        Ok(IoSource {
            reader,
            len,
            pos: 0,
            eof: len == 0,
        })
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read + Seek + Clone> Source for IoSource<R> {
    fn len(&self) -> usize {
        self.len
    }

    fn seek(&mut self, offset: usize) -> Result<()> {
        self.reader
            .seek(SeekFrom::Start(offset as u64))
            .map_err(Error::from_io_error)?;
        self.pos = offset;
        self.eof = offset >= self.len;
        Ok(())
    }

    fn read_char(&mut self) -> Result<Option<char>> {
        let mut byte = [0u8; 1];
        let read = self.reader.read(&mut byte).map_err(Error::from_io_error)?;
        if read == 0 {
            self.eof = true;
            return Ok(None);
        }
        self.pos += 1;
        Ok(Some(char::from(byte[0])))
    }

    fn at_end(&self) -> bool {
        self.eof || self.pos >= self.len
    }

    fn try_clone(&self) -> Result<Self> {
        Ok(self.clone())
    }
}
