use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::{Result, Source};

/// Reads characters from a file on disk, one byte per character.
///
/// Cloning re-opens the file so the copy has its own position.
pub struct FileSource {
    path: PathBuf,
    file: BufReader<File>,
    len: usize,
    pos: usize,
    eof: bool,
}

impl FileSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = File::open(&path)?;
        let len = file.seek(SeekFrom::End(0))? as usize;
        file.seek(SeekFrom::Start(0))?;
        trace!("Opened {} ({len} bytes)", path.display());
        Ok(FileSource {
            path,
            file: BufReader::new(file),
            len,
            pos: 0,
            eof: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Source for FileSource {
    fn len(&self) -> usize {
        self.len
    }

    fn seek(&mut self, offset: usize) -> Result<()> {
        self.file.seek(SeekFrom::Start(offset as u64))?;
        self.pos = offset;
        self.eof = false;
        Ok(())
    }

    fn read_char(&mut self) -> Result<Option<char>> {
        let mut byte = [0u8; 1];
        let read = self.file.read(&mut byte)?;
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
        let mut copy = FileSource::open(&self.path)?;
        copy.seek(self.pos)?;
        Ok(copy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::io::Write;

    fn temp_file(name: &str, contents: &[u8]) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents).unwrap();
        path
    }

    #[test]
    fn reads_and_clones() {
        let path = temp_file("stack_xml_file_source.xml", b"<a>b</a>");
        let mut source = FileSource::open(&path).unwrap();
        assert_eq!(source.len(), 8);
        assert_eq!(source.read_char(), Ok(Some('<')));
        assert_eq!(source.read_char(), Ok(Some('a')));

        let mut copy = source.try_clone().unwrap();
        assert_eq!(copy.read_char(), Ok(Some('>')));
        assert_eq!(copy.read_char(), Ok(Some('b')));
        assert_eq!(source.read_char(), Ok(Some('>')));

        source.seek(7).unwrap();
        assert!(!source.at_end());
        assert_eq!(source.read_char(), Ok(Some('>')));
        assert!(source.at_end());
        assert_eq!(source.read_char(), Ok(None));

        source.seek(2).unwrap();
        assert!(!source.at_end());
        assert_eq!(source.read_char(), Ok(Some('>')));
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn empty_file_is_at_end() {
        let path = temp_file("stack_xml_empty_source.xml", b"");
        let source = FileSource::open(&path).unwrap();
        assert!(source.at_end());
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn missing_file() {
        let err = FileSource::open("/nonexistent/stack_xml.xml").err();
        assert_eq!(err, Some(Error::IoError(embedded_io::ErrorKind::NotFound)));
    }
}
