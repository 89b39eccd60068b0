use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use log::info;
use stack_xml::{Error, Source};

type Result<T> = core::result::Result<T, Error>;

/// A caller supplied character source that reads the file one unbuffered
/// byte at a time. Plugged into the parser through `begin_from_source`.
pub struct StdFileSource {
    path: PathBuf,
    file: File,
    size: usize,
    pos: usize,
}

impl StdFileSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        info!("Opening {path:?} as a custom source");
        let mut file = File::open(&path)?;
        let size = file.seek(SeekFrom::End(0))? as usize;
        file.seek(SeekFrom::Start(0))?;
        Ok(StdFileSource {
            path,
            file,
            size,
            pos: 0,
        })
    }
}

impl Source for StdFileSource {
    fn len(&self) -> usize {
        self.size
    }

    fn seek(&mut self, offset: usize) -> Result<()> {
        self.file.seek(SeekFrom::Start(offset as u64))?;
        self.pos = offset;
        Ok(())
    }

    fn read_char(&mut self) -> Result<Option<char>> {
        let mut byte = [0u8; 1];
        match self.file.read(&mut byte)? {
            0 => Ok(None),
            _ => {
                self.pos += 1;
                Ok(Some(char::from(byte[0])))
            }
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.size
    }

    fn try_clone(&self) -> Result<Self> {
        let mut copy = StdFileSource::open(&self.path)?;
        copy.seek(self.pos)?;
        Ok(copy)
    }
}
