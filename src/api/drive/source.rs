use crate::error::GraphResult;
use std::borrow::Cow;
use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

/// 分片上传的数据源：顺序可读，并提前知道名称、大小与是否为目录。
pub trait UploadSource: Read {
    fn name(&self) -> Cow<'_, str>;
    fn is_dir(&self) -> bool;
    fn size(&self) -> u64;
}

/// 本地文件。名称取自路径最后一段，非 UTF-8 字节按替换字符解码。
#[derive(Debug)]
pub struct LocalFile {
    name: String,
    is_dir: bool,
    size: u64,
    file: Option<File>,
}

impl LocalFile {
    pub fn open(path: impl AsRef<Path>) -> GraphResult<Self> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        // 目录无法读取内容，只保留元数据供前置检查使用
        let file = if metadata.is_dir() {
            None
        } else {
            Some(File::open(path)?)
        };
        Ok(Self {
            name,
            is_dir: metadata.is_dir(),
            size: metadata.len(),
            file,
        })
    }
}

impl Read for LocalFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.file.as_mut() {
            Some(file) => file.read(buf),
            None => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "cannot read a directory",
            )),
        }
    }
}

impl Seek for LocalFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self.file.as_mut() {
            Some(file) => file.seek(pos),
            None => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "cannot seek a directory",
            )),
        }
    }
}

impl UploadSource for LocalFile {
    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.name)
    }

    fn is_dir(&self) -> bool {
        self.is_dir
    }

    fn size(&self) -> u64 {
        self.size
    }
}

/// 内存中的数据源。
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    cursor: Cursor<Vec<u8>>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            cursor: Cursor::new(bytes.into()),
        }
    }
}

impl Read for MemorySource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.cursor.read(buf)
    }
}

impl Seek for MemorySource {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.cursor.seek(pos)
    }
}

impl UploadSource for MemorySource {
    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.name)
    }

    fn is_dir(&self) -> bool {
        false
    }

    fn size(&self) -> u64 {
        self.cursor.get_ref().len() as u64
    }
}

impl<S: UploadSource + ?Sized> UploadSource for &mut S {
    fn name(&self) -> Cow<'_, str> {
        (**self).name()
    }

    fn is_dir(&self) -> bool {
        (**self).is_dir()
    }

    fn size(&self) -> u64 {
        (**self).size()
    }
}
