use std::fs::File;

use mmap_rs;

enum SourceBufferKind<'a> {
    File { buffer: mmap_rs::Mmap },
    Memory { bytes: &'a [u8] },
}

/// Keeps the input bytes and a file name in the same object, so they provide the same lifetimes.
///
/// File input is memory mapped read-only. The code blocks produced by the lexer index into this
/// buffer, so the buffer must outlive them.
pub struct SourceBuffer<'a> {
    kind: SourceBufferKind<'a>,
    file_name: String,
}

impl<'a> SourceBuffer<'a> {
    /// Maps the file at `file_path`. Empty files are represented without a mapping, as a
    /// zero-length mapping is not portable.
    pub fn new_from_file(file_path: &std::path::Path) -> Result<SourceBuffer<'_>, mmap_rs::Error> {
        let file = File::open(file_path)?;
        let len = File::metadata(&file)?.len();
        let file_name = String::from(file_path.to_string_lossy());
        if len == 0 {
            return Ok(SourceBuffer { kind: SourceBufferKind::Memory { bytes: &[] }, file_name });
        }
        let buffer = unsafe {
            mmap_rs::MmapOptions::new(len.try_into().unwrap())?.with_file(&file, 0).map()?
        };
        Ok(SourceBuffer { kind: SourceBufferKind::File { buffer }, file_name })
    }

    pub fn new_from_str(string: &'a str, name: &str) -> SourceBuffer<'a> {
        SourceBuffer {
            kind: SourceBufferKind::Memory { bytes: string.as_bytes() },
            file_name: String::from(name),
        }
    }

    pub fn code(&self) -> &[u8] {
        match &self.kind {
            SourceBufferKind::File { buffer } => buffer.as_slice(),
            SourceBufferKind::Memory { bytes } => bytes,
        }
    }

    pub fn file_name(&self) -> &str {
        self.file_name.as_str()
    }
}
