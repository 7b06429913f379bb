//! Per-file orchestration and recursive directory processing.

use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

use crate::console::Console;
use crate::toolchain::diagnostics::LexError;
use crate::toolchain::generator;
use crate::toolchain::lexer::BlockBuffer;
use crate::toolchain::source::SourceBuffer;

/// Why one file could not be generated. Per-file failures are reported and the run continues.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("{0}")]
    Lex(#[from] LexError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Map(#[from] mmap_rs::Error),
}

/// Generates the `.h` and `.cpp` siblings for one unified source file, overwriting existing
/// files. The outputs are created before lexing starts; on a lexer error the truncated files are
/// left in place.
pub fn generate_file(path: &Path) -> Result<(), GenerateError> {
    let source = SourceBuffer::new_from_file(path)?;
    let stem = match path.file_stem() {
        Some(stem) => stem.to_string_lossy().into_owned(),
        None => String::new(),
    };

    let mut interface = BufWriter::new(File::create(path.with_extension("h"))?);
    let mut implementation = BufWriter::new(File::create(path.with_extension("cpp"))?);

    let buffer = BlockBuffer::lex(source.code())?;
    let guard = generator::include_guard(buffer.code(), buffer.blocks(), &stem);
    generator::generate(
        buffer.code(),
        buffer.blocks(),
        &stem,
        &guard,
        &mut interface,
        &mut implementation,
    )?;

    interface.flush()?;
    implementation.flush()?;
    Ok(())
}

/// Processes every `.cppx` file under `base_dir` and its subdirectories. Returns the process
/// exit code: 1 when the base directory cannot be accessed, 0 otherwise. Per-file failures are
/// reported on the error sink and do not change the exit code.
pub fn generate_tree(base_dir: &Path, console: &Console) -> i32 {
    match std::fs::metadata(base_dir) {
        Ok(metadata) if metadata.is_dir() => {}
        _ => {
            console.error(&format!("Could not access directory: {}", base_dir.display()));
            return 1;
        }
    }

    console.output(&format!("Processing directory: {}", base_dir.display()));

    let files = files_to_generate(base_dir, console);
    if files.is_empty() {
        console.warning(&format!(
            "No unified C++ files (.cppx) found in '{}' or in its subdirectories",
            base_dir.display()
        ));
        return 0;
    }

    console.output(&format!("Found {} files to process:", files.len()));
    for path in &files {
        match std::fs::metadata(path) {
            Ok(metadata) => {
                console.output(&format!("{} ({} bytes)", path.display(), metadata.len()));
                if metadata.len() == 0 {
                    console.warning(&format!("{} is empty", path.display()));
                }
            }
            Err(_) => console.output(&format!("{}", path.display())),
        }

        if let Err(error) = generate_file(path) {
            match error {
                GenerateError::Lex(error) => console.error(&format!(
                    "Error at {} (line {}): {}",
                    path.display(),
                    error.line,
                    error
                )),
                error => {
                    console.error(&format!("Error at {}: {}", path.display(), error))
                }
            }
        }
    }

    0
}

/// The unified source files to process under `base_dir`, in directory order.
fn files_to_generate(base_dir: &Path, console: &Console) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in WalkDir::new(base_dir) {
        match entry {
            Ok(entry) => {
                let path = entry.path();
                if entry.file_type().is_file()
                    && path.extension() == Some(OsStr::new("cppx"))
                {
                    files.push(path.to_path_buf());
                }
            }
            Err(error) => console.error(&format!(
                "An error occurred while obtaining the files to process: {}",
                error
            )),
        }
    }
    files
}
