/// Request input: disk files and stdin, bounded by `--max-file-size`.
///
/// `pipedag-core` never touches the filesystem; every byte it sees is read
/// here. Failures map to exit-code-2 [`CliError`] variants.
use std::io::Read;
use std::path::Path;

use crate::PathOrStdin;
use crate::error::CliError;

/// Reads `source` into a `String`, refusing anything over `max_size` bytes.
///
/// Disk files are checked through their metadata before reading. Stdin is
/// read through a `Read::take` cap one byte above the limit, so an oversized
/// stream is detected without buffering all of it.
///
/// # Errors
///
/// Returns [`CliError`] (exit code 2) when the file is missing or
/// unreadable, exceeds `max_size`, or is not valid UTF-8.
pub fn read_input(source: &PathOrStdin, max_size: u64) -> Result<String, CliError> {
    match source {
        PathOrStdin::Path(path) => read_file(path, max_size),
        PathOrStdin::Stdin => read_bounded(std::io::stdin().lock(), max_size, "-"),
    }
}

fn read_file(path: &Path, max_size: u64) -> Result<String, CliError> {
    let size = std::fs::metadata(path)
        .map_err(|e| file_error(&e, path))?
        .len();
    if size > max_size {
        return Err(CliError::FileTooLarge {
            source: path.display().to_string(),
            limit: max_size,
            actual: Some(size),
        });
    }
    let bytes = std::fs::read(path).map_err(|e| file_error(&e, path))?;
    into_utf8(bytes, &path.display().to_string())
}

/// Reads at most `max_size` bytes from `reader`; one byte more is an error.
fn read_bounded<R: Read>(reader: R, max_size: u64, label: &str) -> Result<String, CliError> {
    let mut buf = Vec::new();
    reader
        .take(max_size.saturating_add(1))
        .read_to_end(&mut buf)
        .map_err(|e| CliError::StdinReadError {
            detail: e.to_string(),
        })?;
    if buf.len() as u64 > max_size {
        return Err(CliError::FileTooLarge {
            source: label.to_owned(),
            limit: max_size,
            actual: None,
        });
    }
    into_utf8(buf, label)
}

fn file_error(e: &std::io::Error, path: &Path) -> CliError {
    let kind = e.kind();
    if kind == std::io::ErrorKind::NotFound {
        CliError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else if kind == std::io::ErrorKind::PermissionDenied {
        CliError::PermissionDenied {
            path: path.to_path_buf(),
        }
    } else {
        CliError::IoError {
            source: path.display().to_string(),
            detail: e.to_string(),
        }
    }
}

fn into_utf8(bytes: Vec<u8>, label: &str) -> Result<String, CliError> {
    String::from_utf8(bytes).map_err(|e| CliError::InvalidUtf8 {
        source: label.to_owned(),
        byte_offset: e.utf8_error().valid_up_to(),
    })
}
