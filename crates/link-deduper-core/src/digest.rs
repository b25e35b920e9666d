//! Content digests used to confirm size-matched pairs.
//!
//! Files are streamed through BLAKE3 in fixed-size chunks, so memory use does
//! not grow with file size.
use crate::error::Result;
use blake3::Hash as Blake3Hash;

use std::{fs::File, io::Read, path::Path};

const CHUNK_SIZE: usize = 64 * 1024;

/// Compute the BLAKE3 digest of a file
pub fn compute_digest<P: AsRef<Path>>(path: P) -> Result<Blake3Hash> {
    let mut file = File::open(&path)?;
    let mut hasher = blake3::Hasher::new();

    let mut buffer = vec![0; CHUNK_SIZE];
    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hasher.finalize())
}

/// Whether two files have identical contents according to their digests
pub fn same_content(a: &Path, b: &Path) -> Result<bool> {
    Ok(compute_digest(a)? == compute_digest(b)?)
}
