// src/archive/tar.rs

use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;
use std::io::{self, Read};
use std::path::Path;
use thiserror::Error;
use tracing::info;
use xz2::read::XzDecoder;

use super::{ArchiveEntry, EntryKind};

pub(crate) const BLOCK_SIZE: usize = 512;

/// Archive decoding errors. Any of these aborts filesystem construction.
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("cannot read archive '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("gzip: {0}")]
    Gzip(#[source] std::io::Error),

    #[error("bzip2: {0}")]
    Bzip2(#[source] std::io::Error),

    #[error("xz: {0}")]
    Xz(#[source] std::io::Error),

    #[error("tar: invalid header checksum at offset {offset}")]
    Checksum { offset: usize },

    #[error("tar: invalid {field} field at offset {offset}")]
    InvalidField { field: &'static str, offset: usize },

    #[error("tar: unexpected end of archive at offset {offset}")]
    Truncated { offset: usize },
}

/// Read and decode the archive stored at `path`.
pub fn load_archive(path: impl AsRef<Path>) -> Result<Vec<ArchiveEntry>, ArchiveError> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|source| ArchiveError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let entries = read_archive(&data)?;
    info!(archive = %path.display(), entries = entries.len(), "loaded archive");
    Ok(entries)
}

/// Decode a tar stream, transparently decompressing gzip, bzip2 and xz input.
pub fn read_archive(data: &[u8]) -> Result<Vec<ArchiveEntry>, ArchiveError> {
    if is_gzip(data) {
        let decompressed = decompress(GzDecoder::new(data)).map_err(ArchiveError::Gzip)?;
        return parse_archive(&decompressed);
    }
    if is_bzip2(data) {
        let decompressed = decompress(BzDecoder::new(data)).map_err(ArchiveError::Bzip2)?;
        return parse_archive(&decompressed);
    }
    if is_xz(data) {
        let decompressed = decompress(XzDecoder::new(data)).map_err(ArchiveError::Xz)?;
        return parse_archive(&decompressed);
    }
    parse_archive(data)
}

/// Check if data is gzip compressed (magic bytes 0x1f 0x8b).
fn is_gzip(data: &[u8]) -> bool {
    data.len() >= 2 && data[0] == 0x1f && data[1] == 0x8b
}

/// `BZh` followed by the block size digit.
fn is_bzip2(data: &[u8]) -> bool {
    data.len() >= 4 && data.starts_with(b"BZh") && (b'1'..=b'9').contains(&data[3])
}

fn is_xz(data: &[u8]) -> bool {
    data.starts_with(&[0xfd, b'7', b'z', b'X', b'Z', 0x00])
}

fn decompress(mut decoder: impl Read) -> io::Result<Vec<u8>> {
    let mut decompressed = Vec::new();
    decoder.read_to_end(&mut decompressed)?;
    Ok(decompressed)
}

/// Read a null-terminated string from a fixed-size field.
fn read_string(header: &[u8], offset: usize, len: usize) -> String {
    let slice = &header[offset..offset + len];
    let end = slice.iter().position(|&b| b == 0).unwrap_or(len);
    String::from_utf8_lossy(&slice[..end]).to_string()
}

/// Read an octal ASCII value from a fixed-size field. Blank fields read as 0.
fn read_octal(header: &[u8], offset: usize, len: usize) -> Option<u64> {
    let s = read_string(header, offset, len);
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Some(0);
    }
    u64::from_str_radix(trimmed, 8).ok()
}

fn is_zero_block(block: &[u8]) -> bool {
    block.iter().all(|&b| b == 0)
}

/// Sum of all header bytes, with the checksum field (148..156) counted as spaces.
/// Some historical writers summed signed bytes, so both variants are computed.
fn checksums(header: &[u8]) -> (u64, i64) {
    let mut unsigned: u64 = 0;
    let mut signed: i64 = 0;
    for (i, &byte) in header.iter().enumerate() {
        let byte = if (148..156).contains(&i) { b' ' } else { byte };
        unsigned += byte as u64;
        signed += byte as i8 as i64;
    }
    (unsigned, signed)
}

fn verify_checksum(header: &[u8]) -> bool {
    let Some(stored) = read_octal(header, 148, 8) else {
        return false;
    };
    let (unsigned, signed) = checksums(header);
    stored == unsigned || stored as i64 == signed
}

/// Entry path from the header: POSIX ustar headers may split it into prefix + name.
fn header_path(header: &[u8]) -> String {
    let name = read_string(header, 0, 100);
    if &header[257..263] != b"ustar\0" {
        return name;
    }
    let prefix = read_string(header, 345, 155);
    if prefix.is_empty() {
        name
    } else {
        format!("{}/{}", prefix, name)
    }
}

/// Extract the `path` keyword from a pax extended header payload.
/// Records have the form `<len> <key>=<value>\n`.
fn pax_path(payload: &[u8]) -> Option<String> {
    let mut pos = 0;
    let mut path = None;
    while pos < payload.len() {
        let rest = &payload[pos..];
        let space = rest.iter().position(|&b| b == b' ')?;
        let len: usize = std::str::from_utf8(&rest[..space]).ok()?.parse().ok()?;
        if len <= space + 1 || len > rest.len() {
            return path;
        }
        let record = &rest[space + 1..len];
        let record = record.strip_suffix(b"\n").unwrap_or(record);
        if let Some(eq) = record.iter().position(|&b| b == b'=') {
            if &record[..eq] == b"path" {
                path = Some(String::from_utf8_lossy(&record[eq + 1..]).to_string());
            }
        }
        pos += len;
    }
    path
}

fn padded(size: usize) -> usize {
    size.div_ceil(BLOCK_SIZE) * BLOCK_SIZE
}

/// Parse an uncompressed tar stream into entries, in archive order.
fn parse_archive(data: &[u8]) -> Result<Vec<ArchiveEntry>, ArchiveError> {
    let mut entries = Vec::new();
    let mut offset = 0;
    let mut zero_blocks = 0;
    let mut pending_path: Option<String> = None;

    while offset + BLOCK_SIZE <= data.len() {
        let header = &data[offset..offset + BLOCK_SIZE];

        if is_zero_block(header) {
            zero_blocks += 1;
            offset += BLOCK_SIZE;
            if zero_blocks >= 2 {
                break;
            }
            continue;
        }
        zero_blocks = 0;

        if !verify_checksum(header) {
            return Err(ArchiveError::Checksum { offset });
        }

        let size = read_octal(header, 124, 12)
            .and_then(|s| usize::try_from(s).ok())
            .ok_or(ArchiveError::InvalidField { field: "size", offset })?;
        let type_flag = header[156];
        // Link, device, directory and fifo headers carry no data whatever their size field says.
        let size = match type_flag {
            b'1'..=b'6' => 0,
            _ => size,
        };

        let payload_start = offset + BLOCK_SIZE;
        let payload_end = payload_start
            .checked_add(size)
            .filter(|&end| end <= data.len())
            .ok_or(ArchiveError::Truncated { offset })?;
        let payload = &data[payload_start..payload_end];
        let path = header_path(header);
        offset = payload_start + padded(size);

        match type_flag {
            // GNU long name: payload holds the next entry's path
            b'L' => {
                pending_path = Some(read_string(payload, 0, payload.len()));
                continue;
            }
            b'x' => {
                if let Some(p) = pax_path(payload) {
                    pending_path = Some(p);
                }
                continue;
            }
            // pax global header, GNU long link target
            b'g' | b'K' => continue,
            _ => {}
        }

        let path = pending_path.take().unwrap_or(path);
        // Pre-POSIX archives mark directories only by a trailing slash.
        let is_directory =
            type_flag == b'5' || (matches!(type_flag, b'0' | 0) && path.ends_with('/'));

        entries.push(ArchiveEntry {
            path,
            kind: if is_directory { EntryKind::Directory } else { EntryKind::File },
        });
    }

    Ok(entries)
}
