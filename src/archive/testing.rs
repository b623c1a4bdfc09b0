// src/archive/testing.rs
//
// ustar writer for test fixtures.

use bzip2::write::BzEncoder;
use bzip2::Compression as BzCompression;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;
use xz2::write::XzEncoder;

use super::tar::BLOCK_SIZE;

#[derive(Debug, Clone)]
pub struct TarEntry {
    pub path: String,
    pub content: Vec<u8>,
    pub type_flag: u8,
}

impl TarEntry {
    pub fn dir(path: &str) -> Self {
        Self::with_type(path, b"", b'5')
    }

    pub fn file(path: &str, content: &[u8]) -> Self {
        Self::with_type(path, content, b'0')
    }

    pub fn with_type(path: &str, content: &[u8], type_flag: u8) -> Self {
        Self {
            path: path.to_string(),
            content: content.to_vec(),
            type_flag,
        }
    }
}

fn write_string(header: &mut [u8], offset: usize, len: usize, s: &str) {
    let bytes = s.as_bytes();
    let copy_len = bytes.len().min(len);
    header[offset..offset + copy_len].copy_from_slice(&bytes[..copy_len]);
}

fn write_octal(header: &mut [u8], offset: usize, len: usize, value: u64) {
    let s = format!("{:0>width$o}", value, width = len - 1);
    let bytes = s.as_bytes();
    let start = bytes.len().saturating_sub(len - 1);
    let slice = &bytes[start..];
    header[offset..offset + slice.len()].copy_from_slice(slice);
    header[offset + slice.len()] = 0;
}

/// Split a long path into (prefix, name): prefix max 155, name max 100.
fn split_path(path: &str) -> (String, String) {
    if path.len() <= 100 {
        return (String::new(), path.to_string());
    }
    for (i, c) in path.char_indices() {
        if c == '/' && i <= 155 && path.len() - i - 1 <= 100 {
            return (path[..i].to_string(), path[i + 1..].to_string());
        }
    }
    (String::new(), path[..100].to_string())
}

fn build_header(entry: &TarEntry) -> [u8; BLOCK_SIZE] {
    let mut header = [0u8; BLOCK_SIZE];

    let mut path = entry.path.clone();
    if entry.type_flag == b'5' && !path.ends_with('/') {
        path.push('/');
    }
    let (prefix, name) = split_path(&path);

    write_string(&mut header, 0, 100, &name);
    write_octal(&mut header, 100, 8, if entry.type_flag == b'5' { 0o755 } else { 0o644 });
    write_octal(&mut header, 108, 8, 0);
    write_octal(&mut header, 116, 8, 0);
    write_octal(&mut header, 124, 12, entry.content.len() as u64);
    write_octal(&mut header, 136, 12, 1_700_000_000);
    header[148..156].copy_from_slice(b"        ");
    header[156] = entry.type_flag;
    header[257..263].copy_from_slice(b"ustar\0");
    header[263..265].copy_from_slice(b"00");
    write_string(&mut header, 265, 32, "root");
    write_string(&mut header, 297, 32, "root");
    write_string(&mut header, 345, 155, &prefix);

    write_checksum(&mut header);
    header
}

fn write_checksum(header: &mut [u8]) {
    header[148..156].copy_from_slice(b"        ");
    let checksum: u32 = header.iter().map(|&b| b as u32).sum();
    let cksum_str = format!("{:06o}\0 ", checksum);
    header[148..156].copy_from_slice(&cksum_str.as_bytes()[..8]);
}

/// Overwrite the size field of the header at `offset` without touching
/// the data that follows it.
pub fn patch_size(archive: &mut [u8], offset: usize, size: u64) {
    let header = &mut archive[offset..offset + BLOCK_SIZE];
    write_octal(header, 124, 12, size);
    write_checksum(header);
}

/// Create an uncompressed tar archive from entries.
pub fn create_archive(entries: &[TarEntry]) -> Vec<u8> {
    let mut archive = Vec::new();
    for entry in entries {
        archive.extend_from_slice(&build_header(entry));
        archive.extend_from_slice(&entry.content);
        let remainder = entry.content.len() % BLOCK_SIZE;
        if remainder != 0 {
            archive.extend(std::iter::repeat(0u8).take(BLOCK_SIZE - remainder));
        }
    }
    archive.extend(std::iter::repeat(0u8).take(BLOCK_SIZE * 2));
    archive
}

pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::new(6));
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

pub fn bzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = BzEncoder::new(Vec::new(), BzCompression::best());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

pub fn xz(data: &[u8]) -> Vec<u8> {
    let mut encoder = XzEncoder::new(Vec::new(), 6);
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// Encode one pax record, whose length prefix counts its own digits.
pub fn pax_record(key: &str, value: &str) -> String {
    let body = format!(" {}={}\n", key, value);
    let mut len = body.len() + 1;
    while len.to_string().len() + body.len() != len {
        len = len.to_string().len() + body.len();
    }
    format!("{}{}", len, body)
}

/// The fixture used across the crate: `dir1/`, `dir1/file1.txt`, `file2.txt`.
pub fn sample_archive() -> Vec<u8> {
    create_archive(&[
        TarEntry::dir("dir1"),
        TarEntry::file("dir1/file1.txt", b"Hello World"),
        TarEntry::file("file2.txt", b"Test File"),
    ])
}
