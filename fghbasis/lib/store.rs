//! Binary basis files: writing, lazy random-access reading, and iteration.
//!
//! A basis file is a short header followed by records of identical size, so
//! that the entry at any index can be located without reading those before it.
//! All values are little-endian.
//! ```text
//! header:
//!     magic     u32   "FGHB"
//!     version   u8    1
//! record:
//!     J         u32
//!     v         u32
//!     n         u32
//!     j         u32
//!     l         u32
//!     p         i32
//!     c         u32
//!     spin_mult u8
//!     norm      f64
//!     r_min     f64
//!     r_max     f64
//!     r_step    f64
//!     eigenval  f64
//!     len       u32
//!     eigenvec  f64 × len
//! ```
//! The eigenvector length is stored explicitly in every record rather than
//! inferred from the `r_list` descriptor, and must be the same for all records
//! in a file.
//!
//! ```
//! use std::io::Cursor;
//! use ndarray as nd;
//! use fghbasis::{
//!     basis::{ BasisEntry, QuantumNumbers },
//!     grid::RList,
//!     store::{ BasisStore, BasisWriter },
//! };
//!
//! let rlist = RList::new(1.0, 1.2, 0.1);
//! let mut writer = BasisWriter::new(Vec::new()).unwrap();
//! for v in 0..3 {
//!     let quantum = QuantumNumbers { v, ..Default::default() };
//!     let entry = BasisEntry::new(quantum, rlist, v as f64, nd::array![0.0, 1.0, 0.0]);
//!     writer.write(&entry).unwrap();
//! }
//! let bytes = writer.finish().unwrap();
//!
//! let mut store = BasisStore::from_reader(Cursor::new(bytes)).unwrap();
//! assert_eq!(store.count(), 3);
//! assert_eq!(store.get(2).unwrap().quantum.v, 2);
//! ```
//!
//! # Concurrency
//! A [`BasisStore`] owns a single read cursor and a one-entry cache, so
//! [`BasisStore::get`] takes `&mut self`. Sharing one store between threads
//! requires wrapping it in a lock (e.g. `Mutex<BasisStore>`) so that each
//! seek-then-read sequence happens as a unit. Independent stores opened on the
//! same file each have their own handle and may be read concurrently without
//! coordination.

use std::{
    fs::File,
    io::{ self, BufReader, BufWriter, Read, Seek, SeekFrom, Write },
    path::Path,
};
use ndarray as nd;
use tracing::debug;
use crate::{
    basis::{ BasisEntry, QuantumNumbers },
    error::BasisError,
    grid::RList,
};

pub type BasisResult<T> = Result<T, BasisError>;

/// Leading sentinel of every basis file.
pub const MAGIC: u32 = u32::from_le_bytes(*b"FGHB");

/// Layout version written by this crate.
pub const VERSION: u8 = 1;

/// Size of the file header in bytes.
pub const HEADER_SIZE: u64 = 5;

// everything in a record before the eigenvector
const RECORD_PREFIX: usize = 7 * 4 + 1 + 5 * 8 + 4;

// upper bound on the eigenvector buffer reserved before any data is read
const PREALLOC_LIMIT: u64 = 1 << 16;

/// Size in bytes of one record holding an eigenvector of length `len`.
pub fn record_size(len: usize) -> u64 {
    (RECORD_PREFIX + 8 * len) as u64
}

fn read_u32_le(bytes: &[u8], offset: usize) -> Option<u32> {
    let slice = bytes.get(offset..offset + 4)?;
    let mut buffer = [0_u8; 4];
    buffer.copy_from_slice(slice);
    Some(u32::from_le_bytes(buffer))
}

fn read_i32_le(bytes: &[u8], offset: usize) -> Option<i32> {
    read_u32_le(bytes, offset).map(|u| i32::from_le_bytes(u.to_le_bytes()))
}

fn read_f64_le(bytes: &[u8], offset: usize) -> Option<f64> {
    let slice = bytes.get(offset..offset + 8)?;
    let mut buffer = [0_u8; 8];
    buffer.copy_from_slice(slice);
    Some(f64::from_le_bytes(buffer))
}

fn short(what: &str) -> BasisError {
    BasisError::Corrupt(format!("truncated {what}"))
}

// read until `buf` is full or the source is exhausted, returning the number of
// bytes read
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(k) => { filled += k; },
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

fn encode_header(buf: &mut Vec<u8>) {
    buf.extend_from_slice(&MAGIC.to_le_bytes());
    buf.push(VERSION);
}

// returns `false` if the source is empty
fn read_header<R: Read>(reader: &mut R) -> BasisResult<bool> {
    let mut header = [0_u8; HEADER_SIZE as usize];
    match read_full(reader, &mut header)? {
        0 => return Ok(false),
        k if k < header.len() => return Err(short("header")),
        _ => {},
    }
    let magic = read_u32_le(&header, 0).ok_or_else(|| short("header"))?;
    if magic != MAGIC { return Err(BasisError::BadMagic(magic)); }
    let version = header[4];
    if version != VERSION { return Err(BasisError::UnsupportedVersion(version)); }
    Ok(true)
}

fn encode_record(entry: &BasisEntry, buf: &mut Vec<u8>) -> BasisResult<()> {
    let len = u32::try_from(entry.len())
        .map_err(|_| BasisError::Corrupt(
            format!("eigenvector of length {} is too long to store", entry.len())
        ))?;
    let q = &entry.quantum;
    buf.reserve(record_size(entry.len()) as usize);
    for x in [q.J, q.v, q.n, q.j, q.l] {
        buf.extend_from_slice(&x.to_le_bytes());
    }
    buf.extend_from_slice(&q.p.to_le_bytes());
    buf.extend_from_slice(&q.c.to_le_bytes());
    buf.push(q.spin_mult);
    let r = &entry.r_list;
    for x in [entry.norm, r.r_min, r.r_max, r.r_step, entry.eigenval] {
        buf.extend_from_slice(&x.to_le_bytes());
    }
    buf.extend_from_slice(&len.to_le_bytes());
    entry.eigenvec.iter()
        .for_each(|x| buf.extend_from_slice(&x.to_le_bytes()));
    Ok(())
}

// decode the fixed-size part of a record, returning the entry with an empty
// eigenvector and the declared eigenvector length
fn decode_prefix(bytes: &[u8]) -> Option<(BasisEntry, usize)> {
    let quantum = QuantumNumbers {
        J: read_u32_le(bytes, 0)?,
        v: read_u32_le(bytes, 4)?,
        n: read_u32_le(bytes, 8)?,
        j: read_u32_le(bytes, 12)?,
        l: read_u32_le(bytes, 16)?,
        p: read_i32_le(bytes, 20)?,
        c: read_u32_le(bytes, 24)?,
        spin_mult: *bytes.get(28)?,
    };
    let norm = read_f64_le(bytes, 29)?;
    let r_list = RList {
        r_min: read_f64_le(bytes, 37)?,
        r_max: read_f64_le(bytes, 45)?,
        r_step: read_f64_le(bytes, 53)?,
    };
    let eigenval = read_f64_le(bytes, 61)?;
    let len = read_u32_le(bytes, 69)? as usize;
    let entry = BasisEntry {
        quantum,
        norm,
        r_list,
        eigenval,
        eigenvec: nd::Array1::zeros(0),
    };
    Some((entry, len))
}

// read one record, returning `None` on a clean end of stream; if `expected` is
// given, a differing declared length is rejected before the eigenvector is read
fn read_record_with<R: Read>(reader: &mut R, expected: Option<usize>)
    -> BasisResult<Option<BasisEntry>>
{
    let mut prefix = [0_u8; RECORD_PREFIX];
    match read_full(reader, &mut prefix)? {
        0 => return Ok(None),
        k if k < RECORD_PREFIX => return Err(short("record")),
        _ => {},
    }
    let (mut entry, len) = decode_prefix(&prefix).ok_or_else(|| short("record"))?;
    if let Some(expected) = expected.filter(|n| *n != len) {
        return Err(BasisError::Corrupt(format!(
            "record declares eigenvector length {len}; expected {expected}",
        )));
    }
    // the declared length is untrusted until the bytes actually arrive
    let want = 8 * len as u64;
    let mut data: Vec<u8> = Vec::with_capacity(want.min(PREALLOC_LIMIT) as usize);
    reader.by_ref().take(want).read_to_end(&mut data)?;
    if (data.len() as u64) < want { return Err(short("eigenvector")); }
    entry.eigenvec
        = data.chunks_exact(8)
        .filter_map(|chunk| read_f64_le(chunk, 0))
        .collect();
    Ok(Some(entry))
}

/// Read one record from the current position of `reader`.
///
/// Returns `Ok(None)` if the source is exhausted exactly at the record
/// boundary; a record cut short anywhere else is [`BasisError::Corrupt`].
pub fn read_record<R: Read>(reader: &mut R) -> BasisResult<Option<BasisEntry>> {
    read_record_with(reader, None)
}

/// Decode every entry from a sequential source, e.g. a pipe.
///
/// Reading stops cleanly when the source ends on a record boundary. A
/// zero-length source holds no entries.
pub fn read_entries<R: Read>(mut reader: R) -> BasisResult<Vec<BasisEntry>> {
    let mut entries: Vec<BasisEntry> = Vec::new();
    if !read_header(&mut reader)? { return Ok(entries); }
    let mut expected: Option<usize> = None;
    while let Some(entry) = read_record_with(&mut reader, expected)? {
        expected = Some(entry.len());
        entries.push(entry);
    }
    Ok(entries)
}

/// Sequential writer for basis files.
///
/// The header is written on construction; [`Self::finish`] flushes and
/// returns the underlying writer.
#[derive(Debug)]
pub struct BasisWriter<W: Write = BufWriter<File>> {
    writer: W,
    vector_len: Option<usize>,
    count: usize,
    buf: Vec<u8>,
}

impl BasisWriter<BufWriter<File>> {
    /// Create (or truncate) a basis file at `path`.
    pub fn create<P>(path: P) -> BasisResult<Self>
    where P: AsRef<Path>
    {
        let file = File::create(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "creating basis file");
        Self::new(BufWriter::new(file))
    }
}

impl<W: Write> BasisWriter<W> {
    /// Wrap a writer, writing the header immediately.
    pub fn new(mut writer: W) -> BasisResult<Self> {
        let mut buf: Vec<u8> = Vec::new();
        encode_header(&mut buf);
        writer.write_all(&buf)?;
        Ok(Self { writer, vector_len: None, count: 0, buf })
    }

    /// Append one entry.
    ///
    /// Returns [`BasisError::LengthMismatch`] if the eigenvector length differs
    /// from that of the first entry written; nothing is written in that case.
    pub fn write(&mut self, entry: &BasisEntry) -> BasisResult<()> {
        let expected = *self.vector_len.get_or_insert(entry.len());
        if entry.len() != expected {
            return Err(BasisError::LengthMismatch { expected, got: entry.len() });
        }
        self.buf.clear();
        encode_record(entry, &mut self.buf)?;
        self.writer.write_all(&self.buf)?;
        self.count += 1;
        Ok(())
    }

    /// Number of entries written so far.
    pub fn count(&self) -> usize { self.count }

    /// Flush and return the underlying writer.
    pub fn finish(mut self) -> BasisResult<W> {
        self.writer.flush()?;
        debug!(count = self.count, "finished basis file");
        Ok(self.writer)
    }
}

/// Write all `entries` to a new basis file at `path`, returning the number
/// written.
pub fn write_basis<'a, P, I>(path: P, entries: I) -> BasisResult<usize>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = &'a BasisEntry>,
{
    let mut writer = BasisWriter::create(path)?;
    for entry in entries {
        writer.write(entry)?;
    }
    let count = writer.count();
    writer.finish()?;
    Ok(count)
}

/// Lazy, randomly accessible view of a basis file.
///
/// Only the header and the shape of the first record are read on
/// construction; entries are decoded on demand. The most recently read entry
/// is cached so that repeated access to the same index doesn't touch the
/// source again. The handle is released when the store is dropped.
///
/// See the [module-level documentation][self#concurrency] for thread safety.
#[derive(Debug)]
pub struct BasisStore<R: Read + Seek = BufReader<File>> {
    reader: R,
    count: usize,
    vector_len: usize,
    stride: u64,
    cache: Option<(usize, BasisEntry)>,
}

impl BasisStore<BufReader<File>> {
    /// Open the basis file at `path` for reading.
    pub fn open<P>(path: P) -> BasisResult<Self>
    where P: AsRef<Path>
    {
        let file = File::open(path.as_ref())?;
        let store = Self::from_reader(BufReader::new(file))?;
        debug!(
            path = %path.as_ref().display(),
            count = store.count,
            stride = store.stride,
            "opened basis file",
        );
        Ok(store)
    }
}

impl<R: Read + Seek> BasisStore<R> {
    /// Create a new store over any seekable source.
    ///
    /// A zero-length source is an empty store.
    pub fn from_reader(mut reader: R) -> BasisResult<Self> {
        let size = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(0))?;
        if !read_header(&mut reader)? || size == HEADER_SIZE {
            return Ok(Self { reader, count: 0, vector_len: 0, stride: 0, cache: None });
        }

        let mut prefix = [0_u8; RECORD_PREFIX];
        if read_full(&mut reader, &mut prefix)? < RECORD_PREFIX {
            return Err(short("first record"));
        }
        let (_, vector_len) = decode_prefix(&prefix).ok_or_else(|| short("first record"))?;
        let stride = record_size(vector_len);
        let data = size - HEADER_SIZE;
        if data % stride != 0 {
            return Err(BasisError::Corrupt(format!(
                "{data} bytes of record data is not a whole number of {stride}-byte records",
            )));
        }
        let count = (data / stride) as usize;
        Ok(Self { reader, count, vector_len, stride, cache: None })
    }

    /// Total number of entries.
    pub fn count(&self) -> usize { self.count }

    /// Return `true` if the store holds no entries.
    pub fn is_empty(&self) -> bool { self.count == 0 }

    /// Length of every eigenvector in the store (0 if empty).
    pub fn vector_len(&self) -> usize { self.vector_len }

    /// Size of each record in bytes (0 if empty).
    pub fn stride(&self) -> u64 { self.stride }

    fn read_at(&mut self, index: usize) -> BasisResult<BasisEntry> {
        let offset = HEADER_SIZE + index as u64 * self.stride;
        self.reader.seek(SeekFrom::Start(offset))?;
        read_record_with(&mut self.reader, Some(self.vector_len))?
            .ok_or_else(|| BasisError::Corrupt(format!(
                "record {index} missing; source is shorter than when opened",
            )))
    }

    /// Get the entry at `index`.
    ///
    /// Returns [`BasisError::IndexOutOfRange`] if `index >= self.count()`.
    pub fn get(&mut self, index: usize) -> BasisResult<&BasisEntry> {
        BasisError::check_index(index, self.count)?;
        if self.cache.as_ref().map_or(true, |(cached, _)| *cached != index) {
            let entry = self.read_at(index)?;
            self.cache = Some((index, entry));
        }
        self.cache.as_ref()
            .map(|(_, entry)| entry)
            .ok_or_else(|| BasisError::Corrupt(format!("record {index} not cached")))
    }

    /// Iterate over all entries in index order.
    ///
    /// Each call starts again from index 0.
    pub fn iter(&mut self) -> BasisIter<'_, R> {
        BasisIter { store: self, next: 0 }
    }
}

/// Iterator over the entries of a [`BasisStore`], created by
/// [`BasisStore::iter`].
#[derive(Debug)]
pub struct BasisIter<'a, R: Read + Seek> {
    store: &'a mut BasisStore<R>,
    next: usize,
}

impl<'a, R: Read + Seek> Iterator for BasisIter<'a, R> {
    type Item = BasisResult<BasisEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.store.count() { return None; }
        let item = self.store.get(self.next).cloned();
        self.next += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rem = self.store.count().saturating_sub(self.next);
        (rem, Some(rem))
    }
}

impl<'a, R: Read + Seek> ExactSizeIterator for BasisIter<'a, R> { }
