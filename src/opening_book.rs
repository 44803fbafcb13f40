use anyhow::{anyhow, Result};
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;
use std::sync::Arc;

use crate::{bitboard::BitBoard, WIDTH};

/// Replies that are always in the book, keyed by [`BitBoard::book_key`]
pub const BUILTIN_ENTRIES: [(u64, usize); 2] = [
    // Respond to _ _ _ o _ _ _
    // with       _ _ x o _ _ _
    (4398050705408, 2),
    // Respond to _ _ _ _ o _ _
    // with       _ _ _ x o _ _
    (4398583382016, 3),
];

/// A table of fixed replies to known early positions
///
/// Cloning is cheap, the table is shared between clones.
#[derive(Clone, Debug)]
pub struct OpeningBook(Arc<HashMap<u64, usize>>);

impl OpeningBook {
    /// A book holding only the built-in replies
    pub fn new() -> Self {
        Self(Arc::new(BUILTIN_ENTRIES.iter().copied().collect()))
    }

    /// Loads the built-in replies plus every record in the file at `path`
    ///
    /// Records are a big-endian `u64` position key followed by a `u8` column.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut book = Self::new();
        let mut file = BufReader::new(File::open(path)?);

        loop {
            let key = match file.read_u64::<BigEndian>() {
                Ok(key) => key,
                Err(err) if err.kind() == ErrorKind::UnexpectedEof => break,
                Err(err) => return Err(err.into()),
            };
            let column = file.read_u8()? as usize;
            book.insert(key, column)?;
        }
        Ok(book)
    }

    /// Writes every entry, built-in ones included, sorted by key
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut entries: Vec<_> = self.0.iter().map(|(&key, &column)| (key, column)).collect();
        entries.sort_unstable();

        let mut file = BufWriter::new(
            OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(path)?,
        );
        for (key, column) in entries {
            file.write_u64::<BigEndian>(key)?;
            file.write_u8(column as u8)?;
        }
        file.flush()?;
        Ok(())
    }

    pub fn insert(&mut self, key: u64, column: usize) -> Result<()> {
        if column >= WIDTH {
            return Err(anyhow!(
                "Invalid book entry {:#x}, column {} out of range",
                key,
                column
            ));
        }
        Arc::make_mut(&mut self.0).insert(key, column);
        Ok(())
    }

    /// The recorded reply for `board`, if any
    pub fn get(&self, board: &BitBoard) -> Option<usize> {
        self.0.get(&board.book_key()).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for OpeningBook {
    fn default() -> Self {
        Self::new()
    }
}
