/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Text artifacts: arc lists, vertex maps and interval tables.
//!
//! All files are tab-separated, one record per line. Lines starting with `#`
//! or `%` are comments.

use crate::{Error, Result};
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

pub const BIGSCC_EXT: &str = "bigscc";
pub const SMALLSCC_EXT: &str = "smallscc";
pub const VMAP_EXT: &str = "vmap";
pub const INTERVAL_EXT: &str = "dag.interval";
pub const REMAPPED_ARCS_EXT: &str = "be";

/// Returns `basename` with `.ext` appended.
pub fn artifact_path(basename: impl AsRef<Path>, ext: &str) -> PathBuf {
    let mut path = basename.as_ref().as_os_str().to_owned();
    path.push(".");
    path.push(ext);
    PathBuf::from(path)
}

fn invalid_data(path: &Path, line: usize, content: &str) -> Error {
    Error::io(
        path,
        std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("line {}: cannot parse {:?}", line + 1, content),
        ),
    )
}

/// Parses whitespace-separated pairs of node ids, skipping comments and empty
/// lines.
///
/// `path` is only used in error messages.
pub fn parse_pairs(reader: impl BufRead, path: &Path) -> Result<Vec<(usize, usize)>> {
    let mut pairs = Vec::new();
    for (line_num, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| Error::io(path, e))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('%') {
            continue;
        }
        let mut fields = line.split_whitespace().map(str::parse::<usize>);
        match (fields.next(), fields.next()) {
            (Some(Ok(first)), Some(Ok(second))) => pairs.push((first, second)),
            _ => return Err(invalid_data(path, line_num, line)),
        }
    }
    Ok(pairs)
}

/// Reads the arc list (or any other list of pairs) stored at `path`.
pub fn read_pairs(path: impl AsRef<Path>) -> Result<Vec<(usize, usize)>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    parse_pairs(BufReader::new(file), path)
}

/// A buffered text artifact.
#[derive(Debug)]
pub struct ArtifactWriter {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl ArtifactWriter {
    /// Creates (or truncates) the file at `path`.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = File::create(&path).map_err(|e| Error::io(&path, e))?;
        Ok(Self {
            path,
            writer: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write_line(&mut self, line: fmt::Arguments) -> Result<()> {
        self.writer
            .write_fmt(line)
            .and_then(|_| self.writer.write_all(b"\n"))
            .map_err(|e| Error::io(&self.path, e))
    }

    pub fn write_pair(&mut self, first: usize, second: usize) -> Result<()> {
        self.write_line(format_args!("{}\t{}", first, second))
    }

    /// Flushes and closes the file, returning its path.
    pub fn finish(mut self) -> Result<PathBuf> {
        self.writer.flush().map_err(|e| Error::io(&self.path, e))?;
        Ok(self.path)
    }
}

/// The output files of a pipeline run.
///
/// All files are created when the run starts, so that a missing directory
/// or a permission problem is reported before any computation.
#[derive(Debug)]
pub struct Artifacts {
    /// Arcs with both endpoints in the giant component.
    pub bigscc: ArtifactWriter,
    /// All other arcs.
    pub smallscc: ArtifactWriter,
    pub vmap: ArtifactWriter,
    pub interval: ArtifactWriter,
    /// The input arcs renumbered with the final ids, if requested.
    pub remapped_arcs: Option<ArtifactWriter>,
}

impl Artifacts {
    pub fn create(basename: impl AsRef<Path>, remapped_arcs: bool) -> Result<Self> {
        let basename = basename.as_ref();
        Ok(Self {
            bigscc: ArtifactWriter::create(artifact_path(basename, BIGSCC_EXT))?,
            smallscc: ArtifactWriter::create(artifact_path(basename, SMALLSCC_EXT))?,
            vmap: ArtifactWriter::create(artifact_path(basename, VMAP_EXT))?,
            interval: ArtifactWriter::create(artifact_path(basename, INTERVAL_EXT))?,
            remapped_arcs: if remapped_arcs {
                Some(ArtifactWriter::create(artifact_path(
                    basename,
                    REMAPPED_ARCS_EXT,
                ))?)
            } else {
                None
            },
        })
    }
}

/// An inclusive range of global ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: usize,
    pub end: usize,
}

impl Interval {
    /// Returns the interval covering `len` ids from `start`, or [`None`] if
    /// `len` is zero.
    pub fn with_len(start: usize, len: usize) -> Option<Self> {
        (len > 0).then(|| Self {
            start,
            end: start + len - 1,
        })
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.end + 1 - self.start
    }
}

/// Checks that `intervals`, in order, tile `[0..num_ids)` with no gap and no
/// overlap.
pub fn check_tiling(intervals: &[Interval], num_ids: usize) -> Result<()> {
    let mut cursor = 0;
    for interval in intervals {
        if interval.start != cursor || interval.end < interval.start {
            return Err(Error::invariant(
                "intervals",
                format!(
                    "interval {}..={} does not start at {}",
                    interval.start, interval.end, cursor
                ),
            ));
        }
        cursor = interval.end + 1;
    }
    if cursor != num_ids {
        return Err(Error::invariant(
            "intervals",
            format!("intervals cover {} ids instead of {}", cursor, num_ids),
        ));
    }
    Ok(())
}

pub fn write_intervals(writer: &mut ArtifactWriter, intervals: &[Interval]) -> Result<()> {
    for interval in intervals {
        writer.write_pair(interval.start, interval.end)?;
    }
    Ok(())
}

pub fn read_intervals(path: impl AsRef<Path>) -> Result<Vec<Interval>> {
    Ok(read_pairs(path)?
        .into_iter()
        .map(|(start, end)| Interval { start, end })
        .collect())
}

/// Rows `(old id, new id)` of the global renumbering.
#[derive(Debug, Default, Clone)]
pub struct VertexMap {
    rows: Vec<(usize, usize)>,
}

impl VertexMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, rows: impl IntoIterator<Item = (usize, usize)>) {
        self.rows.extend(rows);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sorts the rows by old id and writes them after the `#old_vid\tnew_vid`
    /// header.
    pub fn write(&mut self, writer: &mut ArtifactWriter) -> Result<()> {
        self.rows.sort_unstable();
        writer.write_line(format_args!("#old_vid\tnew_vid"))?;
        for &(old, new) in &self.rows {
            writer.write_pair(old, new)?;
        }
        Ok(())
    }

    /// Returns the rows, in the order they were added (or sorted, after
    /// [`write`](Self::write)).
    pub fn rows(&self) -> &[(usize, usize)] {
        &self.rows
    }
}
