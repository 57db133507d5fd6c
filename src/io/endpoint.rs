// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Source and sink endpoints.
//!
//! An endpoint is either the process's standard stream (the `-` sentinel) or a
//! file path. File paths ending in `.gz` are transparently wrapped with a
//! gzip filter; codecs never see the compression layer.
//!
//! Streams are scoped resources: [`SinkStream::finish`] finishes the gzip
//! layer (writing its trailer) before the buffered file handle is flushed and
//! closed, and every stream is released on drop along error paths.

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use tracing::debug;

use crate::core::{OmniError, Result};

/// Sentinel path meaning standard input (source) or standard output (sink).
pub const STDIO_SENTINEL: &str = "-";

/// A job endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Standard input or standard output
    Stdio,
    /// Filesystem path
    File(PathBuf),
}

impl Endpoint {
    /// Parse a user-supplied path, honoring the `-` sentinel.
    pub fn parse(path: impl AsRef<str>) -> Self {
        let path = path.as_ref();
        if path == STDIO_SENTINEL {
            Endpoint::Stdio
        } else {
            Endpoint::File(PathBuf::from(path))
        }
    }

    /// Check if this is the standard stream.
    pub fn is_stdio(&self) -> bool {
        matches!(self, Endpoint::Stdio)
    }

    /// Filesystem path, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Endpoint::Stdio => None,
            Endpoint::File(p) => Some(p),
        }
    }

    /// Whether the path carries a `.gz` suffix.
    pub fn is_gzip(&self) -> bool {
        self.path()
            .and_then(|p| p.extension())
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("gz"))
    }

    /// Check that this endpoint can be read.
    ///
    /// The standard stream always resolves. A file must exist and must not be
    /// a directory.
    pub fn resolve_source(&self) -> Result<()> {
        let Some(path) = self.path() else {
            return Ok(());
        };

        match fs::metadata(path) {
            Ok(meta) if meta.is_dir() => Err(OmniError::path(
                path.display().to_string(),
                "source is a directory",
            )),
            Ok(_) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(OmniError::path(
                path.display().to_string(),
                "source does not exist",
            )),
            Err(e) => Err(OmniError::path(
                path.display().to_string(),
                format!("cannot access source: {e}"),
            )),
        }
    }

    /// Check that this endpoint can be written without clobbering anything.
    ///
    /// An existing sink is a hard error unless `overwrite` is set. A directory
    /// is never a valid sink.
    pub fn resolve_sink(&self, overwrite: bool) -> Result<()> {
        let Some(path) = self.path() else {
            return Ok(());
        };

        match fs::metadata(path) {
            Ok(meta) if meta.is_dir() => Err(OmniError::path(
                path.display().to_string(),
                "sink is a directory",
            )),
            Ok(_) if !overwrite => Err(OmniError::path(
                path.display().to_string(),
                "sink already exists (use --force to overwrite)",
            )),
            Ok(_) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(OmniError::path(
                path.display().to_string(),
                format!("cannot access sink: {e}"),
            )),
        }
    }

    /// Open this endpoint for reading.
    pub fn open_source(&self) -> Result<SourceStream> {
        SourceStream::open(self)
    }

    /// Create this endpoint for writing.
    pub fn create_sink(&self, overwrite: bool) -> Result<SinkStream> {
        SinkStream::create(self, overwrite)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Stdio => write!(f, "{STDIO_SENTINEL}"),
            Endpoint::File(p) => write!(f, "{}", p.display()),
        }
    }
}

impl From<&str> for Endpoint {
    fn from(path: &str) -> Self {
        Endpoint::parse(path)
    }
}

/// Readable side of an endpoint.
pub struct SourceStream {
    inner: Box<dyn Read>,
}

impl SourceStream {
    fn open(endpoint: &Endpoint) -> Result<Self> {
        let inner: Box<dyn Read> = match endpoint {
            Endpoint::Stdio => Box::new(io::stdin().lock()),
            Endpoint::File(path) => {
                let file = File::open(path).map_err(|e| {
                    OmniError::path(path.display().to_string(), format!("cannot open: {e}"))
                })?;
                let reader = BufReader::new(file);
                if endpoint.is_gzip() {
                    debug!(path = %path.display(), "decompressing gzip source");
                    Box::new(MultiGzDecoder::new(reader))
                } else {
                    Box::new(reader)
                }
            }
        };

        Ok(Self { inner })
    }

    /// Wrap an arbitrary reader.
    pub fn from_reader(reader: impl Read + 'static) -> Self {
        Self {
            inner: Box::new(reader),
        }
    }

    /// Take the boxed reader, for row-at-a-time codecs.
    pub fn into_inner(self) -> Box<dyn Read> {
        self.inner
    }
}

impl Read for SourceStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

/// Writable side of an endpoint.
///
/// Overwriting an existing file writes to a hidden sibling first; the target
/// is replaced only by [`SinkStream::finish`]. Dropping an unfinished stream
/// removes the sibling and leaves the target as it was.
pub struct SinkStream {
    writer: SinkWriter,
    staged: Option<StagedFile>,
}

enum SinkWriter {
    Stdout(io::StdoutLock<'static>),
    File(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
}

/// Temporary file that replaces `target` on commit.
struct StagedFile {
    temp: PathBuf,
    target: PathBuf,
    committed: bool,
}

impl StagedFile {
    fn for_target(target: &Path) -> Self {
        let name = target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let temp = target.with_file_name(format!(".{name}.omnidata-{}.tmp", std::process::id()));
        Self {
            temp,
            target: target.to_path_buf(),
            committed: false,
        }
    }

    fn commit(mut self) -> Result<()> {
        fs::rename(&self.temp, &self.target).map_err(|e| {
            OmniError::path(
                self.target.display().to_string(),
                format!("cannot replace sink: {e}"),
            )
        })?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.temp);
        }
    }
}

impl SinkStream {
    fn create(endpoint: &Endpoint, overwrite: bool) -> Result<Self> {
        let path = match endpoint {
            Endpoint::Stdio => {
                return Ok(Self {
                    writer: SinkWriter::Stdout(io::stdout().lock()),
                    staged: None,
                })
            }
            Endpoint::File(path) => path,
        };

        let staged = (overwrite && path.exists()).then(|| StagedFile::for_target(path));
        let open_path = staged.as_ref().map_or(path.as_path(), |s| s.temp.as_path());

        let mut options = OpenOptions::new();
        options.write(true);
        if overwrite {
            options.create(true).truncate(true);
        } else {
            // Fails if something appeared since the sink was resolved.
            options.create_new(true);
        }

        let file = options.open(open_path).map_err(|e| {
            let reason = if e.kind() == io::ErrorKind::AlreadyExists {
                "sink already exists (use --force to overwrite)".to_string()
            } else {
                format!("cannot create sink: {e}")
            };
            OmniError::path(path.display().to_string(), reason)
        })?;
        if staged.is_some() {
            debug!(path = %path.display(), "staging output next to existing sink");
        }

        let writer = BufWriter::new(file);
        let writer = if endpoint.is_gzip() {
            debug!(path = %path.display(), "compressing gzip sink");
            SinkWriter::Gzip(GzEncoder::new(writer, Compression::default()))
        } else {
            SinkWriter::File(writer)
        };
        Ok(Self { writer, staged })
    }

    /// Flush and close the stream.
    ///
    /// The gzip encoder is finished first so its trailer reaches the buffered
    /// writer, then the buffer is flushed and the file handle released. A
    /// staged file then replaces the existing sink.
    pub fn finish(self) -> Result<()> {
        match self.writer {
            SinkWriter::Stdout(mut out) => out.flush()?,
            SinkWriter::File(writer) => close_file(writer)?,
            SinkWriter::Gzip(encoder) => {
                let writer = encoder.finish()?;
                close_file(writer)?;
            }
        }
        match self.staged {
            Some(staged) => staged.commit(),
            None => Ok(()),
        }
    }
}

fn close_file(writer: BufWriter<File>) -> Result<()> {
    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;
    Ok(())
}

impl Write for SinkStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.writer {
            SinkWriter::Stdout(out) => out.write(buf),
            SinkWriter::File(w) => w.write(buf),
            SinkWriter::Gzip(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.writer {
            SinkWriter::Stdout(out) => out.flush(),
            SinkWriter::File(w) => w.flush(),
            SinkWriter::Gzip(w) => w.flush(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read as _;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "omnidata_endpoint_{}_{}",
            std::process::id(),
            name
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_parse_sentinel() {
        assert_eq!(Endpoint::parse("-"), Endpoint::Stdio);
        assert_eq!(
            Endpoint::parse("data.csv"),
            Endpoint::File(PathBuf::from("data.csv"))
        );
        assert_eq!(Endpoint::Stdio.to_string(), "-");
    }

    #[test]
    fn test_gzip_suffix() {
        assert!(Endpoint::parse("out.csv.gz").is_gzip());
        assert!(Endpoint::parse("OUT.JSON.GZ").is_gzip());
        assert!(!Endpoint::parse("out.csv").is_gzip());
        assert!(!Endpoint::Stdio.is_gzip());
    }

    #[test]
    fn test_resolve_source_errors() {
        let dir = scratch("source");
        let missing = Endpoint::File(dir.join("missing.csv"));
        let err = missing.resolve_source().unwrap_err();
        assert!(err.to_string().contains("source does not exist"));

        let err = Endpoint::File(dir.clone()).resolve_source().unwrap_err();
        assert!(err.to_string().contains("source is a directory"));

        assert!(Endpoint::Stdio.resolve_source().is_ok());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_resolve_sink_refuses_existing() {
        let dir = scratch("sink");
        let path = dir.join("out.json");
        fs::write(&path, b"keep me").unwrap();

        let sink = Endpoint::File(path.clone());
        let err = sink.resolve_sink(false).unwrap_err();
        assert!(err.to_string().contains("sink already exists"));
        assert!(sink.resolve_sink(true).is_ok());

        let err = sink.create_sink(false).err().unwrap();
        assert!(matches!(err, OmniError::PathResolution { .. }));
        assert_eq!(fs::read(&path).unwrap(), b"keep me");

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_gzip_sink_round_trip() {
        let dir = scratch("gzip");
        let endpoint = Endpoint::File(dir.join("payload.txt.gz"));

        let mut sink = endpoint.create_sink(false).unwrap();
        sink.write_all(b"hello, compressed world").unwrap();
        sink.finish().unwrap();

        let raw = fs::read(endpoint.path().unwrap()).unwrap();
        assert_eq!(&raw[..2], &[0x1f, 0x8b]);

        let mut text = String::new();
        endpoint
            .open_source()
            .unwrap()
            .read_to_string(&mut text)
            .unwrap();
        assert_eq!(text, "hello, compressed world");

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_overwrite_replaces_only_on_finish() {
        let dir = scratch("staged");
        let path = dir.join("out.csv");
        fs::write(&path, b"original").unwrap();
        let endpoint = Endpoint::File(path.clone());

        {
            let mut sink = endpoint.create_sink(true).unwrap();
            sink.write_all(b"half written").unwrap();
            // Dropped without finish
        }
        assert_eq!(fs::read(&path).unwrap(), b"original");
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 1);

        let mut sink = endpoint.create_sink(true).unwrap();
        sink.write_all(b"replacement").unwrap();
        sink.finish().unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"replacement");
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 1);

        let _ = fs::remove_dir_all(&dir);
    }
}
