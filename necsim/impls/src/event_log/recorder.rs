use std::{
    convert::TryFrom,
    fmt,
    fs::{self, OpenOptions},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{Error, Result};

use necsim_core::{event::Event, reporter::Reporter};

use super::EventLogHeader;

const DEFAULT_SEGMENT_SIZE: usize = 1_000_000_usize;

/// Appends the event stream to numbered bincode segments in a directory
#[allow(clippy::module_name_repetitions)]
#[derive(serde::Deserialize)]
#[serde(try_from = "PathBuf")]
pub struct EventLogRecorder {
    segment_size: usize,
    directory: PathBuf,
    segment_index: usize,
    buffer: Vec<Event>,
    error: Option<Error>,
}

impl TryFrom<PathBuf> for EventLogRecorder {
    type Error = Error;

    fn try_from(path: PathBuf) -> Result<Self, Self::Error> {
        Self::try_new(&path)
    }
}

impl Drop for EventLogRecorder {
    fn drop(&mut self) {
        if !self.buffer.is_empty() {
            std::mem::drop(self.write_segment());
        }
    }
}

impl EventLogRecorder {
    /// # Errors
    ///
    /// Fails to construct iff `path` is not a writable, empty directory.
    pub fn try_new(path: &Path) -> Result<Self> {
        if !path.exists() {
            fs::create_dir_all(path)?;
        }

        let metadata = fs::metadata(path)?;

        if !metadata.is_dir() {
            return Err(anyhow::anyhow!("{:?} is not a directory.", path));
        }

        if metadata.permissions().readonly() {
            return Err(anyhow::anyhow!("{:?} is read-only.", path));
        }

        if fs::read_dir(path)?.next().is_some() {
            return Err(anyhow::anyhow!("{:?} is not empty.", path));
        }

        Ok(Self {
            segment_size: DEFAULT_SEGMENT_SIZE,
            directory: path.to_owned(),
            segment_index: 0_usize,
            buffer: Vec::new(),
            error: None,
        })
    }

    #[must_use]
    #[debug_requires(segment_size > 0, "segments hold at least one event")]
    pub fn with_segment_size(mut self, segment_size: usize) -> Self {
        self.segment_size = segment_size;
        self
    }

    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Writes out the remaining buffered events
    ///
    /// # Errors
    ///
    /// Fails if any segment of this log could not be written.
    pub fn finish(mut self) -> Result<()> {
        if !self.buffer.is_empty() {
            if let Err(err) = self.write_segment() {
                self.buffer.clear();
                self.error.get_or_insert(err);
            }
        }

        match self.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn write_segment(&mut self) -> Result<()> {
        let segment_path = self.directory.join(format!("{}", self.segment_index));
        self.segment_index += 1;

        let segment_file = OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .open(&segment_path)?;
        let mut buf_writer = BufWriter::new(segment_file);

        bincode::serialize_into(&mut buf_writer, &EventLogHeader::of(&self.buffer))?;

        for event in self.buffer.drain(0..) {
            bincode::serialize_into(&mut buf_writer, &event)?;
        }

        buf_writer.flush()?;

        Ok(())
    }
}

impl Reporter for EventLogRecorder {
    fn report_event(&mut self, event: &Event) {
        self.buffer.push(event.clone());

        if self.buffer.len() >= self.segment_size {
            if let Err(err) = self.write_segment() {
                warn!("Failed to write an event log segment: {}", err);

                self.buffer.clear();
                self.error.get_or_insert(err);
            }
        }
    }
}

impl fmt::Debug for EventLogRecorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct EventBufferLen(usize);

        impl fmt::Debug for EventBufferLen {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "Vec<Event; {}>", self.0)
            }
        }

        f.debug_struct("EventLogRecorder")
            .field("segment_size", &self.segment_size)
            .field("directory", &self.directory)
            .field("segment_index", &self.segment_index)
            .field("buffer", &EventBufferLen(self.buffer.len()))
            .finish()
    }
}
