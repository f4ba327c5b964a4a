use std::{
    fmt,
    fs::{self, File, OpenOptions},
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use necsim_core::{event::Event, reporter::Reporter};

use super::EventLogHeader;

/// Reads back one segment written by the `EventLogRecorder`
pub struct EventLogSegment {
    header: EventLogHeader,
    reader: BufReader<File>,
    remaining: usize,
}

impl fmt::Debug for EventLogSegment {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct(stringify!(EventLogSegment))
            .field("header", &self.header)
            .field("remaining", &self.remaining)
            .finish()
    }
}

impl EventLogSegment {
    /// # Errors
    ///
    /// Fails if the `path` cannot be read as an event log segment
    pub fn try_new(path: &Path) -> Result<Self> {
        let file = OpenOptions::new().read(true).write(false).open(path)?;

        let mut buf_reader = BufReader::new(file);

        let header: EventLogHeader = bincode::deserialize_from(&mut buf_reader)
            .with_context(|| format!("{:?} is not an event log segment.", path))?;

        Ok(Self {
            remaining: header.length(),
            header,
            reader: buf_reader,
        })
    }

    #[must_use]
    pub fn header(&self) -> &EventLogHeader {
        &self.header
    }
}

impl Iterator for EventLogSegment {
    type Item = Result<Event>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        self.remaining -= 1;

        Some(bincode::deserialize_from(&mut self.reader).map_err(anyhow::Error::from))
    }
}

#[allow(clippy::module_name_repetitions)]
#[derive(Debug)]
pub struct EventLogReplay {
    segments: Vec<PathBuf>,
}

impl EventLogReplay {
    /// # Errors
    ///
    /// Fails if `directory` cannot be listed or contains no segments.
    pub fn try_new(directory: &Path) -> Result<Self> {
        let mut segments = Vec::new();

        for entry in fs::read_dir(directory)
            .with_context(|| format!("Failed to read the event log {:?}.", directory))?
        {
            let path = entry?.path();

            if let Some(index) = path
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(|name| name.parse::<usize>().ok())
            {
                segments.push((index, path));
            }
        }

        if segments.is_empty() {
            anyhow::bail!("The EventLogReplay requires at least one event log segment.")
        }

        segments.sort_unstable_by_key(|(index, _)| *index);

        Ok(Self {
            segments: segments.into_iter().map(|(_, path)| path).collect(),
        })
    }

    #[must_use]
    pub fn segments(&self) -> &[PathBuf] {
        &self.segments
    }

    /// Feeds every logged event, in recording order, into `reporter` and
    ///  returns the number of replayed events
    ///
    /// # Errors
    ///
    /// Fails if any segment cannot be read back.
    pub fn replay_into<R: Reporter>(&self, reporter: &mut R) -> Result<usize> {
        let mut replayed = 0_usize;

        for path in &self.segments {
            let segment = EventLogSegment::try_new(path)?;

            debug!("Replaying {:?} from {:?}.", segment.header(), path);

            for event in segment {
                reporter.report_event(&event?);

                replayed += 1;
            }
        }

        Ok(replayed)
    }
}

#[cfg(test)]
mod tests {
    use necsim_core::{
        event::Event,
        landscape::{Location, WrappedLocation},
        lineage::LineageId,
        reporter::Reporter,
    };
    use necsim_core_bond::{ClosedOpenUnitF64, NonNegativeF64};

    use super::{super::recorder::EventLogRecorder, super::EventLog, EventLogReplay};

    #[allow(clippy::cast_precision_loss)]
    fn events() -> Vec<Event> {
        let location = WrappedLocation::unwrapped(Location::new(0, 0));

        (0..5_u64)
            .map(|step| Event::SpeciationDraw {
                generation: NonNegativeF64::new(step as f64).unwrap(),
                lineage: LineageId::new(step % 2),
                age: step,
                draw: ClosedOpenUnitF64::new(0.5).unwrap(),
            })
            .chain(std::iter::once(Event::Coalescence {
                generation: NonNegativeF64::new(5.0).unwrap(),
                children: [LineageId::new(0), LineageId::new(1)],
                parent: LineageId::new(2),
                location,
            }))
            .collect()
    }

    #[test]
    fn segments_replay_in_order() {
        let directory = tempfile::tempdir().unwrap();

        let mut recorder = EventLogRecorder::try_new(directory.path())
            .unwrap()
            .with_segment_size(4);

        for event in &events() {
            recorder.report_event(event);
        }

        recorder.finish().unwrap();

        let replay = EventLogReplay::try_new(directory.path()).unwrap();
        assert_eq!(replay.segments().len(), 2);

        let mut log = EventLog::new();
        assert_eq!(replay.replay_into(&mut log).unwrap(), 6);
        assert_eq!(log.events(), &events()[..]);
    }

    #[test]
    fn recorder_rejects_non_empty_directory() {
        let directory = tempfile::tempdir().unwrap();
        std::fs::write(directory.path().join("0"), b"taken").unwrap();

        assert!(EventLogRecorder::try_new(directory.path()).is_err());
    }

    #[test]
    fn replay_requires_segments() {
        let directory = tempfile::tempdir().unwrap();

        assert!(EventLogReplay::try_new(directory.path()).is_err());
    }
}
