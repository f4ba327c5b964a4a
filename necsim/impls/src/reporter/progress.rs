use std::cmp::Ordering;

use indicatif::{ProgressBar, ProgressStyle};

use necsim_core::reporter::Reporter;

/// Shows the number of finished lineages as a terminal progress bar.
///
/// The total grows whenever more lineages are reported as remaining than
///  before, e.g. when a paused simulation is resumed with a new reporter.
#[allow(clippy::module_name_repetitions)]
#[derive(Default)]
pub struct ProgressReporter {
    progress: Option<ProgressBar>,
    last_remaining: u64,
    total: u64,
}

impl Reporter for ProgressReporter {
    fn report_progress(&mut self, remaining: u64) {
        let progress = self.progress.get_or_insert_with(|| {
            let progress =
                ProgressBar::new(1)
                    .with_style(ProgressStyle::default_bar().template(
                        "    [{elapsed_precise}] {bar:50.cyan/blue} {pos}/{len} [{eta_precise}]    ",
                    ));

            progress.enable_steady_tick(100);

            progress
        });

        match remaining.cmp(&self.last_remaining) {
            Ordering::Greater => {
                self.total += remaining - self.last_remaining;

                progress.set_length(self.total);
                progress.set_position(self.total - remaining);
            },
            Ordering::Less => {
                progress.inc(self.last_remaining - remaining);
            },
            Ordering::Equal => (),
        }

        self.last_remaining = remaining;
    }
}

impl ProgressReporter {
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn finish(self) {
        if let Some(progress) = self.progress {
            progress.finish();
        }
    }
}

#[cfg(test)]
mod tests {
    use necsim_core::reporter::Reporter;

    use super::ProgressReporter;

    #[test]
    fn total_tracks_the_largest_backlog() {
        let mut progress = ProgressReporter::default();

        progress.report_progress(10);
        progress.report_progress(4);
        progress.report_progress(6);

        assert_eq!(progress.total(), 12);

        progress.finish();
    }
}
