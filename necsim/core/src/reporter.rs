use crate::event::Event;

pub trait Reporter {
    #[inline]
    fn report_event(&mut self, _event: &Event) {
        // no-op
    }

    #[inline]
    fn report_progress(&mut self, _remaining: u64) {
        // no-op
    }
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    #[inline]
    fn report_event(&mut self, event: &Event) {
        (**self).report_event(event);
    }

    #[inline]
    fn report_progress(&mut self, remaining: u64) {
        (**self).report_progress(remaining);
    }
}

#[allow(clippy::module_name_repetitions)]
pub struct NullReporter;

impl Reporter for NullReporter {}

#[allow(clippy::module_name_repetitions)]
pub struct ReporterCombinator<F: Reporter, T: Reporter> {
    front: F,
    tail: T, // R = ReporterCombinator<...>
}

impl<F: Reporter, T: Reporter> Reporter for ReporterCombinator<F, T> {
    #[inline]
    fn report_event(&mut self, event: &Event) {
        self.front.report_event(event);
        self.tail.report_event(event);
    }

    #[inline]
    fn report_progress(&mut self, remaining: u64) {
        self.front.report_progress(remaining);
        self.tail.report_progress(remaining);
    }
}

impl<F: Reporter, T: Reporter> ReporterCombinator<F, T> {
    /// This constructor should not be used directly to combinate reporters.
    /// Use the `ReporterGroup![...]` macro instead.
    #[must_use]
    pub fn new(front: F, tail: T) -> Self {
        Self { front, tail }
    }

    /// This destructor should not be used directly to decompose reporters.
    /// Use the `ReporterUnGroup!{reporter => [...]}` macro instead.
    #[must_use]
    pub fn wen(self) -> (F, T) {
        (self.front, self.tail)
    }
}

#[macro_export]
macro_rules! ReporterGroup {
    () => {
        $crate::reporter::NullReporter
    };
    ($first_reporter:ident $(,$reporter_tail:ident)*) => {
        {
            $crate::reporter::ReporterCombinator::new(
                $first_reporter,
                $crate::ReporterGroup![$($reporter_tail),*],
            )
        }
    }
}

#[macro_export]
macro_rules! ReporterUnGroup {
    ($reporter:expr => []) => {};
    ($reporter:expr => [$first_reporter:ident $(,$reporter_tail:ident)*]) => {
        {
            let (reporter_front, reporter_tail) = $reporter.wen();

            $first_reporter = reporter_front;

            $crate::ReporterUnGroup!{reporter_tail => [$($reporter_tail),*]}
        }
    }
}

#[cfg(test)]
mod tests {
    use necsim_core_bond::NonNegativeF64;

    use crate::{event::Event, lineage::LineageId};

    use super::Reporter;

    #[derive(Default)]
    struct CountingReporter {
        events: usize,
        last_remaining: Option<u64>,
    }

    impl Reporter for CountingReporter {
        fn report_event(&mut self, _event: &Event) {
            self.events += 1;
        }

        fn report_progress(&mut self, remaining: u64) {
            self.last_remaining = Some(remaining);
        }
    }

    #[test]
    fn grouped_reporters_see_every_event() {
        let mut first = CountingReporter::default();
        let mut second = CountingReporter::default();

        let mut group = ReporterGroup![first, second];

        let event = Event::SpeciationDraw {
            generation: NonNegativeF64::zero(),
            lineage: LineageId::new(0),
            age: 0,
            draw: necsim_core_bond::ClosedOpenUnitF64::zero(),
        };

        group.report_event(&event);
        group.report_event(&event);
        group.report_progress(7);

        ReporterUnGroup! {group => [first, second]};

        assert_eq!(first.events, 2);
        assert_eq!(second.events, 2);
        assert_eq!(first.last_remaining, Some(7));
        assert_eq!(second.last_remaining, Some(7));
    }
}
