//! Test utility functions for flowsync

use flowsync::{task, Backend, BackendKind, Flow, Task};
use std::sync::{Arc, Mutex};
use tokio::time::{sleep, Duration, Instant};

/// Something that happened to a unit of work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Started(usize),
    Finished(usize),
}

/// Shared, ordered record of when units of work started and finished
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    marks: Arc<Mutex<Vec<Mark>>>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&self, mark: Mark) {
        self.marks.lock().unwrap().push(mark);
    }

    pub fn marks(&self) -> Vec<Mark> {
        self.marks.lock().unwrap().clone()
    }

    /// Indices in the order they started
    pub fn started(&self) -> Vec<usize> {
        self.marks()
            .into_iter()
            .filter_map(|m| match m {
                Mark::Started(i) => Some(i),
                Mark::Finished(_) => None,
            })
            .collect()
    }

    /// How many units had started before the first one finished
    pub fn started_before_first_finish(&self) -> usize {
        self.marks()
            .into_iter()
            .take_while(|m| matches!(m, Mark::Started(_)))
            .count()
    }

    /// Largest number of units that were running at the same time
    pub fn peak_concurrency(&self) -> usize {
        let mut running = 0usize;
        let mut peak = 0usize;
        for mark in self.marks() {
            match mark {
                Mark::Started(_) => {
                    running += 1;
                    peak = peak.max(running);
                }
                Mark::Finished(_) => running -= 1,
            }
        }
        peak
    }
}

/// A task that records itself on `timeline`, sleeps, then returns its index
pub fn timed_task(timeline: &Timeline, index: usize, millis: u64) -> Task<usize, String> {
    let timeline = timeline.clone();
    task(async move {
        timeline.mark(Mark::Started(index));
        sleep(Duration::from_millis(millis)).await;
        timeline.mark(Mark::Finished(index));
        Ok(index)
    })
}

/// A task that records itself, sleeps, then fails with `error`
pub fn failing_task(timeline: &Timeline, index: usize, millis: u64, error: &str) -> Task<usize, String> {
    let timeline = timeline.clone();
    let error = error.to_string();
    task(async move {
        timeline.mark(Mark::Started(index));
        sleep(Duration::from_millis(millis)).await;
        timeline.mark(Mark::Finished(index));
        Err(error)
    })
}

/// Three 100ms tasks, like a typical fan-out
pub fn three_slow_tasks(timeline: &Timeline) -> Vec<Task<usize, String>> {
    (0..3).map(|i| timed_task(timeline, i, 100)).collect()
}

/// One facade per backend, so every scenario runs against both
pub fn flows() -> Vec<(BackendKind, Flow<Backend>)> {
    [BackendKind::Futures, BackendKind::Tokio]
        .into_iter()
        .map(|kind| (kind, Flow::new(Backend::from_kind(kind))))
        .collect()
}

/// Assert how much (virtual) time a flow took
pub fn assert_elapsed_between(start: Instant, min_ms: u64, max_ms: u64, context: &str) {
    let elapsed = start.elapsed();
    assert!(
        elapsed >= Duration::from_millis(min_ms) && elapsed < Duration::from_millis(max_ms),
        "{}: expected between {}ms and {}ms, took {:?}",
        context,
        min_ms,
        max_ms,
        elapsed
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeline_peak_concurrency() {
        let timeline = Timeline::new();
        timeline.mark(Mark::Started(0));
        timeline.mark(Mark::Started(1));
        timeline.mark(Mark::Finished(0));
        timeline.mark(Mark::Started(2));
        timeline.mark(Mark::Finished(1));
        timeline.mark(Mark::Finished(2));

        assert_eq!(timeline.peak_concurrency(), 2);
        assert_eq!(timeline.started_before_first_finish(), 2);
        assert_eq!(timeline.started(), vec![0, 1, 2]);
    }
}
