//! Scenario: running tasks in series

use crate::helpers::*;
use flowsync::{task, FlowError, Mode, Task};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::time::Instant;

#[tokio::test(start_paused = true)]
async fn test_series_runs_one_task_at_a_time() {
    for (kind, flow) in flows() {
        let timeline = Timeline::new();
        let start = Instant::now();

        let results = flow.series(three_slow_tasks(&timeline)).await.unwrap();

        assert_eq!(results, vec![0, 1, 2], "{:?}", kind);
        assert_eq!(
            timeline.marks(),
            vec![
                Mark::Started(0),
                Mark::Finished(0),
                Mark::Started(1),
                Mark::Finished(1),
                Mark::Started(2),
                Mark::Finished(2),
            ],
            "{:?}",
            kind
        );
        assert_elapsed_between(start, 300, 400, &format!("{:?} series", kind));
    }
}

#[tokio::test(start_paused = true)]
async fn test_series_stops_at_first_error() {
    for (kind, flow) in flows() {
        let timeline = Timeline::new();
        let tasks = vec![
            timed_task(&timeline, 0, 10),
            failing_task(&timeline, 1, 10, "some error"),
            timed_task(&timeline, 2, 10),
        ];

        let err = flow.series(tasks).await.unwrap_err();

        assert_eq!(err.index(), 1, "{:?}", kind);
        assert_eq!(err.into_task_error(), Some("some error".to_string()));
        assert_eq!(timeline.started(), vec![0, 1], "{:?}: third task never ran", kind);
    }
}

#[tokio::test]
async fn test_series_second_step_failure_reaches_caller() {
    for (kind, flow) in flows() {
        let first_ran = Arc::new(AtomicUsize::new(0));
        let counter = first_ran.clone();

        let steps: Vec<Task<(), String>> = vec![
            task(async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
            task(async { Err("some error".to_string()) }),
        ];

        let result = flow.series(steps).await;

        assert_eq!(
            result,
            Err(FlowError::Task {
                index: 1,
                error: "some error".to_string()
            }),
            "{:?}",
            kind
        );
        assert_eq!(first_ran.load(Ordering::SeqCst), 1);
    }
}

#[tokio::test(start_paused = true)]
async fn test_run_in_series_mode_matches_series() {
    for (kind, flow) in flows() {
        let timeline = Timeline::new();
        let start = Instant::now();

        let results = flow
            .run(three_slow_tasks(&timeline), Mode::Series)
            .await
            .unwrap();

        assert_eq!(results, vec![0, 1, 2]);
        assert_eq!(timeline.peak_concurrency(), 1, "{:?}", kind);
        assert_elapsed_between(start, 300, 400, &format!("{:?} run(series)", kind));
    }
}
