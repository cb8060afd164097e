//! Scenario: bounded concurrency

use crate::helpers::*;
use flowsync::Mode;
use tokio::time::{sleep, Duration, Instant};

#[tokio::test(start_paused = true)]
async fn test_parallel_limit_bounds_tasks_in_flight() {
    for (kind, flow) in flows() {
        let timeline = Timeline::new();
        let start = Instant::now();
        let tasks = (0..6).map(|i| timed_task(&timeline, i, 100)).collect();

        let results = flow.parallel_limit(tasks, 2).await.unwrap();

        assert_eq!(results, (0..6usize).collect::<Vec<_>>(), "{:?}", kind);
        assert_eq!(timeline.peak_concurrency(), 2, "{:?}", kind);
        assert_elapsed_between(start, 300, 400, &format!("{:?} parallel_limit", kind));
    }
}

#[tokio::test(start_paused = true)]
async fn test_limit_above_task_count_is_plain_parallel() {
    for (kind, flow) in flows() {
        let timeline = Timeline::new();
        let start = Instant::now();

        flow.run(three_slow_tasks(&timeline), Mode::Limited(10))
            .await
            .unwrap();

        assert_eq!(timeline.started_before_first_finish(), 3, "{:?}", kind);
        assert_elapsed_between(start, 100, 200, &format!("{:?} limited(10)", kind));
    }
}

#[tokio::test(start_paused = true)]
async fn test_zero_limit_runs_one_at_a_time() {
    for (kind, flow) in flows() {
        let timeline = Timeline::new();

        flow.parallel_limit(three_slow_tasks(&timeline), 0)
            .await
            .unwrap();

        assert_eq!(timeline.peak_concurrency(), 1, "{:?}", kind);
    }
}

#[tokio::test(start_paused = true)]
async fn test_each_limit_and_map_limit() {
    for (kind, flow) in flows() {
        let timeline = Timeline::new();
        let recorder = timeline.clone();

        let ids = flow
            .map_limit(vec![0usize, 1, 2, 3, 4], 3, move |i| {
                let recorder = recorder.clone();
                async move {
                    recorder.mark(Mark::Started(i));
                    sleep(Duration::from_millis(40)).await;
                    recorder.mark(Mark::Finished(i));
                    Ok::<_, String>(i * 10)
                }
            })
            .await
            .unwrap();

        assert_eq!(ids, vec![0, 10, 20, 30, 40], "{:?}", kind);
        assert_eq!(timeline.peak_concurrency(), 3, "{:?}", kind);

        let start = Instant::now();
        flow.each_limit(vec![1u64, 1, 1, 1], 2, |secs| async move {
            sleep(Duration::from_millis(secs * 100)).await;
            Ok::<_, String>(())
        })
        .await
        .unwrap();
        assert_elapsed_between(start, 200, 300, &format!("{:?} each_limit", kind));
    }
}
