//! Scenario: running tasks in parallel

use crate::helpers::*;
use flowsync::{task, FlowError, Task};
use tokio::time::Instant;

#[tokio::test(start_paused = true)]
async fn test_parallel_starts_every_task_before_any_finishes() {
    for (kind, flow) in flows() {
        let timeline = Timeline::new();
        let start = Instant::now();

        let results = flow.parallel(three_slow_tasks(&timeline)).await.unwrap();

        assert_eq!(results, vec![0, 1, 2], "{:?}", kind);
        assert_eq!(timeline.started_before_first_finish(), 3, "{:?}", kind);
        assert_elapsed_between(start, 100, 200, &format!("{:?} parallel", kind));
    }
}

#[tokio::test(start_paused = true)]
async fn test_parallel_keeps_task_order_not_finish_order() {
    for (kind, flow) in flows() {
        let timeline = Timeline::new();
        let tasks = vec![
            timed_task(&timeline, 0, 300),
            timed_task(&timeline, 1, 100),
            timed_task(&timeline, 2, 200),
        ];

        let results = flow.parallel(tasks).await.unwrap();

        assert_eq!(results, vec![0, 1, 2], "{:?}", kind);
        assert_eq!(
            timeline.marks().last(),
            Some(&Mark::Finished(0)),
            "{:?}: slowest task finishes last",
            kind
        );
    }
}

#[tokio::test(start_paused = true)]
async fn test_parallel_reports_first_error_without_waiting_for_the_rest() {
    for (kind, flow) in flows() {
        let timeline = Timeline::new();
        let start = Instant::now();
        let tasks = vec![
            timed_task(&timeline, 0, 500),
            failing_task(&timeline, 1, 50, "disk full"),
            timed_task(&timeline, 2, 500),
        ];

        let err = flow.parallel(tasks).await.unwrap_err();

        assert_eq!(
            err,
            FlowError::Task {
                index: 1,
                error: "disk full".to_string()
            },
            "{:?}",
            kind
        );
        assert_elapsed_between(start, 50, 150, &format!("{:?} parallel error", kind));
    }
}

#[tokio::test]
async fn test_parallel_with_no_tasks_completes_empty() {
    for (kind, flow) in flows() {
        let tasks: Vec<Task<u8, String>> = Vec::new();
        assert_eq!(flow.parallel(tasks).await, Ok(vec![]), "{:?}", kind);
    }
}

#[tokio::test]
async fn test_free_function_uses_default_backend() {
    let results = flowsync::parallel(vec![
        task(async { Ok::<_, String>("one") }),
        task(async { Ok("two") }),
    ])
    .await
    .unwrap();

    assert_eq!(results, vec!["one", "two"]);
}
