//! Scenario: mapping items through an async iterator

use crate::helpers::*;
use flowsync::FlowError;
use tokio::time::{sleep, Duration, Instant};

#[tokio::test(start_paused = true)]
async fn test_map_parallel_keeps_input_order() {
    for (kind, flow) in flows() {
        let start = Instant::now();

        // Later items finish first
        let doubled = flow
            .map_parallel(vec![1u64, 2, 3], |n| async move {
                sleep(Duration::from_millis(100 * (4 - n))).await;
                Ok::<_, String>(n * 2)
            })
            .await
            .unwrap();

        assert_eq!(doubled, vec![2, 4, 6], "{:?}", kind);
        assert_elapsed_between(start, 300, 400, &format!("{:?} map_parallel", kind));
    }
}

#[tokio::test(start_paused = true)]
async fn test_map_series_takes_the_sum_of_all_items() {
    for (kind, flow) in flows() {
        let start = Instant::now();

        let lengths = flow
            .map_series(vec!["a", "bb", "ccc"], |s| async move {
                sleep(Duration::from_millis(50)).await;
                Ok::<_, String>(s.len())
            })
            .await
            .unwrap();

        assert_eq!(lengths, vec![1, 2, 3], "{:?}", kind);
        assert_elapsed_between(start, 150, 200, &format!("{:?} map_series", kind));
    }
}

#[tokio::test]
async fn test_map_error_discards_partial_results() {
    for (kind, flow) in flows() {
        let result = flow
            .map_series(vec!["1", "two", "3"], |s| async move {
                s.parse::<u32>().map_err(|e| e.to_string())
            })
            .await;

        match result {
            Err(FlowError::Task { index, error }) => {
                assert_eq!(index, 1, "{:?}", kind);
                assert!(error.contains("invalid digit"), "{:?}: {}", kind, error);
            }
            other => panic!("{:?}: expected task error, got {:?}", kind, other),
        }
    }
}

#[tokio::test]
async fn test_map_free_functions() {
    let squares = flowsync::map_parallel(vec![2u32, 3], |n| async move { Ok::<_, String>(n * n) })
        .await
        .unwrap();
    assert_eq!(squares, vec![4, 9]);

    let echoed = flowsync::map_series(vec!['x', 'y'], |c| async move { Ok::<_, String>(c) })
        .await
        .unwrap();
    assert_eq!(echoed, vec!['x', 'y']);
}
