//! Bounded concurrent fetch-aggregate runner
//!
//! This module is the one fan-out/fan-in primitive the harvester uses for
//! every level that fetches per-code: one fetch invocation per input code,
//! at most `max_workers` in flight at a time, results merged in completion
//! order. There is no retry, no shared state across workers, and no
//! ordering guarantee relative to the input sequence.

use crate::record::{ConceptCode, Record};
use crate::{HarvestError, Result};
use futures::stream::{self, StreamExt};
use std::future::Future;
use std::time::Duration;

/// Tuning for a fan-out run
#[derive(Debug, Clone)]
pub struct PoolOptions {
    /// Upper bound on concurrent in-flight fetches. The effective pool size
    /// is `min(len(codes), max_workers)`.
    pub max_workers: usize,

    /// Per-fetch timeout. A fetch exceeding it counts as an unexpected
    /// failure, subject to `fail_fast`.
    pub fetch_timeout: Duration,

    /// Optional wall-clock limit for the whole run
    pub run_deadline: Option<Duration>,

    /// Whether an unexpected worker failure aborts the run (true) or is
    /// degraded to a `Failed` record (false)
    pub fail_fast: bool,
}

impl PoolOptions {
    pub fn new(max_workers: usize) -> Self {
        Self {
            max_workers,
            fetch_timeout: Duration::from_secs(30),
            run_deadline: None,
            fail_fast: true,
        }
    }
}

/// Runs `fetch` once per code across a bounded worker pool and merges the
/// returned records in completion order.
///
/// Every code is fetched exactly once; duplicates are treated independently.
/// An empty code list yields an empty collection. Expected failures must be
/// encoded by `fetch` as `Failed` records; an `Err` from `fetch` (or a
/// per-fetch timeout) either aborts the run with [`HarvestError::Worker`]
/// naming the offending code, or, with `fail_fast` off, becomes a `Failed`
/// record with the error text as reason.
pub async fn fan_out<F, Fut>(
    fetch: F,
    codes: Vec<ConceptCode>,
    options: &PoolOptions,
) -> Result<Vec<Record>>
where
    F: Fn(ConceptCode) -> Fut,
    Fut: Future<Output = Result<Vec<Record>>>,
{
    if codes.is_empty() {
        return Ok(Vec::new());
    }

    let workers = options.max_workers.min(codes.len()).max(1);
    let fetch_timeout = options.fetch_timeout;
    let timeout_secs = fetch_timeout.as_secs();
    let fail_fast = options.fail_fast;

    tracing::debug!(
        "Fanning out {} codes across {} workers",
        codes.len(),
        workers
    );

    let mut completions = stream::iter(codes.into_iter().map(|code| {
        let fut = fetch(code.clone());
        async move {
            match tokio::time::timeout(fetch_timeout, fut).await {
                Ok(outcome) => (code, outcome),
                Err(_) => {
                    let timed_out = HarvestError::FetchTimeout {
                        code: code.clone(),
                        seconds: timeout_secs,
                    };
                    (code, Err(timed_out))
                }
            }
        }
    }))
    .buffer_unordered(workers);

    let drain = async move {
        let mut records = Vec::new();
        while let Some((code, outcome)) = completions.next().await {
            match outcome {
                Ok(batch) => records.extend(batch),
                Err(source) if fail_fast => {
                    return Err(HarvestError::Worker {
                        code,
                        source: Box::new(source),
                    });
                }
                Err(source) => {
                    tracing::warn!("Fetch for {} failed, recording it: {}", code, source);
                    records.push(Record::failed(code, None, source.to_string()));
                }
            }
        }
        Ok(records)
    };

    match options.run_deadline {
        Some(deadline) => match tokio::time::timeout(deadline, drain).await {
            Ok(result) => result,
            Err(_) => Err(HarvestError::DeadlineExceeded {
                seconds: deadline.as_secs(),
            }),
        },
        None => drain.await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::successful_codes;

    fn one_record_per_code(code: ConceptCode) -> Result<Vec<Record>> {
        let description = format!("desc-{}", code);
        Ok(vec![Record::concept(None, code, description)])
    }

    fn codes(raw: &[&str]) -> Vec<ConceptCode> {
        raw.iter().map(|c| ConceptCode::from(*c)).collect()
    }

    #[tokio::test]
    async fn test_result_size_for_all_worker_counts() {
        let input = codes(&["I", "II", "III", "IV", "V"]);
        for workers in 1..=input.len() {
            let records = fan_out(
                |code| async move { one_record_per_code(code) },
                input.clone(),
                &PoolOptions::new(workers),
            )
            .await
            .expect("run should succeed");
            assert_eq!(records.len(), input.len(), "workers = {}", workers);
        }
    }

    #[tokio::test]
    async fn test_record_set_independent_of_worker_count() {
        let input = codes(&["A00-A09", "B15-B19", "C00-C14", "D50-D53"]);
        let mut single = fan_out(
            |code| async move { one_record_per_code(code) },
            input.clone(),
            &PoolOptions::new(1),
        )
        .await
        .expect("single-worker run should succeed");
        let mut wide = fan_out(
            |code| async move { one_record_per_code(code) },
            input,
            &PoolOptions::new(3),
        )
        .await
        .expect("three-worker run should succeed");

        single.sort();
        wide.sort();
        assert_eq!(single, wide);
    }

    #[tokio::test]
    async fn test_concrete_three_chapter_run() {
        let records = fan_out(
            |code| async move { one_record_per_code(code) },
            codes(&["I", "II", "III"]),
            &PoolOptions::new(2),
        )
        .await
        .expect("run should succeed");

        let mut pairs: Vec<(String, String)> = records
            .iter()
            .map(|r| match r {
                Record::Concept {
                    code, description, ..
                } => (code.to_string(), description.clone()),
                Record::Failed { .. } => panic!("no failures expected"),
            })
            .collect();
        pairs.sort();
        assert_eq!(
            pairs,
            vec![
                ("I".to_string(), "desc-I".to_string()),
                ("II".to_string(), "desc-II".to_string()),
                ("III".to_string(), "desc-III".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_keys_yield_empty_run() {
        let records = fan_out(
            |code| async move { one_record_per_code(code) },
            Vec::new(),
            &PoolOptions::new(4),
        )
        .await
        .expect("empty input is not an error");
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_fail_fast_names_the_offending_code() {
        let result = fan_out(
            |code| async move {
                if code.as_str() == "II" {
                    Err(HarvestError::HtmlParse {
                        context: "block list".to_string(),
                        message: "unexpected markup".to_string(),
                    })
                } else {
                    one_record_per_code(code)
                }
            },
            codes(&["I", "II", "III"]),
            &PoolOptions::new(3),
        )
        .await;

        match result {
            Err(HarvestError::Worker { code, .. }) => assert_eq!(code.as_str(), "II"),
            other => panic!("expected Worker error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failed_record_aggregates_alongside_successes() {
        // A 404 is an expected failure: the fetch encodes it as a record,
        // so even a fail-fast run completes.
        let records = fan_out(
            |code| async move {
                if code.as_str() == "II" {
                    Ok(vec![Record::failed(code, Some(404), "Not Found")])
                } else {
                    one_record_per_code(code)
                }
            },
            codes(&["I", "II", "III"]),
            &PoolOptions::new(2),
        )
        .await
        .expect("expected failures must not abort the run");

        assert_eq!(records.len(), 3);
        assert_eq!(records.iter().filter(|r| r.is_failed()).count(), 1);
        let mut ok_codes = successful_codes(&records);
        ok_codes.sort();
        assert_eq!(ok_codes, codes(&["I", "III"]));
    }

    #[tokio::test]
    async fn test_fail_soft_degrades_errors_to_records() {
        let mut options = PoolOptions::new(2);
        options.fail_fast = false;

        let records = fan_out(
            |code| async move {
                if code.as_str() == "II" {
                    Err(HarvestError::HtmlParse {
                        context: "block list".to_string(),
                        message: "unexpected markup".to_string(),
                    })
                } else {
                    one_record_per_code(code)
                }
            },
            codes(&["I", "II", "III"]),
            &options,
        )
        .await
        .expect("fail-soft run should complete");

        assert_eq!(records.len(), 3);
        let failure = records
            .iter()
            .find(|r| r.is_failed())
            .expect("the failing code should be recorded");
        match failure {
            Record::Failed {
                parent,
                status,
                reason,
            } => {
                assert_eq!(parent.as_str(), "II");
                assert_eq!(*status, None);
                assert!(reason.contains("unexpected markup"));
            }
            Record::Concept { .. } => unreachable!(),
        }
    }

    #[tokio::test]
    async fn test_hung_fetch_times_out() {
        let mut options = PoolOptions::new(2);
        options.fetch_timeout = Duration::from_millis(50);

        let result = fan_out(
            |code| async move {
                if code.as_str() == "II" {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                }
                one_record_per_code(code)
            },
            codes(&["I", "II", "III"]),
            &options,
        )
        .await;

        match result {
            Err(HarvestError::Worker { code, source }) => {
                assert_eq!(code.as_str(), "II");
                assert!(matches!(*source, HarvestError::FetchTimeout { .. }));
            }
            other => panic!("expected Worker error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_hung_fetch_recorded_when_fail_soft() {
        let mut options = PoolOptions::new(2);
        options.fetch_timeout = Duration::from_millis(50);
        options.fail_fast = false;

        let records = fan_out(
            |code| async move {
                if code.as_str() == "II" {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                }
                one_record_per_code(code)
            },
            codes(&["I", "II", "III"]),
            &options,
        )
        .await
        .expect("fail-soft run should complete");

        assert_eq!(records.len(), 3);
        let failure = records.iter().find(|r| r.is_failed());
        match failure {
            Some(Record::Failed { parent, reason, .. }) => {
                assert_eq!(parent.as_str(), "II");
                assert!(reason.contains("timed out"));
            }
            other => panic!("expected a timeout record, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_run_deadline() {
        let mut options = PoolOptions::new(1);
        options.run_deadline = Some(Duration::from_millis(50));

        let result = fan_out(
            |code| async move {
                tokio::time::sleep(Duration::from_millis(200)).await;
                one_record_per_code(code)
            },
            codes(&["I", "II", "III"]),
            &options,
        )
        .await;

        assert!(matches!(
            result,
            Err(HarvestError::DeadlineExceeded { .. })
        ));
    }

    #[tokio::test]
    async fn test_duplicate_codes_fetched_independently() {
        let records = fan_out(
            |code| async move { one_record_per_code(code) },
            codes(&["I", "I", "I"]),
            &PoolOptions::new(2),
        )
        .await
        .expect("run should succeed");
        assert_eq!(records.len(), 3);
    }
}
