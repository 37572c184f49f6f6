//! Load tester against local mock backends.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};

use mirror_proxy::loadtest::LoadTester;

mod common;

use common::{start_backend, Reply};

#[tokio::test]
async fn test_reports_statuses_and_slow_responses() {
    let fast = start_backend(Reply::ok("fast")).await;
    let slow = start_backend(Reply::ok("slow").delayed(Duration::from_millis(300))).await;
    let broken = start_backend(Reply::status(503, "down")).await;
    let dead = common::dead_address().await;

    let urls = vec![
        format!("{}/a", fast.url()),
        format!("{}/b", fast.url()),
        format!("{}/c", slow.url()),
        format!("{}/d", broken.url()),
        format!("http://{}/e", dead),
    ];

    let mut headers = HeaderMap::new();
    headers.insert("x-load-test", HeaderValue::from_static("1"));

    let report = LoadTester::new(2)
        .with_time_threshold(Duration::from_millis(250))
        .run(urls, headers)
        .await;

    assert_eq!(report.number_of_responses, 5);
    assert_eq!(report.statuses.get("200"), Some(&3));
    assert_eq!(report.statuses.get("503"), Some(&1));
    assert_eq!(report.statuses.get("error"), Some(&1));
    assert_eq!(report.server_errors, 1);
    assert!(report.response_times.number_over_threshold >= 1);
    assert!(report.response_times.mean.is_some());

    assert_eq!(fast.requests().len(), 2);
    for seen in fast.requests() {
        assert_eq!(seen.headers["x-load-test"], "1");
    }
}
