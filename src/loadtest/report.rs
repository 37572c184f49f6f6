//! Load test statistics.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;

/// Outcome of one load-test request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseSummary {
    pub url: String,
    pub time_secs: f64,
    /// `None` when no response was received.
    pub status: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseTimes {
    pub mean: Option<f64>,
    pub variance: Option<f64>,
    pub std_dev: Option<f64>,
    pub threshold: String,
    pub number_over_threshold: usize,
    pub pct_over_threshold: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadReport {
    pub number_of_responses: usize,
    pub response_times: ResponseTimes,
    pub statuses: BTreeMap<String, usize>,
    pub server_errors: usize,
}

/// Summarize a batch of responses against a slow-response threshold.
pub fn report_stats(responses: &[ResponseSummary], threshold: Duration) -> LoadReport {
    let count = responses.len();
    let threshold_secs = threshold.as_secs_f64();

    let number_over_threshold = responses
        .iter()
        .filter(|r| r.time_secs >= threshold_secs)
        .count();
    let pct_over_threshold = if count > 0 {
        number_over_threshold as f64 * 100.0 / count as f64
    } else {
        0.0
    };

    let mut statuses = BTreeMap::new();
    for response in responses {
        let key = response
            .status
            .map_or_else(|| "error".to_string(), |s| s.to_string());
        *statuses.entry(key).or_insert(0) += 1;
    }

    let server_errors = responses
        .iter()
        .filter(|r| matches!(r.status, Some(500..=599)))
        .count();

    let mean = (count > 0).then(|| responses.iter().map(|r| r.time_secs).sum::<f64>() / count as f64);
    let variance = mean.map(|mean| {
        responses
            .iter()
            .map(|r| (r.time_secs - mean).powi(2))
            .sum::<f64>()
            / count as f64
    });

    LoadReport {
        number_of_responses: count,
        response_times: ResponseTimes {
            mean,
            variance,
            std_dev: variance.map(f64::sqrt),
            threshold: format!("{:?}s", threshold_secs),
            number_over_threshold,
            pct_over_threshold: format!("{:.2}%", pct_over_threshold),
        },
        statuses,
        server_errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(time_secs: f64, status: Option<u16>) -> ResponseSummary {
        ResponseSummary {
            url: "http://localhost/".into(),
            time_secs,
            status,
        }
    }

    #[test]
    fn test_report_stats() {
        let responses = vec![
            summary(1.0, Some(200)),
            summary(3.0, Some(200)),
            summary(5.0, Some(503)),
            summary(7.0, None),
        ];
        let report = report_stats(&responses, Duration::from_secs(4));

        assert_eq!(report.number_of_responses, 4);
        assert_eq!(report.response_times.mean, Some(4.0));
        assert_eq!(report.response_times.variance, Some(5.0));
        assert_eq!(report.response_times.std_dev, Some(5.0f64.sqrt()));
        assert_eq!(report.response_times.threshold, "4.0s");
        assert_eq!(report.response_times.number_over_threshold, 2);
        assert_eq!(report.response_times.pct_over_threshold, "50.00%");
        assert_eq!(report.statuses.get("200"), Some(&2));
        assert_eq!(report.statuses.get("503"), Some(&1));
        assert_eq!(report.statuses.get("error"), Some(&1));
        assert_eq!(report.server_errors, 1);
    }

    #[test]
    fn test_empty_report() {
        let report = report_stats(&[], Duration::from_millis(4500));
        assert_eq!(report.number_of_responses, 0);
        assert_eq!(report.response_times.mean, None);
        assert_eq!(report.response_times.std_dev, None);
        assert_eq!(report.response_times.threshold, "4.5s");
        assert_eq!(report.response_times.pct_over_threshold, "0.00%");
        assert!(report.statuses.is_empty());
    }
}
