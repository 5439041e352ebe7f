use codesearch_protocol::JobStatus;
use std::time::Duration;
use time::OffsetDateTime;

/// Values derived from a [`JobStatus`] at render time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JobMetrics {
    pub elapsed: Duration,
    pub estimated_remaining: Option<Duration>,
}

impl JobMetrics {
    /// `now` is unix seconds; finished jobs measure up to `end_time`.
    pub fn compute(status: &JobStatus, now: f64) -> Self {
        let elapsed_secs = match status.start_time {
            Some(start) => (status.end_time.unwrap_or(now) - start).max(0.0),
            None => 0.0,
        };
        Self {
            elapsed: Duration::from_secs_f64(elapsed_secs),
            estimated_remaining: estimate_remaining(status, elapsed_secs),
        }
    }

    pub fn now(status: &JobStatus) -> Self {
        Self::compute(status, unix_now())
    }

    pub fn elapsed_label(&self) -> String {
        format_elapsed(self.elapsed)
    }

    pub fn remaining_label(&self) -> Option<String> {
        self.estimated_remaining.map(format_elapsed)
    }
}

fn estimate_remaining(status: &JobStatus, elapsed_secs: f64) -> Option<Duration> {
    let total = status.total?;
    let processed = status.processed.filter(|processed| *processed > 0)?;
    if status.progress >= 100.0 {
        return None;
    }
    let rate = elapsed_secs / processed as f64;
    let remaining = rate * (total as f64 - processed as f64);
    if remaining <= 0.0 || !remaining.is_finite() {
        return None;
    }
    Some(Duration::from_secs_f64(remaining))
}

/// `"Xm Ys"` once a minute has passed, otherwise `"Ys"`.
pub fn format_elapsed(duration: Duration) -> String {
    let secs = duration.as_secs();
    let minutes = secs / 60;
    let seconds = secs % 60;
    if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}

pub fn unix_now() -> f64 {
    OffsetDateTime::now_utc().unix_timestamp_nanos() as f64 / 1_000_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use codesearch_protocol::JobState;
    use pretty_assertions::assert_eq;

    fn running(start: f64, total: Option<u64>, processed: Option<u64>, progress: f64) -> JobStatus {
        JobStatus {
            state: JobState::Running,
            progress,
            start_time: Some(start),
            total,
            processed,
            ..JobStatus::default()
        }
    }

    #[test]
    fn remaining_scales_observed_rate() {
        let metrics = JobMetrics::compute(&running(1000.0, Some(100), Some(25), 25.0), 1050.0);
        assert_eq!(metrics.elapsed, Duration::from_secs(50));
        assert_eq!(metrics.estimated_remaining, Some(Duration::from_secs(150)));
        assert_eq!(metrics.remaining_label().as_deref(), Some("2m 30s"));
    }

    #[test]
    fn remaining_needs_progress_data() {
        let none_processed = JobMetrics::compute(&running(0.0, Some(100), Some(0), 0.0), 10.0);
        assert_eq!(none_processed.estimated_remaining, None);
        let no_total = JobMetrics::compute(&running(0.0, None, Some(5), 5.0), 10.0);
        assert_eq!(no_total.estimated_remaining, None);
        let finished = JobMetrics::compute(&running(0.0, Some(10), Some(10), 100.0), 10.0);
        assert_eq!(finished.estimated_remaining, None);
        let overshoot = JobMetrics::compute(&running(0.0, Some(10), Some(12), 90.0), 10.0);
        assert_eq!(overshoot.estimated_remaining, None);
    }

    #[test]
    fn elapsed_stops_at_end_time() {
        let status = JobStatus {
            state: JobState::Completed,
            start_time: Some(100.0),
            end_time: Some(225.9),
            ..JobStatus::default()
        };
        let metrics = JobMetrics::compute(&status, 10_000.0);
        assert_eq!(metrics.elapsed_label(), "2m 5s");
    }

    #[test]
    fn elapsed_without_start_is_zero() {
        let metrics = JobMetrics::compute(&JobStatus::idle(), 500.0);
        assert_eq!(metrics.elapsed_label(), "0s");
        assert_eq!(format_elapsed(Duration::from_secs(59)), "59s");
    }
}
