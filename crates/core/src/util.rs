use std::time::{Duration, Instant};

/// Activities faster than this are not worth a log line.
const SLOW_ACTIVITY: Duration = Duration::from_millis(1);

/// Runs `f`, logging how long `activity` took when it was not instantaneous.
pub fn timed<T>(activity: &str, f: impl FnOnce() -> T) -> T {
    let started_at = Instant::now();
    let result = f();
    let elapsed = started_at.elapsed();
    if elapsed > SLOW_ACTIVITY {
        tracing::debug!(
            activity,
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            "{} took {:.3}ms",
            activity,
            elapsed.as_secs_f64() * 1000.0
        );
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_the_closure_result() {
        assert_eq!(timed("answer", || 42), 42);
    }
}
