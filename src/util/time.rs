/// Seconds since the UNIX epoch, as a float.
#[cfg(not(target_arch = "wasm32"))]
pub fn current_time_secs() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}

/// Seconds since the UNIX epoch, as a float.
#[cfg(target_arch = "wasm32")]
pub fn current_time_secs() -> f64 {
    let now_ms = web_sys::window()
        .and_then(|window| window.performance())
        .map(|perf| perf.time_origin() + perf.now())
        .unwrap_or(0.0);
    now_ms / 1000.0
}

/// Whole seconds since the UNIX epoch, used for journal timestamps
pub fn timestamp_secs() -> u64 {
    current_time_secs() as u64
}

pub const SECS_PER_DAY: u64 = 86_400;

/// Day number (days since the epoch, UTC) of a timestamp
pub fn day_index(timestamp: u64) -> u64 {
    timestamp / SECS_PER_DAY
}

/// Format a duration as `MM:SS`, or `H:MM:SS` once it passes an hour
pub fn format_duration(secs: f64) -> String {
    let total = secs.max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_short_and_long_durations() {
        assert_eq!(format_duration(0.0), "00:00");
        assert_eq!(format_duration(65.4), "01:05");
        assert_eq!(format_duration(3725.0), "1:02:05");
        assert_eq!(format_duration(-3.0), "00:00");
    }

    #[test]
    fn day_index_buckets_by_utc_day() {
        assert_eq!(day_index(0), 0);
        assert_eq!(day_index(SECS_PER_DAY - 1), 0);
        assert_eq!(day_index(SECS_PER_DAY), 1);
    }
}
