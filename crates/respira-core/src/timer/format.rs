/// `MM:SS`, both fields zero-padded. Minutes are not wrapped at an hour.
pub fn format_remaining(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Elapsed fraction of a session in `[0, 1]`; `0` for an empty total.
pub fn progress_ratio(total_secs: u64, remaining_secs: u64) -> f64 {
    if total_secs == 0 {
        return 0.0;
    }
    let elapsed = total_secs.saturating_sub(remaining_secs);
    elapsed as f64 / total_secs as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_remaining(0), "00:00");
        assert_eq!(format_remaining(5), "00:05");
        assert_eq!(format_remaining(65), "01:05");
        assert_eq!(format_remaining(3599), "59:59");
        assert_eq!(format_remaining(3600), "60:00");
    }

    #[test]
    fn ratio_endpoints() {
        assert_eq!(progress_ratio(300, 300), 0.0);
        assert_eq!(progress_ratio(300, 0), 1.0);
        assert_eq!(progress_ratio(300, 150), 0.5);
        assert_eq!(progress_ratio(0, 0), 0.0);
    }

    #[test]
    fn ratio_clamps_when_remaining_exceeds_total() {
        assert_eq!(progress_ratio(10, 20), 0.0);
    }
}
