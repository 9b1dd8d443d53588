/// Format seconds as MM:SS timestamp
pub fn format_timestamp(seconds: f64) -> String {
    let mins = (seconds / 60.0) as u32;
    let secs = (seconds % 60.0) as u32;
    format!("{:02}:{:02}", mins, secs)
}

/// Format a section span as `MM:SS–MM:SS`
pub fn format_time_range(start: f64, end: f64) -> String {
    format!("{}–{}", format_timestamp(start), format_timestamp(end))
}

/// Content-store key for a frame sampled at `timestamp` in section `section`.
///
/// Two decimals keep names stable across reruns and sortable by time. The
/// section directory keeps neighbouring sections apart when a sample just
/// below one boundary rounds onto the next section's first sample.
pub fn frame_key(section: usize, timestamp: f64) -> String {
    format!("section_{:03}/frame_{:.2}.jpg", section, timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0.0), "00:00");
        assert_eq!(format_timestamp(65.4), "01:05");
        assert_eq!(format_timestamp(3725.0), "62:05");
    }

    #[test]
    fn test_format_time_range() {
        assert_eq!(format_time_range(60.0, 125.0), "01:00–02:05");
    }

    #[test]
    fn test_frame_key_uses_two_decimals() {
        assert_eq!(frame_key(0, 0.0), "section_000/frame_0.00.jpg");
        assert_eq!(frame_key(0, 90.0), "section_000/frame_90.00.jpg");
        assert_eq!(frame_key(12, 12.346), "section_012/frame_12.35.jpg");
    }

    #[test]
    fn test_frame_key_separates_sections_at_boundary() {
        // 9.999 rounds to 10.00, the first sample of the next section
        assert_ne!(frame_key(0, 9.999), frame_key(1, 10.0));
    }
}
