//! Common utilities and helpers

use std::time::Duration;

pub mod logging;

/// Formatting helpers for console output
pub struct Utils;

impl Utils {
    /// Format duration for display
    pub fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;
        let milliseconds = duration.subsec_millis();

        if hours > 0 {
            format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, milliseconds)
        } else {
            format!("{:02}:{:02}.{:03}", minutes, seconds, milliseconds)
        }
    }

    /// Calculate progress percentage
    pub fn calculate_progress(current: usize, total: usize) -> f32 {
        if total == 0 {
            100.0
        } else {
            (current as f32 / total as f32) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(Utils::format_duration(Duration::from_millis(65_250)), "01:05.250");
        assert_eq!(Utils::format_duration(Duration::from_secs(3725)), "01:02:05.000");
    }

    #[test]
    fn test_calculate_progress() {
        assert_eq!(Utils::calculate_progress(1, 4), 25.0);
        assert_eq!(Utils::calculate_progress(0, 0), 100.0);
    }
}
