// Thu Oct 15 2026 - Alex

pub mod logging;

pub use logging::{LoggingUtils, ScopedTimer};

use std::time::{Duration, Instant};

pub fn measure_time<F, T>(f: F) -> (T, Duration)
where
    F: FnOnce() -> T,
{
    let start = Instant::now();
    let result = f();
    (result, start.elapsed())
}

pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs_f64();

    if total_secs < 0.001 {
        format!("{}µs", duration.as_micros())
    } else if total_secs < 1.0 {
        format!("{:.2}ms", total_secs * 1000.0)
    } else {
        format!("{:.2}s", total_secs)
    }
}

/// `0x` offset padded to the width needed for `max`.
pub fn format_offset(offset: usize, max: usize) -> String {
    let width = format!("{:x}", max.max(1)).len();
    format!("0x{:0width$x}", offset, width = width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_offset() {
        assert_eq!(format_offset(8, 0xa8), "0x08");
        assert_eq!(format_offset(0, 4), "0x0");
        assert_eq!(format_offset(0x98, 0x100), "0x098");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_micros(5)), "5µs");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
    }
}
