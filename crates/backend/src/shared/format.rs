use std::time::Duration;

/// Formats a count with thousands separators
///
/// # Examples
/// ```
/// use vendor_summary::shared::format::format_number;
/// assert_eq!(format_number(1234567), "1,234,567");
/// assert_eq!(format_number(42), "42");
/// ```
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

/// Formats a stage duration for the log: `"850ms"`, `"12.305s"` or `"3m 07.250s"`
pub fn format_elapsed(elapsed: Duration) -> String {
    let millis = elapsed.as_millis();
    if millis < 1_000 {
        return format!("{}ms", millis);
    }
    let minutes = millis / 60_000;
    let seconds = (millis % 60_000) as f64 / 1_000.0;
    if minutes == 0 {
        format!("{:.3}s", seconds)
    } else {
        format!("{}m {:06.3}s", minutes, seconds)
    }
}
