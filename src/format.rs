// Display formatting for computed statistics

/// Round to `decimals` places. Non-finite input reads as 0.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Seconds as `M:SS`. The total is rounded before splitting so `59.6` gives
/// `1:00`, never `0:60`.
pub fn clock(seconds: f64) -> String {
    let total = round_to(seconds, 0).max(0.0) as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Percentage of `part` in `total`, 0 when the total is 0
pub fn percent(part: f64, total: f64) -> f64 {
    if total == 0.0 {
        0.0
    } else {
        part / total * 100.0
    }
}

/// `part / total` as a percentage label, e.g. `"41.7%"`
pub fn percent_label(part: f64, total: f64, decimals: u32) -> String {
    format!(
        "{:.*}%",
        decimals as usize,
        round_to(percent(part, total), decimals)
    )
}
