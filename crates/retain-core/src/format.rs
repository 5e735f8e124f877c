//! Interval display
//!
//! Short labels for the rating buttons ("Again: 1m / Good: 3d").

/// Format an interval given in fractional days
///
/// - under an hour: minutes, at least `1m`
/// - under a day: hours
/// - under 30 days: days
/// - under a year: months, one decimal below 10
/// - otherwise years, one decimal below 10
pub fn format_interval(days: f64) -> String {
    if days < 1.0 {
        let minutes = (days * 24.0 * 60.0).round();
        if minutes < 60.0 {
            return format!("{}m", minutes.max(1.0) as i64);
        }
        let hours = (minutes / 60.0).round();
        return format!("{}h", hours as i64);
    }
    if days < 30.0 {
        return format!("{}d", days.round() as i64);
    }
    if days < 365.0 {
        let months = days / 30.0;
        return if months < 10.0 {
            format!("{:.1}mo", months)
        } else {
            format!("{}mo", months.round() as i64)
        };
    }
    let years = days / 365.0;
    if years < 10.0 {
        format!("{:.1}y", years)
    } else {
        format!("{}y", years.round() as i64)
    }
}

/// Format a [`chrono::Duration`]
pub fn format_duration(interval: chrono::Duration) -> String {
    format_interval(interval.num_seconds() as f64 / 86_400.0)
}
