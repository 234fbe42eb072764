use chrono::Duration;
use regex::Regex;

/// Parses the `<integer>[m|h|d]` duration grammar (e.g. 10m, 2h, 3d).
/// Anything else is rejected so a malformed duration never reaches the
/// punishment path.
pub fn parse_duration(s: &str) -> Option<Duration> {
    let re = Regex::new(r"^(\d+)([mhd])$").unwrap();
    let cap = re.captures(s.trim())?;
    let value: i64 = cap[1].parse().ok()?;

    match &cap[2] {
        "m" => Some(Duration::minutes(value)),
        "h" => Some(Duration::hours(value)),
        "d" => Some(Duration::days(value)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("10m"), Some(Duration::seconds(600)));
        assert_eq!(parse_duration("2h"), Some(Duration::seconds(7200)));
        assert_eq!(parse_duration("3d"), Some(Duration::seconds(259200)));
        assert_eq!(parse_duration(" 1h "), Some(Duration::seconds(3600)));
    }

    #[test]
    fn test_rejects_malformed_input() {
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("10"), None);
        assert_eq!(parse_duration("h"), None);
        assert_eq!(parse_duration("10x"), None);
        assert_eq!(parse_duration("-5m"), None);
        assert_eq!(parse_duration("1h30m"), None);
    }
}
