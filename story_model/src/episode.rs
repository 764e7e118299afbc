//! Episode identifiers.
//!
//! Episodes are referenced by loosely formatted strings (`"ep010"`, `"010"`,
//! `"10"`). Two identifiers denote the same episode when their digits parse to
//! the same number.

/// Extract the episode number from an identifier.
///
/// All non-digit characters are discarded; an identifier without digits is
/// episode 0.
pub fn episode_number(episode: &str) -> u32 {
    let digits: String = episode.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(u32::MAX)
}

/// Check whether two identifiers denote the same episode.
pub fn episodes_match(a: &str, b: &str) -> bool {
    episode_number(a) == episode_number(b)
}

/// Signed distance `to - from` in episodes.
pub fn episode_distance(from: &str, to: &str) -> i64 {
    i64::from(episode_number(to)) - i64::from(episode_number(from))
}

/// Canonical identifier for an episode number (`ep010`).
pub fn format_episode(number: u32) -> String {
    format!("ep{:03}", number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_episode_number_forms() {
        assert_eq!(episode_number("ep010"), 10);
        assert_eq!(episode_number("010"), 10);
        assert_eq!(episode_number("10"), 10);
        assert_eq!(episode_number("prologue"), 0);
        assert_eq!(episode_number(""), 0);
    }

    #[test]
    fn test_episodes_match() {
        assert!(episodes_match("ep010", "10"));
        assert!(episodes_match("episode-7", "ep007"));
        assert!(!episodes_match("ep010", "ep011"));
    }

    #[test]
    fn test_episode_distance() {
        assert_eq!(episode_distance("ep005", "ep010"), 5);
        assert_eq!(episode_distance("ep010", "ep005"), -5);
    }

    #[test]
    fn test_format_episode() {
        assert_eq!(format_episode(7), "ep007");
        assert_eq!(format_episode(123), "ep123");
        assert!(episodes_match(&format_episode(42), "42"));
    }
}
