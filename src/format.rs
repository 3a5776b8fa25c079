use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const SECONDS_PER_HOUR: u64 = 3600;
const SECONDS_PER_MINUTE: u64 = 60;

/// Formats a seconds count as `H:MM:SS`: hours unpadded and variable-width,
/// minutes and seconds zero-padded to two digits.
pub fn elapsed_time(seconds: u64) -> String {
    let hours = seconds / SECONDS_PER_HOUR;
    let minutes = (seconds % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    let seconds = seconds % SECONDS_PER_MINUTE;
    format!("{hours}:{minutes:02}:{seconds:02}")
}

pub fn truncate_unicode(s: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width.saturating_sub(1) {
            result.push('\u{2026}');
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn elapsed_time_examples() {
        assert_eq!(elapsed_time(0), "0:00:00");
        assert_eq!(elapsed_time(59), "0:00:59");
        assert_eq!(elapsed_time(3600), "1:00:00");
        assert_eq!(elapsed_time(3661), "1:01:01");
        assert_eq!(elapsed_time(90_061), "25:01:01");
    }

    #[test]
    fn truncate_leaves_short_strings_alone() {
        assert_eq!(truncate_unicode("bash", 10), "bash");
    }

    #[test]
    fn truncate_to_zero_width_yields_empty() {
        assert_eq!(truncate_unicode("firefox", 0), "");
        assert_eq!(truncate_unicode("", 0), "");
    }

    #[test]
    fn truncate_appends_ellipsis() {
        let out = truncate_unicode("/usr/lib/firefox/firefox --new-window", 12);
        assert!(out.ends_with('\u{2026}'));
        assert!(out.width() <= 12);
    }

    proptest! {
        #[test]
        fn elapsed_time_fields_padded_and_reversible(s in 0u64..=1_000_000) {
            let out = elapsed_time(s);
            let parts: Vec<&str> = out.split(':').collect();
            prop_assert_eq!(parts.len(), 3);
            prop_assert_eq!(parts[1].len(), 2);
            prop_assert_eq!(parts[2].len(), 2);
            let back = parts[0].parse::<u64>().unwrap() * 3600
                + parts[1].parse::<u64>().unwrap() * 60
                + parts[2].parse::<u64>().unwrap();
            prop_assert_eq!(back, s);
        }

        #[test]
        fn truncate_never_exceeds_width(s in "\\PC{0,64}", max in 0usize..40) {
            prop_assert!(truncate_unicode(&s, max).width() <= max);
        }
    }
}
