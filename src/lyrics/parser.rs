//! LRC format parser
//!
//! Parses synchronized lyrics in LRC format:
//! [mm:ss.xx] Lyrics line here
//!
//! Example:
//! [00:12.34] Hello world
//! [00:15.00] Another line
//!
//! Only lines that start with a `[mm:ss.xx]` or `[mm:ss.xxx]` stamp are kept.
//! Metadata tags (`[ti:...]`), blank lines and anything else are skipped.

use once_cell::sync::Lazy;
use regex::Regex;

use super::store::TimedLyricMap;

static TIMED_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[([0-9]{2}):([0-9]{2}\.[0-9]{2,3})\](.*)$").expect("valid LRC line regex")
});

/// Parse LRC content into a timed map.
pub fn parse_lrc(content: &str) -> TimedLyricMap {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let mut skipped = 0usize;
    let pairs: Vec<(f64, String)> = content
        .lines()
        .filter_map(|line| {
            let parsed = parse_timed_line(line);
            if parsed.is_none() {
                skipped += 1;
            }
            parsed
        })
        .collect();

    tracing::trace!(kept = pairs.len(), skipped, "parsed lrc");
    TimedLyricMap::from_pairs(pairs)
}

/// Parse a single line like `[01:03.25]Lyrics`.
pub fn parse_timed_line(line: &str) -> Option<(f64, String)> {
    let caps = TIMED_LINE.captures(line.trim_end())?;
    let minutes: f64 = caps[1].parse().ok()?;
    let seconds: f64 = caps[2].parse().ok()?;
    Some((minutes * 60.0 + seconds, caps[3].trim().to_string()))
}

/// Lay out plain text lines at a fixed interval starting from zero.
///
/// Blank lines are dropped; the rest are trimmed and kept in source order.
pub fn space_plain_lines(text: &str, spacing_secs: f64) -> TimedLyricMap {
    TimedLyricMap::from_pairs(
        text.lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .enumerate()
            .map(|(i, l)| (i as f64 * spacing_secs, l.to_string())),
    )
}

/// Format seconds as an LRC stamp, e.g. `[01:03.25]`.
pub fn format_timestamp(seconds: f64) -> String {
    let centis = (seconds.max(0.0) * 100.0).round() as u64;
    let min = centis / 6000;
    let sec = (centis % 6000) / 100;
    let cs = centis % 100;
    format!("[{:02}:{:02}.{:02}]", min, sec, cs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timed_line() {
        assert_eq!(parse_timed_line("[00:12.34]Hi"), Some((12.34, "Hi".to_string())));
        assert_eq!(parse_timed_line("[01:30.500] x "), Some((90.5, "x".to_string())));
        assert_eq!(parse_timed_line("[00:05.00]"), Some((5.0, String::new())));
        assert_eq!(parse_timed_line("[0:05.00]short minutes"), None);
        assert_eq!(parse_timed_line("[00:05]no fraction"), None);
        assert_eq!(parse_timed_line("[00:05.1]one digit"), None);
        assert_eq!(parse_timed_line("[ti:Title]"), None);
        assert_eq!(parse_timed_line("plain"), None);
    }

    #[test]
    fn test_only_ascii_digits_in_stamp() {
        // Arabic-Indic and fullwidth digits are not timestamps
        assert_eq!(parse_timed_line("[\u{0660}\u{0661}:\u{0662}\u{0663}.\u{0664}\u{0665}]x"), None);
        assert_eq!(parse_timed_line("[\u{FF10}\u{FF11}:02.00]x"), None);
        assert_eq!(parse_lrc("[\u{0660}\u{0661}:02.00]x\n[00:03.00]y").len(), 1);
    }

    #[test]
    fn test_parse_mixed_lines() {
        let lrc = "[00:02.25]A\nnot a lyric\n[01:03.00]B";
        let map = parse_lrc(lrc);
        let pairs: Vec<(f64, &str)> = map
            .entries()
            .iter()
            .map(|l| (l.timestamp, l.text.as_str()))
            .collect();
        assert_eq!(pairs, vec![(2.25, "A"), (63.0, "B")]);
    }

    #[test]
    fn test_parse_lrc() {
        let lrc = "\u{feff}[ti:Test Song]\r\n[ar:Test Artist]\r\n[00:15.00]Second line\r\n[00:12.34]First line\r\n\r\n";
        let map = parse_lrc(lrc);
        assert_eq!(map.len(), 2);
        assert_eq!(map.entries()[0].timestamp, 12.34);
        assert_eq!(map.entries()[0].text, "First line");
        assert_eq!(map.entries()[1].text, "Second line");
    }

    #[test]
    fn test_size_matches_timed_line_count() {
        let lrc = "[00:01.00]a\n[00:03.000]b\ngarbage\n[00:02.50]c\n[xx:00.00]d";
        let expected = lrc.lines().filter(|l| parse_timed_line(l).is_some()).count();
        let map = parse_lrc(lrc);
        assert_eq!(map.len(), expected);
        assert!(map
            .entries()
            .windows(2)
            .all(|w| w[0].timestamp < w[1].timestamp));
    }

    #[test]
    fn test_space_plain_lines() {
        let map = space_plain_lines("first\n\n  second \n\t\nthird", 4.2);
        let ts: Vec<f64> = map.entries().iter().map(|l| l.timestamp).collect();
        assert_eq!(ts, vec![0.0, 4.2, 8.4]);
        assert_eq!(map.entries()[1].text, "second");
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(63.25), "[01:03.25]");
        assert_eq!(format_timestamp(0.0), "[00:00.00]");
    }
}
