//! Timed lyric store
//!
//! An ordered, immutable list of `(timestamp, text)` pairs. Built once per
//! song load and handed to the tracker by value.

/// A single line of lyrics with its timestamp
#[derive(Debug, Clone, PartialEq)]
pub struct TimedLine {
    /// Seconds from the start of the track
    pub timestamp: f64,
    /// The lyrics text
    pub text: String,
}

impl TimedLine {
    pub fn new(timestamp: f64, text: impl Into<String>) -> Self {
        Self {
            timestamp,
            text: text.into(),
        }
    }
}

/// Lines sorted strictly ascending by timestamp, one line per timestamp.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimedLyricMap {
    lines: Vec<TimedLine>,
}

impl TimedLyricMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw pairs in parse order.
    ///
    /// Pairs are stably sorted by timestamp; when two pairs share a timestamp
    /// the one seen last wins. Negative and non-finite timestamps are dropped.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (f64, S)>,
        S: Into<String>,
    {
        let mut raw: Vec<TimedLine> = pairs
            .into_iter()
            .filter(|(ts, _)| ts.is_finite() && *ts >= 0.0)
            .map(|(ts, text)| TimedLine::new(ts, text))
            .collect();

        raw.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));

        let mut lines: Vec<TimedLine> = Vec::with_capacity(raw.len());
        for line in raw {
            match lines.last_mut() {
                Some(prev) if prev.timestamp == line.timestamp => *prev = line,
                _ => lines.push(line),
            }
        }

        Self { lines }
    }

    pub fn entries(&self) -> &[TimedLine] {
        &self.lines
    }

    pub fn get(&self, index: usize) -> Option<&TimedLine> {
        self.lines.get(index)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Owned copy of the lines; changes to it never reach this map.
    #[cfg(test)]
    pub fn snapshot(&self) -> Vec<TimedLine> {
        self.lines.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pairs_sorts() {
        let map = TimedLyricMap::from_pairs([(10.0, "c"), (0.5, "a"), (3.0, "b")]);
        let ts: Vec<f64> = map.entries().iter().map(|l| l.timestamp).collect();
        assert_eq!(ts, vec![0.5, 3.0, 10.0]);
        assert_eq!(map.entries()[0].text, "a");
    }

    #[test]
    fn test_duplicate_timestamp_keeps_last() {
        let map = TimedLyricMap::from_pairs([(2.0, "first"), (1.0, "x"), (2.0, "second")]);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(1).unwrap().text, "second");
    }

    #[test]
    fn test_drops_invalid_timestamps() {
        let map = TimedLyricMap::from_pairs([(-1.0, "neg"), (f64::NAN, "nan"), (1.0, "ok")]);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(0).unwrap().text, "ok");
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let map = TimedLyricMap::from_pairs([(1.0, "a"), (2.0, "b")]);
        let mut copy = map.snapshot();
        copy[0].text = "changed".to_string();
        copy.clear();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(0).unwrap().text, "a");
    }

    #[test]
    fn test_empty() {
        let map = TimedLyricMap::new();
        assert!(map.is_empty());
        assert!(map.entries().is_empty());
    }
}
