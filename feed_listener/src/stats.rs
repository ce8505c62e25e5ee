//! Per-subject counters kept by the listener.
use std::collections::BTreeMap;

/// Totals of one subject.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubjectStats {
    /// Batches received.
    pub batches: u64,
    /// Rows across all batches.
    pub rows: u64,
    /// Datagram bytes received.
    pub bytes: u64,
}

/// Counters for everything the listener has seen.
#[derive(Debug, Default)]
pub struct FeedStats {
    subjects: BTreeMap<String, SubjectStats>,
    rejected: u64,
}

impl FeedStats {
    /// Count a decoded batch and return the updated subject totals.
    pub fn record(&mut self, subject: &str, rows: usize, bytes: usize) -> SubjectStats {
        let stats = self.subjects.entry(subject.to_string()).or_default();
        stats.batches += 1;
        stats.rows += rows as u64;
        stats.bytes += bytes as u64;
        *stats
    }

    /// Count a datagram that could not be decoded.
    pub fn reject(&mut self) {
        self.rejected += 1;
    }

    /// Datagrams that could not be decoded.
    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    /// Subjects in name order with their totals.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SubjectStats)> {
        self.subjects.iter().map(|(name, stats)| (name.as_str(), stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_batches_per_subject() {
        let mut stats = FeedStats::default();
        stats.record("meters", 3, 120);
        let latest = stats.record("meters", 7, 300);
        stats.record("stock_values", 5, 900);

        assert_eq!(latest, SubjectStats { batches: 2, rows: 10, bytes: 420 });
        let totals: Vec<(&str, u64)> = stats.iter().map(|(name, s)| (name, s.rows)).collect();
        assert_eq!(totals, [("meters", 10), ("stock_values", 5)]);
    }

    #[test]
    fn rejected_datagrams_are_counted_separately() {
        let mut stats = FeedStats::default();
        stats.reject();
        stats.reject();
        assert_eq!(stats.rejected(), 2);
        assert_eq!(stats.iter().count(), 0);
    }
}
