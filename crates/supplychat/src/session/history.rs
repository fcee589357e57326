use std::collections::VecDeque;

pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// Recent queries, newest first, bounded to `capacity`.
///
/// Duplicates are kept. Entries pushed after the initial seed stay local to
/// the session.
#[derive(Debug, Clone)]
pub struct QueryHistory {
    entries: VecDeque<String>,
    capacity: usize,
    seeded: bool,
}

impl Default for QueryHistory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl QueryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            seeded: false,
        }
    }

    /// Prepend a query, evicting the oldest entry past capacity.
    pub fn push(&mut self, query: String) {
        self.entries.push_front(query);
        self.entries.truncate(self.capacity);
    }

    /// Load the server-side history once. Later calls are ignored.
    ///
    /// Queries pushed before the seed arrived stay in front of it.
    pub fn seed(&mut self, server_history: Vec<String>) -> bool {
        if self.seeded {
            tracing::debug!("Query history already seeded, ignoring");
            return false;
        }
        self.seeded = true;
        self.entries.extend(server_history);
        self.entries.truncate(self.capacity);
        true
    }

    pub fn is_seeded(&self) -> bool {
        self.seeded
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.entries.iter()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.entries.iter().cloned().collect()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_newest_first() {
        let mut history = QueryHistory::new();
        for i in 1..=11 {
            history.push(format!("q{}", i));
        }

        assert_eq!(history.len(), 10);
        let expected: Vec<String> = (2..=11).rev().map(|i| format!("q{}", i)).collect();
        assert_eq!(history.to_vec(), expected);
    }

    #[test]
    fn test_duplicates_kept() {
        let mut history = QueryHistory::new();
        history.push("same".into());
        history.push("same".into());
        assert_eq!(history.to_vec(), vec!["same", "same"]);
    }

    #[test]
    fn test_seed_once() {
        let mut history = QueryHistory::new();
        assert!(history.seed(vec!["server 1".into(), "server 2".into()]));
        assert!(!history.seed(vec!["again".into()]));
        assert_eq!(history.to_vec(), vec!["server 1", "server 2"]);
        assert!(history.is_seeded());
    }

    #[test]
    fn test_local_entries_before_seed() {
        let mut history = QueryHistory::with_capacity(3);
        history.push("local".into());
        history.seed(vec!["s1".into(), "s2".into(), "s3".into()]);
        assert_eq!(history.to_vec(), vec!["local", "s1", "s2"]);
    }
}
