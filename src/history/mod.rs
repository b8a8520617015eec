use parking_lot::RwLock;

/// Every raw backend response seen by this process, in arrival order.
/// Append-only; nothing is ever evicted.
#[derive(Debug, Default)]
pub struct HistoryStore {
    entries: RwLock<Vec<String>>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, raw: impl Into<String>) {
        self.entries.write().push(raw.into());
    }

    pub fn responses(&self) -> Vec<String> {
        self.entries.read().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn keeps_insertion_order() {
        let h = HistoryStore::new();
        assert!(h.is_empty());
        h.record("a");
        h.record(String::from("b"));
        assert_eq!(h.responses(), vec!["a", "b"]);
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn concurrent_appends_are_not_lost() {
        let h = Arc::new(HistoryStore::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let h = h.clone();
                std::thread::spawn(move || {
                    for i in 0..100 {
                        h.record(format!("{t}-{i}"));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(h.len(), 800);
    }
}
