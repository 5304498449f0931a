//! Domain id generation
//!
//! Ids follow the format `{prefix}_{timestamp_micros:016x}_{seq:08x}`:
//! sortable by creation time, unique within a process via the atomic
//! counter, and safe to embed in record keys.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

/// Monotonic id generator shared by a service
pub struct IdGenerator {
    sequence: AtomicU64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self {
            sequence: AtomicU64::new(0),
        }
    }

    /// Generate the next id with the given prefix
    pub fn next(&self, prefix: &str) -> String {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst);
        let timestamp = Utc::now().timestamp_micros();
        format!("{}_{:016x}_{:08x}", prefix, timestamp, seq)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique_and_prefixed() {
        let ids = IdGenerator::new();
        let a = ids.next("user");
        let b = ids.next("user");
        assert!(a.starts_with("user_"));
        assert!(b.starts_with("user_"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_id_format() {
        let ids = IdGenerator::new();
        let id = ids.next("ledger");
        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[1].len(), 16);
        assert_eq!(parts[2].len(), 8);
    }
}
