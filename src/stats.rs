//! Quality metadata reported alongside every generated map

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key/value bag of generator-specific quantities.
///
/// Shortfalls (a stalled walk, an exhausted backtrack budget) are reported
/// here rather than surfaced as errors; the grid that was produced is still
/// returned.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stats {
    entries: serde_json::Map<String, Value>,
}

impl Stats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.entries.insert(key.to_string(), value.into());
    }

    pub fn set_coord(&mut self, key: &str, coord: (usize, usize)) {
        self.entries.insert(
            key.to_string(),
            Value::from(vec![coord.0 as u64, coord.1 as u64]),
        );
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    #[must_use]
    pub fn as_f64(&self, key: &str) -> Option<f64> {
        self.entries.get(key).and_then(Value::as_f64)
    }

    #[must_use]
    pub fn as_u64(&self, key: &str) -> Option<u64> {
        self.entries.get(key).and_then(Value::as_u64)
    }

    #[must_use]
    pub fn as_str(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(Value::as_str)
    }

    #[must_use]
    pub fn as_coord(&self, key: &str) -> Option<(usize, usize)> {
        let arr = self.entries.get(key)?.as_array()?;
        match (arr.first()?.as_u64(), arr.get(1)?.as_u64()) {
            (Some(x), Some(y)) => Some((x as usize, y as usize)),
            _ => None,
        }
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_read_back() {
        let mut stats = Stats::new();
        stats.set("floor_percentage", 42.5);
        stats.set("regions", 3u64);
        stats.set("variant", "weighted");
        stats.set_coord("start", (4, 7));
        assert_eq!(stats.as_f64("floor_percentage"), Some(42.5));
        assert_eq!(stats.as_u64("regions"), Some(3));
        assert_eq!(stats.as_str("variant"), Some("weighted"));
        assert_eq!(stats.as_coord("start"), Some((4, 7)));
        assert!(!stats.contains("end"));
    }

    #[test]
    fn serializes_flat() {
        let mut stats = Stats::new();
        stats.set("seed", 1u64);
        let json = serde_json::to_string(&stats).unwrap();
        assert_eq!(json, r#"{"seed":1}"#);
    }
}
