use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::TableError;
use crate::game::{StateKey, COLS};

/// A (canonical state, column) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionKey {
    pub state: StateKey,
    pub action: usize,
}

impl ActionKey {
    pub fn new(state: StateKey, action: usize) -> Self {
        ActionKey { state, action }
    }
}

impl fmt::Display for ActionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.state, self.action)
    }
}

impl FromStr for ActionKey {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (state, action) = s
            .rsplit_once(':')
            .ok_or_else(|| TableError::BadAction(s.to_string()))?;
        let action: usize = action
            .parse()
            .map_err(|_| TableError::BadAction(s.to_string()))?;
        if action >= COLS {
            return Err(TableError::BadAction(s.to_string()));
        }
        Ok(ActionKey {
            state: state.parse()?,
            action,
        })
    }
}

/// Temporal-difference step. `None` when both reward and future are zero,
/// so untouched entries stay exactly zero.
fn td_step(old: f64, reward: f64, future: f64, alpha: f64) -> Option<f64> {
    if reward == 0.0 && future == 0.0 {
        return None;
    }
    Some(old + alpha * (reward + future - old))
}

/// Read/write access to learned values, as needed by the lookahead.
pub trait ValueStore {
    /// Stored value, zero when absent.
    fn value(&self, state: &StateKey, action: usize) -> f64;

    /// Apply a TD update and return the change in the stored value.
    fn record(
        &mut self,
        state: &StateKey,
        action: usize,
        reward: f64,
        future: f64,
        alpha: f64,
    ) -> f64;
}

/// Sparse map from (state, action) to learned value.
#[derive(Debug, Clone, Default)]
pub struct ValueTable {
    values: HashMap<ActionKey, f64>,
    updates: u64,
}

impl ValueTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of non-trivial updates applied since creation.
    pub fn updates(&self) -> u64 {
        self.updates
    }

    pub fn get(&self, state: &StateKey, action: usize) -> f64 {
        self.values
            .get(&ActionKey::new(*state, action))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ActionKey, f64)> + '_ {
        self.values.iter().map(|(k, &v)| (k, v))
    }

    /// `new = old + alpha * (reward + future - old)`, skipped when both
    /// reward and future are zero. Returns `new - old`.
    pub fn update(
        &mut self,
        state: &StateKey,
        action: usize,
        reward: f64,
        future: f64,
        alpha: f64,
    ) -> f64 {
        let key = ActionKey::new(*state, action);
        let old = self.values.get(&key).copied().unwrap_or(0.0);
        match td_step(old, reward, future, alpha) {
            Some(new) => {
                self.values.insert(key, new);
                self.updates += 1;
                new - old
            }
            None => 0.0,
        }
    }

    /// Flat key/value document, sorted by key text.
    pub fn to_document(&self) -> BTreeMap<String, f64> {
        self.values
            .iter()
            .map(|(k, &v)| (k.to_string(), v))
            .collect()
    }

    pub fn from_document(document: &BTreeMap<String, f64>) -> Result<Self, TableError> {
        let values = document
            .iter()
            .map(|(k, &v)| Ok((k.parse::<ActionKey>()?, v)))
            .collect::<Result<HashMap<_, _>, TableError>>()?;
        Ok(ValueTable { values, updates: 0 })
    }

    pub fn save_json(&self, path: &Path) -> Result<(), TableError> {
        let json = serde_json::to_string_pretty(&self.to_document())?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn load_json(path: &Path) -> Result<Self, TableError> {
        let json = fs::read_to_string(path)?;
        let document: BTreeMap<String, f64> = serde_json::from_str(&json)?;
        Self::from_document(&document)
    }
}

impl ValueStore for ValueTable {
    fn value(&self, state: &StateKey, action: usize) -> f64 {
        self.get(state, action)
    }

    fn record(
        &mut self,
        state: &StateKey,
        action: usize,
        reward: f64,
        future: f64,
        alpha: f64,
    ) -> f64 {
        self.update(state, action, reward, future, alpha)
    }
}

/// Read-only view of a table with a private overlay for speculative
/// lookahead writes. The underlying table is never modified.
pub struct ScratchTable<'a> {
    base: &'a ValueTable,
    overlay: HashMap<ActionKey, f64>,
}

impl<'a> ScratchTable<'a> {
    pub fn new(base: &'a ValueTable) -> Self {
        ScratchTable {
            base,
            overlay: HashMap::new(),
        }
    }

    pub fn scratch_len(&self) -> usize {
        self.overlay.len()
    }
}

impl ValueStore for ScratchTable<'_> {
    fn value(&self, state: &StateKey, action: usize) -> f64 {
        match self.overlay.get(&ActionKey::new(*state, action)) {
            Some(&v) => v,
            None => self.base.get(state, action),
        }
    }

    fn record(
        &mut self,
        state: &StateKey,
        action: usize,
        reward: f64,
        future: f64,
        alpha: f64,
    ) -> f64 {
        let old = self.value(state, action);
        match td_step(old, reward, future, alpha) {
            Some(new) => {
                self.overlay.insert(ActionKey::new(*state, action), new);
                new - old
            }
            None => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameState;

    fn key_after(moves: &[usize]) -> StateKey {
        let mut state = GameState::initial();
        for &col in moves {
            state.apply(col).unwrap();
        }
        state.key()
    }

    #[test]
    fn test_absent_entries_are_zero() {
        let table = ValueTable::new();
        assert_eq!(table.get(&key_after(&[]), 3), 0.0);
        assert!(table.is_empty());
    }

    #[test]
    fn test_zero_update_is_noop() {
        let mut table = ValueTable::new();
        let delta = table.update(&key_after(&[]), 3, 0.0, 0.0, 0.5);
        assert_eq!(delta, 0.0);
        assert!(table.is_empty());
        assert_eq!(table.updates(), 0);
    }

    #[test]
    fn test_td_update() {
        let mut table = ValueTable::new();
        let key = key_after(&[1]);

        table.update(&key, 2, 1.0, 0.0, 0.5);
        assert!((table.get(&key, 2) - 0.5).abs() < 1e-12);

        // 0.5 + 0.5 * (1.0 - 0.25 - 0.5)
        let delta = table.update(&key, 2, 1.0, -0.25, 0.5);
        assert!((table.get(&key, 2) - 0.625).abs() < 1e-12);
        assert!((delta - 0.125).abs() < 1e-12);
        assert_eq!(table.len(), 1);
        assert_eq!(table.updates(), 2);
    }

    #[test]
    fn test_action_key_text() {
        let key = ActionKey::new(key_after(&[0, 1, 1]), 4);
        let text = key.to_string();
        assert_eq!(text, "0|01|||||:4");
        assert_eq!(text.parse::<ActionKey>().unwrap(), key);
    }

    #[test]
    fn test_action_key_rejects_malformed() {
        assert!(matches!(
            "||||||".parse::<ActionKey>(),
            Err(TableError::BadAction(_))
        ));
        assert!(matches!(
            "||||||:9".parse::<ActionKey>(),
            Err(TableError::BadAction(_))
        ));
        assert!(matches!(
            "||||||:x".parse::<ActionKey>(),
            Err(TableError::BadAction(_))
        ));
        assert!(matches!(
            "|||:1".parse::<ActionKey>(),
            Err(TableError::ColumnCount(4))
        ));
    }

    #[test]
    fn test_document_roundtrip() {
        let mut table = ValueTable::new();
        table.update(&key_after(&[]), 3, 1.0, 0.0, 0.1);
        table.update(&key_after(&[3]), 2, -1.0, 0.0, 0.1);
        table.update(&key_after(&[3, 3]), 6, 1.0, -0.3, 0.1);

        let document = table.to_document();
        let keys: Vec<&String> = document.keys().collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);

        let restored = ValueTable::from_document(&document).unwrap();
        assert_eq!(restored.len(), table.len());
        for (key, value) in table.iter() {
            assert!((restored.get(&key.state, key.action) - value).abs() < 1e-12);
        }
    }

    #[test]
    fn test_json_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.json");
        let mut table = ValueTable::new();
        table.update(&key_after(&[4, 4]), 0, 1.0, 0.0, 0.3);

        table.save_json(&path).unwrap();
        let restored = ValueTable::load_json(&path).unwrap();
        assert!((restored.get(&key_after(&[4, 4]), 0) - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_scratch_leaves_base_untouched() {
        let mut base = ValueTable::new();
        let key = key_after(&[2]);
        base.update(&key, 1, 1.0, 0.0, 0.5);

        let mut scratch = ScratchTable::new(&base);
        scratch.record(&key, 1, 1.0, 0.0, 0.5);
        scratch.record(&key, 5, -1.0, 0.0, 0.5);

        assert!((scratch.value(&key, 1) - 0.75).abs() < 1e-12);
        assert!((scratch.value(&key, 5) + 0.5).abs() < 1e-12);
        assert_eq!(scratch.scratch_len(), 2);
        assert!((base.get(&key, 1) - 0.5).abs() < 1e-12);
        assert_eq!(base.get(&key, 5), 0.0);
    }
}
