//! Sparse Q-tables with lazy initialization

use std::{collections::HashMap, hash::Hash};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::pursuit::{Action, JointAction, State};

/// Key of a single hunter's table: state, own action, observed partner action.
///
/// The partner action is `None` for learners that ignore their partner.
pub type AgentKey = (State, Action, Option<Action>);

/// Key of the centralized table: state and joint action.
pub type JointKey = (State, JointAction);

/// Q-table mapping keys to Q-values
///
/// Reading a key through [`QTable::get`] inserts it with the initial value,
/// so the table size is the number of distinct keys touched so far. Entries
/// are never evicted.
#[derive(Debug, Clone, PartialEq)]
pub struct QTable<K: Eq + Hash> {
    /// Q-values keyed by (state, action...) tuples
    q_values: HashMap<K, f64>,
    /// Initial Q-value for unseen keys
    q_init: f64,
}

impl<K: Eq + Hash + Clone> QTable<K> {
    /// Create an empty Q-table
    pub fn new(q_init: f64) -> Self {
        Self {
            q_values: HashMap::new(),
            q_init,
        }
    }

    /// Get the Q-value for a key, creating the entry on first visit
    pub fn get(&mut self, key: &K) -> f64 {
        if let Some(value) = self.q_values.get(key) {
            return *value;
        }
        self.q_values.insert(key.clone(), self.q_init);
        self.q_init
    }

    /// Get the Q-value for a key without recording the visit
    pub fn peek(&self, key: &K) -> f64 {
        self.q_values.get(key).copied().unwrap_or(self.q_init)
    }

    /// Set the Q-value for a key
    pub fn set(&mut self, key: K, value: f64) {
        self.q_values.insert(key, value);
    }

    pub fn contains(&self, key: &K) -> bool {
        self.q_values.contains_key(key)
    }

    pub fn q_init(&self) -> f64 {
        self.q_init
    }

    /// Get total number of Q-values stored
    pub fn size(&self) -> usize {
        self.q_values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &f64)> {
        self.q_values.iter()
    }
}

/// Tables are stored as a list of entries so that structured keys survive
/// formats whose maps only accept string keys.
#[derive(Serialize, Deserialize)]
struct StoredTable<K> {
    q_init: f64,
    entries: Vec<(K, f64)>,
}

impl<K> Serialize for QTable<K>
where
    K: Eq + Hash + Clone + Serialize,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        StoredTable {
            q_init: self.q_init,
            entries: self
                .q_values
                .iter()
                .map(|(key, value)| (key.clone(), *value))
                .collect(),
        }
        .serialize(serializer)
    }
}

impl<'de, K> Deserialize<'de> for QTable<K>
where
    K: Eq + Hash + Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let stored = StoredTable::<K>::deserialize(deserializer)?;
        Ok(Self {
            q_values: stored.entries.into_iter().collect(),
            q_init: stored.q_init,
        })
    }
}
