use serde::{Deserialize, Serialize};

/// The keys that qualify as one response class (left choice, right choice,
/// or advance). Listeners are scoped to key sets, so a key outside every set
/// never reaches the controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeySet(Vec<char>);

impl KeySet {
    pub fn new(keys: impl IntoIterator<Item = char>) -> Self {
        Self(keys.into_iter().collect())
    }

    pub fn contains(&self, key: char) -> bool {
        self.0.contains(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<char> for KeySet {
    fn from(key: char) -> Self {
        Self(vec![key])
    }
}
