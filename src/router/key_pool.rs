//! API Key Pool Management
//!
//! Hands out upstream API keys in strict round-robin order.

use crate::error::{GatewayError, Result};
use parking_lot::Mutex;
use std::fmt;

/// A single upstream API key
pub struct ApiKey {
    /// The actual API key value
    value: String,

    /// Position in the pool (0-based)
    index: usize,
}

impl ApiKey {
    /// Create a new API key at the given pool position
    pub fn new(value: String, index: usize) -> Self {
        Self { value, index }
    }

    /// Get the key value
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Log-safe name for this key, e.g. `key#2`
    pub fn label(&self) -> String {
        format!("key#{}", self.index + 1)
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKey")
            .field("index", &self.index)
            .field("value", &"[REDACTED]")
            .finish()
    }
}

/// Pool of API keys with round-robin rotation
#[derive(Debug)]
pub struct KeyPool {
    /// Available keys
    keys: Vec<ApiKey>,

    /// Index of the next key to hand out, always in `0..keys.len()`
    cursor: Mutex<usize>,
}

impl KeyPool {
    /// Create a new key pool. Fails if `keys` is empty.
    pub fn new(keys: Vec<String>) -> Result<Self> {
        if keys.is_empty() {
            return Err(GatewayError::Config(
                "No API keys configured. Set KEY1..KEY6 or API_KEYS".to_string(),
            ));
        }

        Ok(Self {
            keys: keys
                .into_iter()
                .enumerate()
                .map(|(index, value)| ApiKey::new(value, index))
                .collect(),
            cursor: Mutex::new(0),
        })
    }

    /// Get the number of keys in the pool
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Always false: an empty pool cannot be constructed
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Index the next call to [`KeyPool::next_key`] will return
    pub fn cursor(&self) -> usize {
        *self.cursor.lock()
    }

    /// Take the key under the cursor and advance it, wrapping after the last key
    pub fn next_key(&self) -> &ApiKey {
        let mut cursor = self.cursor.lock();
        let key = &self.keys[*cursor];
        *cursor = (*cursor + 1) % self.keys.len();
        key
    }
}
