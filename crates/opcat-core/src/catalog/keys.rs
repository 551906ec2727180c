use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;

use super::records::CollisionRecord;

/// How catalog keys are compared when checking whether one is already taken.
///
/// The mode is fixed for a whole run. The two modes disambiguate differently:
/// `listUsers` and `ListUsers` are distinct keys when case-sensitive but
/// collide when case-insensitive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyMatching {
    #[default]
    CaseSensitive,
    CaseInsensitive,
}

impl KeyMatching {
    fn normalize(&self, key: &str) -> String {
        match self {
            KeyMatching::CaseSensitive => key.to_string(),
            KeyMatching::CaseInsensitive => key.to_lowercase(),
        }
    }
}

impl fmt::Display for KeyMatching {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyMatching::CaseSensitive => f.write_str("case-sensitive"),
            KeyMatching::CaseInsensitive => f.write_str("case-insensitive"),
        }
    }
}

/// Where an operation identifier came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdSource {
    Declared,
    Synthesized,
}

/// A catalog key, plus the collision it caused when it had to be renamed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyAssignment {
    pub key: String,
    pub collision: Option<CollisionRecord>,
}

/// Hands out unique catalog keys for one run.
#[derive(Debug, Clone, Default)]
pub struct KeyAllocator {
    mode: KeyMatching,
    /// Normalized key → key as issued.
    used: HashMap<String, String>,
}

impl KeyAllocator {
    pub fn new(mode: KeyMatching) -> Self {
        Self {
            mode,
            used: HashMap::new(),
        }
    }

    /// Assign a key for `operation_id`. A taken identifier gets the first free
    /// `__2`, `__3`, ... suffix.
    pub fn allocate(&mut self, operation_id: &str, source: IdSource) -> KeyAssignment {
        let existing = self.used.get(&self.mode.normalize(operation_id)).cloned();
        let Some(existing) = existing else {
            self.claim(operation_id);
            return KeyAssignment {
                key: operation_id.to_string(),
                collision: None,
            };
        };

        let mut suffix: u64 = 2;
        let key = loop {
            let candidate = format!("{operation_id}__{suffix}");
            if !self.used.contains_key(&self.mode.normalize(&candidate)) {
                break candidate;
            }
            suffix += 1;
        };
        self.claim(&key);

        let what = match source {
            IdSource::Declared => "operationId",
            IdSource::Synthesized => "synthesized operation identifier",
        };
        let reason = format!(
            "{what} `{operation_id}` is already used by `{existing}` ({} comparison)",
            self.mode
        );
        log::info!("catalog key collision: `{operation_id}` renamed to `{key}`");

        KeyAssignment {
            key,
            collision: Some(CollisionRecord {
                operation_id: operation_id.to_string(),
                collided_with: existing,
                reason,
            }),
        }
    }

    fn claim(&mut self, key: &str) {
        self.used.insert(self.mode.normalize(key), key.to_string());
    }
}
