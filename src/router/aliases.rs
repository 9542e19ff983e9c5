//! Model Aliases
//!
//! Maps short, user-facing model names to upstream model identifiers.

/// Built-in alias table, in the order `/models` lists it
const BUILTIN_ALIASES: &[(&str, &str)] = &[
    (
        "llama4-maverick",
        "meta-llama/Llama-4-Maverick-17B-128E-Instruct-FP8",
    ),
    ("llama4-scout", "meta-llama/Llama-4-Scout-17B-16E-Instruct"),
    ("llama3-70b", "meta-llama/Llama-3.3-70B-Instruct-Turbo"),
    (
        "llama3-8b",
        "meta-llama/Meta-Llama-3.1-8B-Instruct-Turbo-classifier",
    ),
    ("llama3-free", "meta-llama/Llama-3.3-70B-Instruct-Turbo-Free"),
    ("mixtral", "meta-llama/Llama-Vision-Free"),
    ("gemma", "google/gemma-2b-it"),
    ("deepseek", "deepseek-ai/DeepSeek-R1-Distill-Llama-70B-free"),
];

/// Read-only, ordered alias table
#[derive(Debug, Clone)]
pub struct AliasRegistry {
    /// (lowercased alias, upstream model id)
    entries: Vec<(String, String)>,
}

impl AliasRegistry {
    /// Build a registry from ordered `(alias, upstream_id)` pairs.
    ///
    /// Aliases are stored lowercased. A repeated alias keeps its first
    /// position and takes the later upstream id.
    pub fn new<I, A, U>(entries: I) -> Self
    where
        I: IntoIterator<Item = (A, U)>,
        A: Into<String>,
        U: Into<String>,
    {
        let mut registry = Self {
            entries: Vec::new(),
        };

        for (alias, upstream) in entries {
            let alias = alias.into().to_lowercase();
            let upstream = upstream.into();

            match registry.entries.iter_mut().find(|(a, _)| *a == alias) {
                Some(existing) => existing.1 = upstream,
                None => registry.entries.push((alias, upstream)),
            }
        }

        registry
    }

    /// The built-in Together AI alias table
    pub fn builtin() -> Self {
        Self::new(BUILTIN_ALIASES.iter().copied())
    }

    /// Resolve an alias (case-insensitive, otherwise exact) to its upstream model id
    pub fn resolve(&self, alias: &str) -> Option<&str> {
        let alias = alias.to_lowercase();
        self.entries
            .iter()
            .find(|(a, _)| *a == alias)
            .map(|(_, upstream)| upstream.as_str())
    }

    /// All aliases in registry order
    pub fn aliases(&self) -> Vec<&str> {
        self.entries.iter().map(|(a, _)| a.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
