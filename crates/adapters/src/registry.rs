// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Maps an exact-match engine name to a fresh adapter instance per call
//! (spec §4.8). Lookup is case-sensitive and does not trim whitespace.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{truncate_name, AdapterError};
use crate::{ClaudeCodeAdapter, EngineAdapter};

type Factory = Arc<dyn Fn() -> Arc<dyn EngineAdapter> + Send + Sync>;

/// A name -> adapter-constructor map. Each [`Registry::resolve`] call
/// returns a brand-new adapter instance; no mutable state is shared
/// across calls, so adapters never leak state between runs (spec §4.8:
/// "no shared mutable adapter state across calls").
#[derive(Clone)]
pub struct Registry {
    factories: HashMap<String, Factory>,
}

impl Default for Registry {
    /// The production registry: just `claude-code`, spec §6's default
    /// engine name.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register("claude-code", || Arc::new(ClaudeCodeAdapter::default()));
        registry
    }
}

impl Registry {
    /// A registry with no adapters registered, for tests that want full
    /// control over what names resolve.
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register `name` to construct a fresh adapter via `factory` on
    /// every [`Self::resolve`] call.
    pub fn register<F, A>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> A + Send + Sync + 'static,
        A: EngineAdapter + 'static,
    {
        self.factories
            .insert(name.into(), Arc::new(move || Arc::new(factory()) as Arc<dyn EngineAdapter>));
    }

    /// Resolve `name` to a fresh adapter instance. Lookup is exact-match,
    /// case-sensitive, and untrimmed (spec §4.8): `"Claude-Code"` and
    /// `" claude-code"` are both unknown.
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn EngineAdapter>, AdapterError> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| AdapterError::UnknownEngine(truncate_name(name)))
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
