//! Shader Location Registry (§3.1): SGUID → source location, populated once per
//! instrumented shader at compile time and consulted during filtering to attach a
//! location to every message.
//!
//! Single-writer-many-reader: the compiler pool is the only writer, and it writes once
//! per shader commit before any report filtering can observe that shader's SGUIDs, so
//! reads never race a write to the same entry in practice. The lock exists for the rarer
//! case of two different shaders' compiler jobs committing concurrently.

use crate::message::Sguid;
use parking_lot::RwLock;
use std::collections::HashMap;

/// A source location attributed to one SGUID. `column` is `None` for source formats that
/// only carry line-granularity debug info (DXIL's debug-module row, for instance).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
    pub column: Option<u32>,
}

/// Maps an SGUID to the [`SourceLocation`] it was assigned when its owning shader was
/// instrumented.
#[derive(Default)]
pub struct ShaderLocationRegistry {
    locations: RwLock<HashMap<Sguid, SourceLocation>>,
}

impl ShaderLocationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records every SGUID a shader commit introduced. Called once by the compiler pool
    /// after a shader finishes instrumentation; overwrites any prior entry for the same
    /// SGUID (a shader module is recompiled in place when the source bytecode changes).
    pub fn register_shader(&self, locations: impl IntoIterator<Item = (Sguid, SourceLocation)>) {
        let mut table = self.locations.write();
        for (sguid, location) in locations {
            table.insert(sguid, location);
        }
    }

    /// Looks up the source location for a message's SGUID. `None` means the SGUID was
    /// never registered (a stale or corrupted message) or the shader that owned it has
    /// since been evicted.
    pub fn lookup(&self, sguid: Sguid) -> Option<SourceLocation> {
        self.locations.read().get(&sguid).cloned()
    }

    /// Drops every location belonging to the given SGUIDs. Called when a shader module is
    /// destroyed, so the registry does not grow unbounded across the process lifetime.
    pub fn evict(&self, sguids: impl IntoIterator<Item = Sguid>) {
        let mut table = self.locations.write();
        for sguid in sguids {
            table.remove(&sguid);
        }
    }

    pub fn len(&self) -> usize {
        self.locations.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(file: &str, line: u32) -> SourceLocation {
        SourceLocation {
            file: file.to_string(),
            line,
            column: None,
        }
    }

    #[test]
    fn register_then_lookup_round_trips() {
        let registry = ShaderLocationRegistry::new();
        registry.register_shader(vec![(1, loc("shader.hlsl", 10)), (2, loc("shader.hlsl", 20))]);
        assert_eq!(registry.lookup(1), Some(loc("shader.hlsl", 10)));
        assert_eq!(registry.lookup(2), Some(loc("shader.hlsl", 20)));
        assert_eq!(registry.lookup(3), None);
    }

    #[test]
    fn recompiling_a_shader_overwrites_its_prior_locations() {
        let registry = ShaderLocationRegistry::new();
        registry.register_shader(vec![(1, loc("a.hlsl", 1))]);
        registry.register_shader(vec![(1, loc("a.hlsl", 99))]);
        assert_eq!(registry.lookup(1), Some(loc("a.hlsl", 99)));
    }

    #[test]
    fn eviction_removes_only_named_sguids() {
        let registry = ShaderLocationRegistry::new();
        registry.register_shader(vec![(1, loc("a.hlsl", 1)), (2, loc("a.hlsl", 2))]);
        registry.evict(vec![1]);
        assert_eq!(registry.lookup(1), None);
        assert!(registry.lookup(2).is_some());
        assert_eq!(registry.len(), 1);
    }
}
