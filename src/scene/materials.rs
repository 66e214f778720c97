// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Material registry

use crate::geometry::MaterialId;
use ahash::AHashMap;
use serde::Serialize;

/// Ordered, deduplicated material list
///
/// Indices are stable once assigned and the registry never shrinks.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MaterialRegistry {
    materials: Vec<MaterialId>,
    #[serde(skip)]
    lookup: AHashMap<MaterialId, usize>,
}

impl MaterialRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry seeded with a caller-ordered list
    ///
    /// Repeated entries collapse onto their first occurrence.
    pub fn with_order<I>(materials: I) -> Self
    where
        I: IntoIterator<Item = MaterialId>,
    {
        let mut registry = Self::new();
        for material in materials {
            registry.index_of(&material);
        }
        registry
    }

    /// Index of `material`, inserting it at the end on first use
    pub fn index_of(&mut self, material: &MaterialId) -> usize {
        if let Some(&index) = self.lookup.get(material) {
            return index;
        }
        let index = self.materials.len();
        self.materials.push(material.clone());
        self.lookup.insert(material.clone(), index);
        index
    }

    /// Index without inserting
    pub fn get(&self, material: &MaterialId) -> Option<usize> {
        self.lookup.get(material).copied()
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MaterialId> {
        self.materials.iter()
    }

    pub fn as_slice(&self) -> &[MaterialId] {
        &self.materials
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_of_inserts_in_first_seen_order() {
        let mut registry = MaterialRegistry::new();
        assert_eq!(registry.index_of(&"Stone".into()), 0);
        assert_eq!(registry.index_of(&"Moss".into()), 1);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_index_of_is_idempotent() {
        let mut registry = MaterialRegistry::new();
        let stone = MaterialId::new("Stone");
        let first = registry.index_of(&stone);
        registry.index_of(&"Moss".into());
        assert_eq!(registry.index_of(&stone), first);
        assert_eq!(registry.index_of(&stone), first);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_seeded_order_is_kept_and_deduplicated() {
        let mut registry = MaterialRegistry::with_order(
            ["Moss", "Stone", "Moss"].into_iter().map(MaterialId::from),
        );
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(&"Stone".into()), Some(1));
        assert_eq!(registry.index_of(&"Bark".into()), 2);
        let names: Vec<&str> = registry.iter().map(|m| m.as_str()).collect();
        assert_eq!(names, vec!["Moss", "Stone", "Bark"]);
    }
}
