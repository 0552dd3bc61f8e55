//! Municipal boundaries keyed by normalized name.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::util::normalize_name;

/// A `(longitude, latitude)` vertex.
pub type Coord = [f64; 2];

/// Outer ring of one polygon part, as an ordered vertex list.
pub type Ring = Vec<Coord>;

/// Boundary of a municipality. Multi-part municipalities carry one ring per
/// part; interior rings (holes) are not kept.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Geometry {
    pub parts: Vec<Ring>,
}

impl Geometry {
    pub fn vertex_count(&self) -> usize {
        self.parts.iter().map(Vec::len).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeoEntry {
    /// Name of the first feature, trimmed.
    pub name: String,
    /// Every spelling merged into this entry, as written in the boundary file.
    pub aliases: Vec<String>,
    pub geometry: Geometry,
}

/// Mapping from normalized municipality name to its boundary.
#[derive(Debug, Clone, Default)]
pub struct Geography {
    entries: BTreeMap<String, GeoEntry>,
}

impl Geography {
    /// Insert a municipality. A second entry whose name folds to the same key
    /// is merged into the first as extra parts; returns `true` in that case.
    pub fn insert(&mut self, name: &str, geometry: Geometry) -> bool {
        let key = normalize_name(name);
        match self.entries.get_mut(&key) {
            Some(existing) => {
                if !existing.aliases.iter().any(|a| a == name) {
                    existing.aliases.push(name.to_string());
                }
                existing.geometry.parts.extend(geometry.parts);
                true
            }
            None => {
                self.entries.insert(
                    key,
                    GeoEntry {
                        name: name.trim().to_string(),
                        aliases: vec![name.to_string()],
                        geometry,
                    },
                );
                false
            }
        }
    }

    /// Look up by any spelling of the name; the key is normalized first.
    pub fn get(&self, name: &str) -> Option<&GeoEntry> {
        self.entries.get(&normalize_name(name))
    }

    /// Look up by a name as written in the boundary file, no folding. Any
    /// spelling merged into an entry matches it.
    pub fn get_exact(&self, name: &str) -> Option<&GeoEntry> {
        self.entries
            .values()
            .find(|e| e.name == name || e.aliases.iter().any(|a| a == name))
    }

    /// Entries in normalized-name order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &GeoEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f64) -> Geometry {
        Geometry {
            parts: vec![vec![[x, 0.0], [x + 1.0, 0.0], [x + 1.0, 1.0], [x, 0.0]]],
        }
    }

    #[test]
    fn lookup_is_normalized() {
        let mut geo = Geography::default();
        geo.insert("Gaspar Hernández", square(0.0));
        assert!(geo.get("GASPAR  HERNANDEZ ").is_some());
        assert!(geo.get_exact("GASPAR HERNANDEZ").is_none());
        assert_eq!(
            geo.get_exact("Gaspar Hernández").map(|e| e.name.as_str()),
            Some("Gaspar Hernández")
        );
    }

    #[test]
    fn duplicate_names_merge_parts() {
        let mut geo = Geography::default();
        assert!(!geo.insert("Moca", square(0.0)));
        assert!(geo.insert("MOCA", square(2.0)));
        assert_eq!(geo.len(), 1);
        let entry = geo.get("moca").unwrap();
        assert_eq!(entry.geometry.parts.len(), 2);
        assert_eq!(entry.geometry.vertex_count(), 8);
        assert_eq!(entry.name, "Moca");
    }

    #[test]
    fn exact_lookup_sees_merged_spellings() {
        let mut geo = Geography::default();
        geo.insert("Moca", square(0.0));
        geo.insert("MOCA", square(2.0));
        assert_eq!(geo.get_exact("MOCA").map(|e| e.name.as_str()), Some("Moca"));
        assert_eq!(geo.get_exact("Moca").map(|e| e.name.as_str()), Some("Moca"));
        assert!(geo.get_exact("moca").is_none());
        assert_eq!(geo.get("moca").unwrap().aliases, vec!["Moca", "MOCA"]);
    }
}
