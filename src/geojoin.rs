//! Join per-municipality counts to boundary polygons.

use std::collections::HashMap;

use crate::aggregate::Aggregation;
use crate::geography::{Geography, Geometry};

/// How aggregation keys are matched against boundary names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameMatching {
    /// Fold case, accents and whitespace on both sides.
    #[default]
    Normalized,
    /// Raw key must equal the raw feature name.
    Exact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JoinOptions {
    pub matching: NameMatching,
    /// Emit every municipality of the geography, with count 0 when absent
    /// from the aggregation.
    pub zero_fill: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JoinedMunicipality<'g> {
    /// Name as written in the boundary file.
    pub name: &'g str,
    pub geometry: &'g Geometry,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeoJoin<'g> {
    pub joined: Vec<JoinedMunicipality<'g>>,
    /// Aggregation keys with no boundary, in aggregation order.
    pub unmatched: Vec<String>,
}

impl GeoJoin<'_> {
    pub fn matched_count(&self) -> usize {
        self.joined.iter().filter(|j| j.count > 0).count()
    }
}

/// Attach geometry to each aggregated municipality.
///
/// Keys without a boundary go to `unmatched` and are not emitted. Keys that
/// fold onto the same municipality are summed. Rows are ordered by
/// descending count, ties by ascending name.
pub fn join_geo<'g>(
    aggregation: &Aggregation,
    geography: &'g Geography,
    options: JoinOptions,
) -> GeoJoin<'g> {
    let mut counts: HashMap<&'g str, (&'g Geometry, usize)> = HashMap::new();
    let mut unmatched = Vec::new();

    for group in &aggregation.groups {
        let entry = match options.matching {
            NameMatching::Normalized => geography.get(&group.key),
            NameMatching::Exact => geography.get_exact(&group.key),
        };
        match entry {
            Some(entry) => {
                counts
                    .entry(entry.name.as_str())
                    .or_insert((&entry.geometry, 0))
                    .1 += group.count;
            }
            None => unmatched.push(group.key.clone()),
        }
    }

    if options.zero_fill {
        for (_, entry) in geography.entries() {
            counts
                .entry(entry.name.as_str())
                .or_insert((&entry.geometry, 0));
        }
    }

    let mut joined: Vec<JoinedMunicipality<'g>> = counts
        .into_iter()
        .map(|(name, (geometry, count))| JoinedMunicipality {
            name,
            geometry,
            count,
        })
        .collect();
    joined.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(b.name)));

    GeoJoin { joined, unmatched }
}
