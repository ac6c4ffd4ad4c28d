//! Activity hierarchy index.
//!
//! The taxonomy is stored flat (each activity carries an optional parent
//! id). This module builds an adjacency view of that flat listing once per
//! logical query and answers child lookups, depth-limited tree
//! materialization, and unbounded descendant closures against it. Nothing
//! here is cached across queries.

use crate::error::{DirectoryError, Result};
use crate::store::Store;
use crate::types::{Activity, ActivityId, ActivityNode};
use rustc_hash::{FxHashMap, FxHashSet};

/// Adjacency view over the activity forest.
///
/// Children are ordered by ascending id under every parent. The index is a
/// snapshot: it reflects the store state at construction time and is meant
/// to live for a single query.
pub struct HierarchyIndex {
    by_id: FxHashMap<ActivityId, Activity>,
    children: FxHashMap<Option<ActivityId>, Vec<ActivityId>>,
}

impl HierarchyIndex {
    /// Build the index from a flat activity listing.
    pub fn from_activities(activities: Vec<Activity>) -> Self {
        let mut by_id = FxHashMap::default();
        let mut children: FxHashMap<Option<ActivityId>, Vec<ActivityId>> = FxHashMap::default();

        for activity in activities {
            children
                .entry(activity.parent_id)
                .or_default()
                .push(activity.id);
            by_id.insert(activity.id, activity);
        }
        for ids in children.values_mut() {
            ids.sort_unstable();
        }

        Self { by_id, children }
    }

    /// Snapshot the current activity listing of a store.
    pub fn from_store(store: &dyn Store) -> Result<Self> {
        Ok(Self::from_activities(store.activities_where(&|_| true)?))
    }

    /// Activities whose parent is `parent`; `None` selects the roots.
    pub fn children_of(&self, parent: Option<ActivityId>) -> Vec<&Activity> {
        self.children
            .get(&parent)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.by_id.get(id))
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default()
    }

    /// Materialize the forest of all roots down to `max_level`.
    ///
    /// Roots sit at level 0; a node at `level >= max_level` gets an empty
    /// child list, and `max_level == 0` yields an empty forest. Expansion
    /// depth is bounded by `max_level`, so this terminates even when the
    /// parent graph is corrupt.
    pub fn build_tree(&self, max_level: usize) -> Vec<ActivityNode> {
        self.subtree(None, 0, max_level)
    }

    fn subtree(
        &self,
        parent: Option<ActivityId>,
        level: usize,
        max_level: usize,
    ) -> Vec<ActivityNode> {
        if level >= max_level {
            return Vec::new();
        }

        self.children_of(parent)
            .into_iter()
            .map(|activity| ActivityNode {
                id: activity.id,
                name: activity.name.clone(),
                parent_id: activity.parent_id,
                level,
                children: self.subtree(Some(activity.id), level + 1, max_level),
            })
            .collect()
    }

    /// Transitive descendant closure of `seed`, including `seed` itself.
    ///
    /// Runs an explicit worklist to unbounded depth. Since every activity
    /// has at most one parent, reaching a node twice proves the parent
    /// graph has a cycle; the traversal stops and reports the corrupt data
    /// instead of looping forever.
    pub fn closure(&self, seed: ActivityId) -> Result<FxHashSet<ActivityId>> {
        let mut seen = FxHashSet::default();
        seen.insert(seed);
        let mut worklist = vec![seed];

        while let Some(id) = worklist.pop() {
            if let Some(child_ids) = self.children.get(&Some(id)) {
                for child in child_ids {
                    if !seen.insert(*child) {
                        log::warn!("activity hierarchy cycle detected at {}", child);
                        return Err(DirectoryError::CorruptHierarchy(*child));
                    }
                    worklist.push(*child);
                }
            }
        }
        Ok(seen)
    }

    /// Union of the closures of every activity whose name contains
    /// `substring` case-insensitively. Empty when nothing matches.
    pub fn closure_of_name_matches(&self, substring: &str) -> Result<FxHashSet<ActivityId>> {
        let needle = substring.to_lowercase();
        let mut union = FxHashSet::default();

        for activity in self.by_id.values() {
            if activity.name.to_lowercase().contains(&needle) {
                union.extend(self.closure(activity.id)?);
            }
        }
        Ok(union)
    }
}
