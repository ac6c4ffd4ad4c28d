//! Multi-criteria organization search.
//!
//! The engine composes name, building, activity-hierarchy, geospatial, and
//! phone predicates into queries against a [`Store`] snapshot and returns
//! enriched records. It holds no state of its own; hierarchy views are
//! rebuilt per query.

use crate::error::{DirectoryError, Result};
use crate::hierarchy::HierarchyIndex;
use crate::spatial::{self, Rectangle};
use crate::store::Store;
use crate::types::{
    Activity, ActivityId, Building, BuildingId, Coordinate, Organization, OrganizationRecord,
};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

/// Default page size for comprehensive search.
pub const DEFAULT_LIMIT: usize = 100;

/// Filter set for comprehensive search.
///
/// Every filter field is independently optional; an absent field imposes no
/// constraint. Present filters compose with logical AND. `skip` and `limit`
/// slice the filtered, id-ordered result.
///
/// # Examples
///
/// ```rust
/// use geodir::SearchFilters;
///
/// let filters = SearchFilters::new()
///     .with_name("bank")
///     .with_building(3)
///     .with_skip(0)
///     .with_limit(20);
/// assert_eq!(filters.limit, 20);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchFilters {
    /// Case-insensitive substring match on the organization name.
    #[serde(default)]
    pub name: Option<String>,
    /// Exact building match.
    #[serde(default)]
    pub building_id: Option<BuildingId>,
    /// Match through the descendant closure of this activity.
    #[serde(default)]
    pub activity_id: Option<ActivityId>,
    /// Match through the closures of all activities whose name contains
    /// this substring case-insensitively.
    #[serde(default)]
    pub activity_name: Option<String>,
    #[serde(default)]
    pub skip: usize,
    #[serde(default = "SearchFilters::default_limit")]
    pub limit: usize,
}

impl SearchFilters {
    const fn default_limit() -> usize {
        DEFAULT_LIMIT
    }

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_building(mut self, building_id: BuildingId) -> Self {
        self.building_id = Some(building_id);
        self
    }

    pub fn with_activity(mut self, activity_id: ActivityId) -> Self {
        self.activity_id = Some(activity_id);
        self
    }

    pub fn with_activity_name<S: Into<String>>(mut self, activity_name: S) -> Self {
        self.activity_name = Some(activity_name.into());
        self
    }

    pub fn with_skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            name: None,
            building_id: None,
            activity_id: None,
            activity_name: None,
            skip: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Search engine over a store snapshot.
pub struct SearchEngine<'a> {
    store: &'a dyn Store,
}

impl<'a> SearchEngine<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Comprehensive multi-criteria search.
    ///
    /// Activity filters are expanded to descendant closures before the
    /// single retrieval against the store; pagination applies after all
    /// filters. When both `activity_id` and `activity_name` are present
    /// the two expanded id sets are intersected.
    pub fn search(&self, filters: &SearchFilters) -> Result<Vec<OrganizationRecord>> {
        let scope = self.activity_scope(filters)?;
        if let Some(scope) = &scope
            && scope.is_empty()
        {
            log::debug!("activity filter matched no activities, short-circuiting");
            return Ok(Vec::new());
        }

        let name_needle = filters.name.as_ref().map(|s| s.to_lowercase());
        let predicate = |org: &Organization| {
            if let Some(needle) = &name_needle
                && !org.name.to_lowercase().contains(needle.as_str())
            {
                return false;
            }
            if let Some(building_id) = filters.building_id
                && org.building_id != building_id
            {
                return false;
            }
            if let Some(scope) = &scope
                && !org.activities.iter().any(|id| scope.contains(id))
            {
                return false;
            }
            true
        };

        let organizations =
            self.store
                .organizations_where(&predicate, filters.skip, filters.limit)?;
        self.enrich(organizations)
    }

    /// Organizations whose building lies within `radius_km` of `center`.
    ///
    /// Boundary-inclusive, no pagination: the full matching set is
    /// returned in id order.
    pub fn search_in_radius(
        &self,
        center: &Coordinate,
        radius_km: f64,
    ) -> Result<Vec<OrganizationRecord>> {
        self.geo_search(|location| spatial::within_radius(center, location, radius_km))
    }

    /// Organizations whose building lies inside the axis-aligned box given
    /// by its north-east and south-west corners, edges inclusive.
    pub fn search_in_rectangle(
        &self,
        north_east: &Coordinate,
        south_west: &Coordinate,
    ) -> Result<Vec<OrganizationRecord>> {
        let rect = Rectangle::new(*north_east, *south_west);
        self.geo_search(|location| rect.contains(location))
    }

    /// Organizations with at least one phone number containing `pattern`
    /// case-insensitively. An unmatched pattern yields an empty result,
    /// not an error.
    pub fn search_by_phone_pattern(&self, pattern: &str) -> Result<Vec<OrganizationRecord>> {
        let ids = self.store.organizations_by_phone_pattern(pattern)?;
        let mut organizations = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(org) = self.store.organization(id)? {
                organizations.push(org);
            }
        }
        self.enrich(organizations)
    }

    /// Specialization of [`search`](Self::search) with only the name
    /// filter set and no pagination.
    pub fn search_by_name(&self, substring: &str) -> Result<Vec<OrganizationRecord>> {
        self.search(&SearchFilters::new().with_name(substring).with_limit(usize::MAX))
    }

    /// Specialization with only the building filter set, unpaginated.
    pub fn search_by_building(&self, building_id: BuildingId) -> Result<Vec<OrganizationRecord>> {
        self.search(
            &SearchFilters::new()
                .with_building(building_id)
                .with_limit(usize::MAX),
        )
    }

    /// Specialization with only the activity filter set, unpaginated. The
    /// activity expands to its full descendant closure.
    pub fn search_by_activity(&self, activity_id: ActivityId) -> Result<Vec<OrganizationRecord>> {
        self.search(
            &SearchFilters::new()
                .with_activity(activity_id)
                .with_limit(usize::MAX),
        )
    }

    /// Specialization with only the activity-name filter set, unpaginated.
    pub fn search_by_activity_name_tree(
        &self,
        substring: &str,
    ) -> Result<Vec<OrganizationRecord>> {
        self.search(
            &SearchFilters::new()
                .with_activity_name(substring)
                .with_limit(usize::MAX),
        )
    }

    /// Resolve the activity filters to one id scope, or `None` when no
    /// activity filter is present.
    fn activity_scope(&self, filters: &SearchFilters) -> Result<Option<FxHashSet<ActivityId>>> {
        let scope = match (filters.activity_id, filters.activity_name.as_deref()) {
            (None, None) => return Ok(None),
            (Some(id), None) => {
                let index = HierarchyIndex::from_store(self.store)?;
                index.closure(id)?
            }
            (None, Some(name)) => {
                let index = HierarchyIndex::from_store(self.store)?;
                index.closure_of_name_matches(name)?
            }
            (Some(id), Some(name)) => {
                let index = HierarchyIndex::from_store(self.store)?;
                let by_id = index.closure(id)?;
                let by_name = index.closure_of_name_matches(name)?;
                by_id.intersection(&by_name).copied().collect()
            }
        };
        Ok(Some(scope))
    }

    /// Apply a location predicate over every organization's building.
    fn geo_search(
        &self,
        keep: impl Fn(&Coordinate) -> bool,
    ) -> Result<Vec<OrganizationRecord>> {
        let organizations = self.store.organizations_where(&|_| true, 0, usize::MAX)?;
        let buildings = self.building_table(&organizations)?;

        let matched: Vec<Organization> = organizations
            .into_iter()
            .filter(|org| {
                buildings
                    .get(&org.building_id)
                    .is_some_and(|building| keep(&building.location()))
            })
            .collect();
        self.enrich_with_buildings(matched, buildings)
    }

    /// Batch-enrich organizations into boundary records.
    pub(crate) fn enrich(
        &self,
        organizations: Vec<Organization>,
    ) -> Result<Vec<OrganizationRecord>> {
        let buildings = self.building_table(&organizations)?;
        self.enrich_with_buildings(organizations, buildings)
    }

    fn enrich_with_buildings(
        &self,
        organizations: Vec<Organization>,
        buildings: FxHashMap<BuildingId, Building>,
    ) -> Result<Vec<OrganizationRecord>> {
        if organizations.is_empty() {
            return Ok(Vec::new());
        }

        let needs_activities = organizations.iter().any(|org| !org.activities.is_empty());
        let activity_table: FxHashMap<ActivityId, Activity> = if needs_activities {
            self.store
                .activities_where(&|_| true)?
                .into_iter()
                .map(|activity| (activity.id, activity))
                .collect()
        } else {
            FxHashMap::default()
        };

        let mut records = Vec::with_capacity(organizations.len());
        for org in organizations {
            let building = buildings
                .get(&org.building_id)
                .ok_or(DirectoryError::BuildingNotFound(org.building_id))?
                .clone();
            let activities = org
                .activities
                .iter()
                .filter_map(|id| activity_table.get(id))
                .map(Into::into)
                .collect();
            let phone_numbers = self.store.phones_of(org.id)?;

            records.push(OrganizationRecord {
                id: org.id,
                name: org.name,
                building,
                activities,
                phone_numbers,
            });
        }
        Ok(records)
    }

    /// One building fetch per distinct building id.
    fn building_table(
        &self,
        organizations: &[Organization],
    ) -> Result<FxHashMap<BuildingId, Building>> {
        let mut table = FxHashMap::default();
        for org in organizations {
            if !table.contains_key(&org.building_id) {
                let building = self
                    .store
                    .building(org.building_id)?
                    .ok_or(DirectoryError::BuildingNotFound(org.building_id))?;
                table.insert(org.building_id, building);
            }
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::types::{NewActivity, NewBuilding, NewOrganization};

    fn seeded_store() -> MemoryStore {
        let store = MemoryStore::new();
        let building = store
            .insert_building(NewBuilding {
                address: "1 Main St".into(),
                latitude: 55.7558,
                longitude: 37.6173,
            })
            .unwrap();
        let food = store
            .insert_activity(NewActivity {
                name: "Food".into(),
                parent_id: None,
            })
            .unwrap();
        let meat = store
            .insert_activity(NewActivity {
                name: "Meat".into(),
                parent_id: Some(food.id),
            })
            .unwrap();
        store
            .insert_organization(NewOrganization {
                name: "Horns and Hooves".into(),
                building_id: building.id,
                phone_numbers: vec!["5-555-555".into()],
                activity_ids: vec![meat.id],
            })
            .unwrap();
        store
    }

    #[test]
    fn test_activity_filter_expands_closure() {
        let store = seeded_store();
        let engine = SearchEngine::new(&store);

        // The organization is linked to "Meat" only, but matches a search
        // for the parent "Food" through the closure.
        let results = engine
            .search(&SearchFilters::new().with_activity(1))
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Horns and Hooves");
    }

    #[test]
    fn test_unmatched_activity_name_short_circuits() {
        let store = seeded_store();
        let engine = SearchEngine::new(&store);

        let results = engine
            .search(&SearchFilters::new().with_activity_name("plumbing"))
            .unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_combined_activity_filters_intersect() {
        let store = seeded_store();
        let engine = SearchEngine::new(&store);

        // closure(Meat) = {2}; name "food" expands to {1, 2}; intersection {2}
        let results = engine
            .search(
                &SearchFilters::new()
                    .with_activity(2)
                    .with_activity_name("food"),
            )
            .unwrap();
        assert_eq!(results.len(), 1);

        // Disjoint expansions produce nothing
        let results = engine
            .search(
                &SearchFilters::new()
                    .with_activity(99)
                    .with_activity_name("food"),
            )
            .unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_enrichment_includes_phones_and_activities() {
        let store = seeded_store();
        let engine = SearchEngine::new(&store);

        let results = engine.search(&SearchFilters::new()).unwrap();
        let record = &results[0];
        assert_eq!(record.building.address, "1 Main St");
        assert_eq!(record.phone_numbers, vec!["5-555-555".to_string()]);
        assert_eq!(record.activities.len(), 1);
        assert_eq!(record.activities[0].name, "Meat");
    }
}
