//! Directory facade.
//!
//! This module defines the main `Directory` type wiring the store, the
//! hierarchy index, and the search engine into the public API surface.

use crate::builder::DirectoryBuilder;
use crate::config::Config;
use crate::error::{DirectoryError, Result};
use crate::hierarchy::HierarchyIndex;
use crate::search::{SearchEngine, SearchFilters};
use crate::store::{MemoryStore, Store, StoreStats};
use crate::types::{
    Activity, ActivityId, ActivityNode, Building, BuildingId, Coordinate, NewActivity,
    NewBuilding, NewOrganization, OrganizationId, OrganizationPatch, OrganizationRecord,
};
use std::sync::Arc;

/// An embedded organization directory.
///
/// `Directory` maps organizations to buildings and to a hierarchical
/// taxonomy of business activities, and answers lookups and searches over
/// that data:
/// - activity tree materialization and descendant closures
/// - comprehensive multi-criteria organization search
/// - geospatial search by radius and bounding rectangle
/// - phone number pattern search
///
/// All operations are synchronous computations over the current store
/// state; derived structures (trees, closures) are computed per call and
/// never cached.
///
/// # Examples
///
/// ```rust
/// use geodir::{Directory, NewActivity, NewBuilding, NewOrganization, SearchFilters};
///
/// # fn main() -> Result<(), geodir::DirectoryError> {
/// let dir = Directory::memory();
///
/// let hq = dir.add_building(NewBuilding {
///     address: "1 Lenina St".into(),
///     latitude: 55.7558,
///     longitude: 37.6173,
/// })?;
/// let food = dir.add_activity(NewActivity { name: "Food".into(), parent_id: None })?;
/// let meat = dir.add_activity(NewActivity {
///     name: "Meat".into(),
///     parent_id: Some(food.id),
/// })?;
///
/// dir.add_organization(NewOrganization {
///     name: "Horns and Hooves".into(),
///     building_id: hq.id,
///     phone_numbers: vec!["2-222-222".into()],
///     activity_ids: vec![meat.id],
/// })?;
///
/// // Searching for the parent activity finds the organization through
/// // the descendant closure.
/// let found = dir.search(&SearchFilters::new().with_activity(food.id))?;
/// assert_eq!(found.len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Directory {
    store: Arc<dyn Store>,
    config: Config,
}

impl std::fmt::Debug for Directory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Directory")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Directory {
    /// Create a directory over a fresh in-memory store with the default
    /// configuration.
    pub fn memory() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()), Config::default())
    }

    /// Create a directory over an existing store.
    pub fn with_store(store: Arc<dyn Store>, config: Config) -> Self {
        Self { store, config }
    }

    /// Start building a directory with custom configuration or store.
    pub fn builder() -> DirectoryBuilder {
        DirectoryBuilder::new()
    }

    /// The active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn engine(&self) -> SearchEngine<'_> {
        SearchEngine::new(self.store.as_ref())
    }

    fn page_limit(&self, limit: Option<usize>) -> usize {
        limit.unwrap_or(self.config.default_page_limit)
    }

    // Buildings

    /// Fetch a building by id.
    pub fn building(&self, id: BuildingId) -> Result<Building> {
        self.store
            .building(id)?
            .ok_or(DirectoryError::BuildingNotFound(id))
    }

    /// List buildings in id order. A `None` limit uses the configured
    /// default page size.
    pub fn buildings(&self, skip: usize, limit: Option<usize>) -> Result<Vec<Building>> {
        self.store.buildings(skip, self.page_limit(limit))
    }

    /// Register a building. The address must be unique.
    pub fn add_building(&self, new: NewBuilding) -> Result<Building> {
        self.store.insert_building(new)
    }

    // Activities

    /// Fetch an activity by id.
    pub fn activity(&self, id: ActivityId) -> Result<Activity> {
        self.store
            .activity(id)?
            .ok_or(DirectoryError::ActivityNotFound(id))
    }

    /// List activities in id order.
    pub fn activities(&self, skip: usize, limit: Option<usize>) -> Result<Vec<Activity>> {
        let limit = self.page_limit(limit);
        let activities = self.store.activities_where(&|_| true)?;
        Ok(activities.into_iter().skip(skip).take(limit).collect())
    }

    /// Register an activity. A parent, when given, must exist.
    pub fn add_activity(&self, new: NewActivity) -> Result<Activity> {
        self.store.insert_activity(new)
    }

    /// Materialize the activity forest down to `max_level`.
    ///
    /// Roots are level 0; `max_level == 0` yields an empty forest.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use geodir::{Directory, NewActivity};
    ///
    /// # fn main() -> Result<(), geodir::DirectoryError> {
    /// let dir = Directory::memory();
    /// let root = dir.add_activity(NewActivity { name: "Food".into(), parent_id: None })?;
    /// dir.add_activity(NewActivity { name: "Meat".into(), parent_id: Some(root.id) })?;
    ///
    /// let forest = dir.activity_tree(1)?;
    /// assert_eq!(forest.len(), 1);
    /// assert!(forest[0].children.is_empty()); // level 1 suppressed
    /// # Ok(())
    /// # }
    /// ```
    pub fn activity_tree(&self, max_level: usize) -> Result<Vec<ActivityNode>> {
        let index = HierarchyIndex::from_store(self.store.as_ref())?;
        Ok(index.build_tree(max_level))
    }

    /// Materialize the activity forest down to the configured default
    /// depth.
    pub fn activity_tree_default(&self) -> Result<Vec<ActivityNode>> {
        self.activity_tree(self.config.default_tree_depth)
    }

    /// Descendant closure of an activity, including the activity itself,
    /// in ascending id order.
    pub fn closure_of(&self, activity_id: ActivityId) -> Result<Vec<ActivityId>> {
        let index = HierarchyIndex::from_store(self.store.as_ref())?;
        let mut ids: Vec<ActivityId> = index.closure(activity_id)?.into_iter().collect();
        ids.sort_unstable();
        Ok(ids)
    }

    // Organizations

    /// Fetch an organization by id as an enriched record.
    pub fn organization(&self, id: OrganizationId) -> Result<OrganizationRecord> {
        let org = self
            .store
            .organization(id)?
            .ok_or(DirectoryError::OrganizationNotFound(id))?;
        let mut records = self.engine().enrich(vec![org])?;
        records
            .pop()
            .ok_or(DirectoryError::OrganizationNotFound(id))
    }

    /// List organizations in id order as enriched records.
    pub fn organizations(
        &self,
        skip: usize,
        limit: Option<usize>,
    ) -> Result<Vec<OrganizationRecord>> {
        self.search(
            &SearchFilters::new()
                .with_skip(skip)
                .with_limit(self.page_limit(limit)),
        )
    }

    /// Register an organization and return its enriched record.
    pub fn add_organization(&self, new: NewOrganization) -> Result<OrganizationRecord> {
        let org = self.store.insert_organization(new)?;
        self.organization(org.id)
    }

    /// Apply a partial update and return the refreshed record.
    pub fn update_organization(
        &self,
        id: OrganizationId,
        patch: OrganizationPatch,
    ) -> Result<OrganizationRecord> {
        match self.store.update_organization(id, patch)? {
            Some(_) => self.organization(id),
            None => Err(DirectoryError::OrganizationNotFound(id)),
        }
    }

    /// Delete an organization and its phone associations.
    pub fn delete_organization(&self, id: OrganizationId) -> Result<()> {
        if self.store.delete_organization(id)? {
            Ok(())
        } else {
            Err(DirectoryError::OrganizationNotFound(id))
        }
    }

    // Search

    /// Comprehensive multi-criteria search. See [`SearchFilters`].
    pub fn search(&self, filters: &SearchFilters) -> Result<Vec<OrganizationRecord>> {
        self.engine().search(filters)
    }

    /// Organizations whose building lies within `radius_km` of `center`,
    /// boundary inclusive. Returns the full matching set.
    pub fn search_in_radius(
        &self,
        center: &Coordinate,
        radius_km: f64,
    ) -> Result<Vec<OrganizationRecord>> {
        self.engine().search_in_radius(center, radius_km)
    }

    /// Organizations whose building lies inside the box spanned by the
    /// north-east and south-west corners, edges inclusive.
    pub fn search_in_rectangle(
        &self,
        north_east: &Coordinate,
        south_west: &Coordinate,
    ) -> Result<Vec<OrganizationRecord>> {
        self.engine().search_in_rectangle(north_east, south_west)
    }

    /// Organizations with a phone number containing `pattern`
    /// case-insensitively.
    pub fn search_by_phone_pattern(&self, pattern: &str) -> Result<Vec<OrganizationRecord>> {
        self.engine().search_by_phone_pattern(pattern)
    }

    /// Organizations whose name contains `substring` case-insensitively.
    pub fn search_by_name(&self, substring: &str) -> Result<Vec<OrganizationRecord>> {
        self.engine().search_by_name(substring)
    }

    /// Organizations located in the given building.
    pub fn search_by_building(&self, building_id: BuildingId) -> Result<Vec<OrganizationRecord>> {
        self.engine().search_by_building(building_id)
    }

    /// Organizations tagged with the activity or any of its descendants.
    pub fn search_by_activity(&self, activity_id: ActivityId) -> Result<Vec<OrganizationRecord>> {
        self.engine().search_by_activity(activity_id)
    }

    /// Organizations tagged under any activity whose name contains
    /// `substring`, descendants included.
    pub fn search_by_activity_name_tree(
        &self,
        substring: &str,
    ) -> Result<Vec<OrganizationRecord>> {
        self.engine().search_by_activity_name_tree(substring)
    }

    // Phone associations

    /// Phone numbers of an organization.
    pub fn phones_of(&self, org: OrganizationId) -> Result<Vec<String>> {
        self.store.phones_of(org)
    }

    /// Atomically replace an organization's phone set.
    pub fn set_phones(&self, org: OrganizationId, numbers: &[String]) -> Result<()> {
        self.store.replace_phones(org, numbers)
    }

    /// Associate one phone number; adding an existing pair is a no-op.
    pub fn add_phone(&self, org: OrganizationId, number: &str) -> Result<()> {
        self.store.add_phone(org, number)
    }

    /// Remove one phone association; removing a missing pair is a no-op.
    pub fn remove_phone(&self, org: OrganizationId, number: &str) -> Result<()> {
        self.store.remove_phone(org, number)
    }

    /// Replace an organization's activity set.
    pub fn set_activities(&self, org: OrganizationId, activity_ids: &[ActivityId]) -> Result<()> {
        self.store.set_activities(org, activity_ids)
    }

    /// Entity counts.
    pub fn stats(&self) -> Result<StoreStats> {
        self.store.stats()
    }
}
