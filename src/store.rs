//! Store abstraction for directory entities.
//!
//! This module provides a trait-based abstraction over entity storage,
//! allowing different backends while keeping the query engine independent
//! of persistence mechanics. The bundled [`MemoryStore`] keeps everything
//! in ordered maps guarded by a single lock.

use crate::error::{DirectoryError, Result};
use crate::phone::PhoneIndex;
use crate::types::{
    Activity, ActivityId, Building, BuildingId, NewActivity, NewBuilding, NewOrganization,
    Organization, OrganizationId, OrganizationPatch,
};
use parking_lot::RwLock;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Trait for entity storage backends.
///
/// All listings iterate in ascending id order; that order is the
/// deterministic base ordering every search result is sliced from.
/// Individual operations are atomic with respect to each other, but
/// read-modify-write sequences by concurrent callers are not serialized:
/// two writers racing on the same organization's phone or activity set
/// resolve as last-writer-wins.
pub trait Store: Send + Sync {
    /// Fetch a building by id.
    fn building(&self, id: BuildingId) -> Result<Option<Building>>;

    /// List buildings with offset/limit pagination.
    fn buildings(&self, skip: usize, limit: usize) -> Result<Vec<Building>>;

    /// Insert a building. The address must be unique.
    fn insert_building(&self, new: NewBuilding) -> Result<Building>;

    /// Fetch an activity by id.
    fn activity(&self, id: ActivityId) -> Result<Option<Activity>>;

    /// List activities satisfying a predicate, in id order.
    fn activities_where(&self, predicate: &dyn Fn(&Activity) -> bool) -> Result<Vec<Activity>>;

    /// Insert an activity. A parent, when given, must exist.
    fn insert_activity(&self, new: NewActivity) -> Result<Activity>;

    /// Fetch an organization by id.
    fn organization(&self, id: OrganizationId) -> Result<Option<Organization>>;

    /// List organizations satisfying a predicate, in id order, with the
    /// offset/limit slice applied after filtering.
    fn organizations_where(
        &self,
        predicate: &dyn Fn(&Organization) -> bool,
        skip: usize,
        limit: usize,
    ) -> Result<Vec<Organization>>;

    /// Insert an organization. The building and all activity ids must
    /// exist; initial phone numbers are linked as given.
    fn insert_organization(&self, new: NewOrganization) -> Result<Organization>;

    /// Apply a partial update. Returns `None` when the organization does
    /// not exist.
    fn update_organization(
        &self,
        id: OrganizationId,
        patch: OrganizationPatch,
    ) -> Result<Option<Organization>>;

    /// Delete an organization and its phone associations. Returns whether
    /// anything was deleted.
    fn delete_organization(&self, id: OrganizationId) -> Result<bool>;

    /// Resolve an organization's activity ids to activity rows.
    fn activities_of(&self, org: OrganizationId) -> Result<Vec<Activity>>;

    /// Replace an organization's activity set.
    fn set_activities(&self, org: OrganizationId, activity_ids: &[ActivityId]) -> Result<()>;

    /// Phone numbers associated with an organization. Unknown ids yield an
    /// empty list, not an error.
    fn phones_of(&self, org: OrganizationId) -> Result<Vec<String>>;

    /// Atomically replace an organization's phone set. The replacement must
    /// never be observable half-applied.
    fn replace_phones(&self, org: OrganizationId, numbers: &[String]) -> Result<()>;

    /// Associate a single number. Adding an existing pair is a no-op.
    fn add_phone(&self, org: OrganizationId, number: &str) -> Result<()>;

    /// Remove a single association. Removing a missing pair is a no-op.
    fn remove_phone(&self, org: OrganizationId, number: &str) -> Result<()>;

    /// Ids of organizations with at least one phone number containing
    /// `pattern` case-insensitively, ascending.
    fn organizations_by_phone_pattern(&self, pattern: &str) -> Result<Vec<OrganizationId>>;

    /// Entity counts.
    fn stats(&self) -> Result<StoreStats>;
}

/// Store statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub buildings: usize,
    pub activities: usize,
    pub organizations: usize,
    /// Number of (organization, phone number) pairs.
    pub phone_links: usize,
}

/// In-memory store backed by ordered maps.
///
/// Identifiers are assigned sequentially starting at 1. Every write runs
/// inside one lock acquisition, so multi-row operations such as phone set
/// replacement are atomic as required by the [`Store`] contract.
pub struct MemoryStore {
    inner: RwLock<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    buildings: BTreeMap<BuildingId, Building>,
    addresses: FxHashSet<String>,
    activities: BTreeMap<ActivityId, Activity>,
    organizations: BTreeMap<OrganizationId, Organization>,
    phones: PhoneIndex,
    next_building_id: BuildingId,
    next_activity_id: ActivityId,
    next_organization_id: OrganizationId,
}

impl MemoryInner {
    fn check_building(&self, id: BuildingId) -> Result<()> {
        if self.buildings.contains_key(&id) {
            Ok(())
        } else {
            Err(DirectoryError::BuildingNotFound(id))
        }
    }

    fn check_activities(&self, ids: &[ActivityId]) -> Result<()> {
        for id in ids {
            if !self.activities.contains_key(id) {
                return Err(DirectoryError::ActivityNotFound(*id));
            }
        }
        Ok(())
    }

    fn require_organization(&self, id: OrganizationId) -> Result<&Organization> {
        self.organizations
            .get(&id)
            .ok_or(DirectoryError::OrganizationNotFound(id))
    }
}

impl MemoryStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryInner::default()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for MemoryStore {
    fn building(&self, id: BuildingId) -> Result<Option<Building>> {
        Ok(self.inner.read().buildings.get(&id).cloned())
    }

    fn buildings(&self, skip: usize, limit: usize) -> Result<Vec<Building>> {
        Ok(self
            .inner
            .read()
            .buildings
            .values()
            .skip(skip)
            .take(limit)
            .cloned()
            .collect())
    }

    fn insert_building(&self, new: NewBuilding) -> Result<Building> {
        let mut inner = self.inner.write();
        if inner.addresses.contains(&new.address) {
            return Err(DirectoryError::DuplicateAddress(new.address));
        }

        inner.next_building_id += 1;
        let building = Building {
            id: inner.next_building_id,
            address: new.address,
            latitude: new.latitude,
            longitude: new.longitude,
        };
        inner.addresses.insert(building.address.clone());
        inner.buildings.insert(building.id, building.clone());
        Ok(building)
    }

    fn activity(&self, id: ActivityId) -> Result<Option<Activity>> {
        Ok(self.inner.read().activities.get(&id).cloned())
    }

    fn activities_where(&self, predicate: &dyn Fn(&Activity) -> bool) -> Result<Vec<Activity>> {
        Ok(self
            .inner
            .read()
            .activities
            .values()
            .filter(|activity| predicate(activity))
            .cloned()
            .collect())
    }

    fn insert_activity(&self, new: NewActivity) -> Result<Activity> {
        let mut inner = self.inner.write();
        if let Some(parent) = new.parent_id
            && !inner.activities.contains_key(&parent)
        {
            return Err(DirectoryError::ActivityNotFound(parent));
        }

        inner.next_activity_id += 1;
        let activity = Activity {
            id: inner.next_activity_id,
            name: new.name,
            parent_id: new.parent_id,
        };
        inner.activities.insert(activity.id, activity.clone());
        Ok(activity)
    }

    fn organization(&self, id: OrganizationId) -> Result<Option<Organization>> {
        Ok(self.inner.read().organizations.get(&id).cloned())
    }

    fn organizations_where(
        &self,
        predicate: &dyn Fn(&Organization) -> bool,
        skip: usize,
        limit: usize,
    ) -> Result<Vec<Organization>> {
        Ok(self
            .inner
            .read()
            .organizations
            .values()
            .filter(|org| predicate(org))
            .skip(skip)
            .take(limit)
            .cloned()
            .collect())
    }

    fn insert_organization(&self, new: NewOrganization) -> Result<Organization> {
        let mut inner = self.inner.write();
        inner.check_building(new.building_id)?;
        inner.check_activities(&new.activity_ids)?;

        inner.next_organization_id += 1;
        let organization = Organization {
            id: inner.next_organization_id,
            name: new.name,
            building_id: new.building_id,
            activities: new.activity_ids.iter().copied().collect::<BTreeSet<_>>(),
        };
        inner
            .organizations
            .insert(organization.id, organization.clone());
        if !new.phone_numbers.is_empty() {
            inner.phones.replace(organization.id, &new.phone_numbers);
        }
        Ok(organization)
    }

    fn update_organization(
        &self,
        id: OrganizationId,
        patch: OrganizationPatch,
    ) -> Result<Option<Organization>> {
        let mut inner = self.inner.write();
        if !inner.organizations.contains_key(&id) {
            return Ok(None);
        }

        if let Some(building_id) = patch.building_id {
            inner.check_building(building_id)?;
        }
        if let Some(activity_ids) = &patch.activity_ids {
            inner.check_activities(activity_ids)?;
        }

        if let Some(numbers) = &patch.phone_numbers {
            inner.phones.replace(id, numbers);
        }

        let Some(org) = inner.organizations.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = patch.name {
            org.name = name;
        }
        if let Some(building_id) = patch.building_id {
            org.building_id = building_id;
        }
        if let Some(activity_ids) = patch.activity_ids {
            org.activities = activity_ids.into_iter().collect();
        }
        Ok(Some(org.clone()))
    }

    fn delete_organization(&self, id: OrganizationId) -> Result<bool> {
        let mut inner = self.inner.write();
        let removed = inner.organizations.remove(&id).is_some();
        if removed {
            inner.phones.purge(id);
        }
        Ok(removed)
    }

    fn activities_of(&self, org: OrganizationId) -> Result<Vec<Activity>> {
        let inner = self.inner.read();
        let organization = inner.require_organization(org)?;
        Ok(organization
            .activities
            .iter()
            .filter_map(|id| inner.activities.get(id))
            .cloned()
            .collect())
    }

    fn set_activities(&self, org: OrganizationId, activity_ids: &[ActivityId]) -> Result<()> {
        let mut inner = self.inner.write();
        inner.require_organization(org)?;
        inner.check_activities(activity_ids)?;

        let Some(organization) = inner.organizations.get_mut(&org) else {
            return Err(DirectoryError::OrganizationNotFound(org));
        };
        organization.activities = activity_ids.iter().copied().collect();
        Ok(())
    }

    fn phones_of(&self, org: OrganizationId) -> Result<Vec<String>> {
        Ok(self.inner.read().phones.phones_of(org))
    }

    fn replace_phones(&self, org: OrganizationId, numbers: &[String]) -> Result<()> {
        let mut inner = self.inner.write();
        inner.require_organization(org)?;
        inner.phones.replace(org, numbers);
        Ok(())
    }

    fn add_phone(&self, org: OrganizationId, number: &str) -> Result<()> {
        let mut inner = self.inner.write();
        inner.require_organization(org)?;
        inner.phones.add(org, number);
        Ok(())
    }

    fn remove_phone(&self, org: OrganizationId, number: &str) -> Result<()> {
        let mut inner = self.inner.write();
        inner.require_organization(org)?;
        inner.phones.remove(org, number);
        Ok(())
    }

    fn organizations_by_phone_pattern(&self, pattern: &str) -> Result<Vec<OrganizationId>> {
        Ok(self.inner.read().phones.matching(pattern))
    }

    fn stats(&self) -> Result<StoreStats> {
        let inner = self.inner.read();
        Ok(StoreStats {
            buildings: inner.buildings.len(),
            activities: inner.activities.len(),
            organizations: inner.organizations.len(),
            phone_links: inner.phones.link_count(),
        })
    }
}
