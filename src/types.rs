//! Core entity and boundary types for the directory.
//!
//! Entities (`Building`, `Activity`, `Organization`) mirror the persisted
//! rows owned by the store. Boundary types (`OrganizationRecord`,
//! `ActivityNode`) are the enriched shapes handed to the API layer.

use geo::Point;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Identifier of a building row.
pub type BuildingId = i64;
/// Identifier of an activity row.
pub type ActivityId = i64;
/// Identifier of an organization row.
pub type OrganizationId = i64;

/// A geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// The equivalent `geo` point (x = longitude, y = latitude).
    pub fn point(&self) -> Point {
        Point::new(self.longitude, self.latitude)
    }
}

/// A building with a unique postal address and a fixed location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub id: BuildingId,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Building {
    /// Location of the building as a coordinate pair.
    pub fn location(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// A node in the business-activity taxonomy.
///
/// Activities form a forest through `parent_id`; a `None` parent marks a
/// root. The parent graph is required to be acyclic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    pub name: String,
    pub parent_id: Option<ActivityId>,
}

/// An organization located in exactly one building and tagged with a set
/// of activities. Phone numbers live in a separate multi-valued
/// association owned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub id: OrganizationId,
    pub name: String,
    pub building_id: BuildingId,
    /// Associated activity ids, deduplicated and ordered.
    #[serde(default)]
    pub activities: BTreeSet<ActivityId>,
}

/// Payload for creating a building.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBuilding {
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Payload for creating an activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewActivity {
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<ActivityId>,
}

/// Payload for creating an organization, optionally with initial phone
/// numbers and activity links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrganization {
    pub name: String,
    pub building_id: BuildingId,
    #[serde(default)]
    pub phone_numbers: Vec<String>,
    #[serde(default)]
    pub activity_ids: Vec<ActivityId>,
}

/// Partial update for an organization.
///
/// Each field carries its own presence flag: an absent field leaves the
/// current value untouched, while `Some(vec![])` for the collection fields
/// replaces the association with an empty set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrganizationPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub building_id: Option<BuildingId>,
    #[serde(default)]
    pub phone_numbers: Option<Vec<String>>,
    #[serde(default)]
    pub activity_ids: Option<Vec<ActivityId>>,
}

impl OrganizationPatch {
    /// True when no field is present, i.e. applying the patch is a no-op.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.building_id.is_none()
            && self.phone_numbers.is_none()
            && self.activity_ids.is_none()
    }
}

/// Flat activity reference embedded in enriched organization records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRef {
    pub id: ActivityId,
    pub name: String,
    pub parent_id: Option<ActivityId>,
}

impl From<&Activity> for ActivityRef {
    fn from(activity: &Activity) -> Self {
        Self {
            id: activity.id,
            name: activity.name.clone(),
            parent_id: activity.parent_id,
        }
    }
}

/// A materialized node of the activity tree.
///
/// `level` is the depth relative to the traversal root; roots are level 0.
/// `children` holds the next level, empty once the requested depth is
/// reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityNode {
    pub id: ActivityId,
    pub name: String,
    pub parent_id: Option<ActivityId>,
    pub level: usize,
    pub children: Vec<ActivityNode>,
}

/// Enriched organization shape returned by lookups and searches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationRecord {
    pub id: OrganizationId,
    pub name: String,
    pub building: Building,
    pub activities: Vec<ActivityRef>,
    pub phone_numbers: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_point_axis_order() {
        let moscow = Coordinate::new(55.7558, 37.6173);
        let point = moscow.point();
        assert_eq!(point.x(), 37.6173);
        assert_eq!(point.y(), 55.7558);
    }

    #[test]
    fn test_empty_patch() {
        let patch = OrganizationPatch::default();
        assert!(patch.is_empty());

        let patch = OrganizationPatch {
            phone_numbers: Some(Vec::new()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_organization_record_shape() {
        let record = OrganizationRecord {
            id: 1,
            name: "Acme".into(),
            building: Building {
                id: 7,
                address: "1 Main St".into(),
                latitude: 40.7,
                longitude: -74.0,
            },
            activities: vec![ActivityRef {
                id: 3,
                name: "Retail".into(),
                parent_id: None,
            }],
            phone_numbers: vec!["5-555-555".into()],
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["building"]["address"], "1 Main St");
        assert_eq!(json["activities"][0]["id"], 3);
        assert_eq!(json["phone_numbers"][0], "5-555-555");
    }

    #[test]
    fn test_new_organization_defaults() {
        let payload: NewOrganization =
            serde_json::from_str(r#"{"name": "Acme", "building_id": 1}"#).unwrap();
        assert!(payload.phone_numbers.is_empty());
        assert!(payload.activity_ids.is_empty());
    }
}
