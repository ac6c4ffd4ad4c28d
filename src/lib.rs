//! Embedded organization directory with activity hierarchies and
//! geospatial search.
//!
//! ```rust
//! use geodir::{Coordinate, Directory, NewBuilding, NewOrganization};
//!
//! let dir = Directory::memory();
//! let hq = dir.add_building(NewBuilding {
//!     address: "1 Main St".into(),
//!     latitude: 55.7558,
//!     longitude: 37.6173,
//! })?;
//! dir.add_organization(NewOrganization {
//!     name: "Horns and Hooves".into(),
//!     building_id: hq.id,
//!     phone_numbers: vec!["5-555-555".into()],
//!     activity_ids: vec![],
//! })?;
//!
//! let center = Coordinate::new(55.7558, 37.6173);
//! let nearby = dir.search_in_radius(&center, 1.0)?;
//! assert_eq!(nearby.len(), 1);
//! # Ok::<(), geodir::DirectoryError>(())
//! ```

pub mod builder;
pub mod config;
pub mod directory;
pub mod error;
pub mod hierarchy;
pub mod phone;
pub mod search;
pub mod spatial;
pub mod store;
pub mod types;

pub use builder::DirectoryBuilder;
pub use config::Config;
pub use directory::Directory;
pub use error::{DirectoryError, Result};

pub type Geodir = Directory;

pub use hierarchy::HierarchyIndex;

pub use search::{DEFAULT_LIMIT, SearchEngine, SearchFilters};

pub use spatial::{Rectangle, distance_km, within_radius};

pub use store::{MemoryStore, Store, StoreStats};

pub use types::{
    Activity, ActivityId, ActivityNode, ActivityRef, Building, BuildingId, Coordinate,
    NewActivity, NewBuilding, NewOrganization, Organization, OrganizationId, OrganizationPatch,
    OrganizationRecord,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{Directory, DirectoryBuilder, DirectoryError, Geodir, Result};

    pub use crate::{Config, SearchFilters};

    pub use crate::spatial::{Rectangle, distance_km, within_radius};

    pub use crate::{MemoryStore, Store};

    pub use crate::{
        Activity, ActivityNode, Building, Coordinate, NewActivity, NewBuilding, NewOrganization,
        Organization, OrganizationPatch, OrganizationRecord,
    };
}
