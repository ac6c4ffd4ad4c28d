use geodir::spatial::{Rectangle, distance_km};
use geodir::{Coordinate, Directory, NewBuilding, NewOrganization};

fn org_in_building(dir: &Directory, name: &str, building_id: i64) {
    dir.add_organization(NewOrganization {
        name: name.into(),
        building_id,
        phone_numbers: vec![],
        activity_ids: vec![],
    })
    .unwrap();
}

fn seeded() -> Directory {
    let dir = Directory::memory();

    // Central Moscow, a nearby street, and a city ~180 km south
    for (address, lat, lon) in [
        ("1 Lenina St", 55.7558, 37.6173),
        ("2 Tverskaya St", 55.76, 37.62),
        ("8 Southern Rd", 54.0, 37.62),
    ] {
        dir.add_building(NewBuilding {
            address: address.into(),
            latitude: lat,
            longitude: lon,
        })
        .unwrap();
    }

    org_in_building(&dir, "Central Cafe", 1);
    org_in_building(&dir, "Corner Shop", 2);
    org_in_building(&dir, "Southern Depot", 3);

    dir
}

#[test]
fn test_distance_properties() {
    let moscow = Coordinate::new(55.7558, 37.6173);
    let south = Coordinate::new(54.0, 37.62);

    assert_eq!(distance_km(&moscow, &moscow), 0.0);
    assert!((distance_km(&moscow, &south) - distance_km(&south, &moscow)).abs() < 1e-9);
    assert!(distance_km(&moscow, &south) > 150.0);
}

#[test]
fn test_radius_includes_zero_distance_match() {
    let dir = seeded();
    let center = Coordinate::new(55.7558, 37.6173);

    let results = dir.search_in_radius(&center, 0.001).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "Central Cafe");
}

#[test]
fn test_radius_membership_is_monotonic() {
    let dir = seeded();
    let center = Coordinate::new(55.7558, 37.6173);

    let mut previous = 0;
    for radius_km in [0.001, 5.0, 500.0] {
        let results = dir.search_in_radius(&center, radius_km).unwrap();
        assert!(results.len() >= previous);
        previous = results.len();
    }
    assert_eq!(previous, 3);
}

#[test]
fn test_rectangle_search() {
    let dir = seeded();

    let results = dir
        .search_in_rectangle(&Coordinate::new(56.0, 38.0), &Coordinate::new(55.0, 37.0))
        .unwrap();
    let names: Vec<_> = results.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Central Cafe", "Corner Shop"]);
}

#[test]
fn test_rectangle_edges_are_inclusive() {
    let dir = Directory::memory();
    dir.add_building(NewBuilding {
        address: "On the corner".into(),
        latitude: 55.0,
        longitude: 37.0,
    })
    .unwrap();
    org_in_building(&dir, "Edge Case Inc", 1);

    let results = dir
        .search_in_rectangle(&Coordinate::new(56.0, 38.0), &Coordinate::new(55.0, 37.0))
        .unwrap();
    assert_eq!(results.len(), 1);
}

#[test]
fn test_inverted_rectangle_matches_nothing() {
    let dir = seeded();

    // West edge numerically beyond the east edge: treated as empty
    let results = dir
        .search_in_rectangle(&Coordinate::new(56.0, 37.0), &Coordinate::new(55.0, 38.0))
        .unwrap();
    assert!(results.is_empty());
}

#[test]
fn test_rectangle_membership_from_same_logical_corners() {
    let ne = Coordinate::new(56.0, 38.0);
    let sw = Coordinate::new(55.0, 37.0);
    let inside = Coordinate::new(55.76, 37.62);

    // Same logical NE/SW pair, same membership
    let a = Rectangle::new(ne, sw);
    let b = Rectangle {
        north_east: ne,
        south_west: sw,
    };
    assert_eq!(a.contains(&inside), b.contains(&inside));
    assert!(a.contains(&inside));
}

#[test]
fn test_geo_searches_are_not_paginated() {
    let dir = Directory::memory();
    dir.add_building(NewBuilding {
        address: "Mega Tower".into(),
        latitude: 55.7558,
        longitude: 37.6173,
    })
    .unwrap();
    for i in 0..120 {
        org_in_building(&dir, &format!("Tenant {i}"), 1);
    }

    let center = Coordinate::new(55.7558, 37.6173);
    assert_eq!(dir.search_in_radius(&center, 1.0).unwrap().len(), 120);
    assert_eq!(
        dir.search_in_rectangle(&Coordinate::new(56.0, 38.0), &Coordinate::new(55.0, 37.0))
            .unwrap()
            .len(),
        120
    );
}
