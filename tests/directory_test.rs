use geodir::{
    Config, Directory, DirectoryError, NewActivity, NewBuilding, NewOrganization,
    OrganizationPatch,
};

fn seeded() -> Directory {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = Directory::memory();

    dir.add_building(NewBuilding {
        address: "1 Lenina St".into(),
        latitude: 55.7558,
        longitude: 37.6173,
    })
    .unwrap();
    dir.add_building(NewBuilding {
        address: "2 Tverskaya St".into(),
        latitude: 55.76,
        longitude: 37.62,
    })
    .unwrap();

    let food = dir
        .add_activity(NewActivity {
            name: "Food".into(),
            parent_id: None,
        })
        .unwrap();
    dir.add_activity(NewActivity {
        name: "Meat".into(),
        parent_id: Some(food.id),
    })
    .unwrap();

    dir.add_organization(NewOrganization {
        name: "Horns and Hooves".into(),
        building_id: 1,
        phone_numbers: vec!["2-222-222".into(), "3-333-333".into()],
        activity_ids: vec![2],
    })
    .unwrap();

    dir
}

#[test]
fn test_basic_lookups() {
    let dir = seeded();

    let building = dir.building(1).unwrap();
    assert_eq!(building.address, "1 Lenina St");

    let activity = dir.activity(2).unwrap();
    assert_eq!(activity.name, "Meat");
    assert_eq!(activity.parent_id, Some(1));

    let org = dir.organization(1).unwrap();
    assert_eq!(org.name, "Horns and Hooves");
    assert_eq!(org.building.id, 1);
    assert_eq!(org.activities.len(), 1);
    assert_eq!(org.activities[0].name, "Meat");
}

#[test]
fn test_not_found_errors() {
    let dir = seeded();

    assert!(matches!(
        dir.building(99).unwrap_err(),
        DirectoryError::BuildingNotFound(99)
    ));
    assert!(matches!(
        dir.activity(99).unwrap_err(),
        DirectoryError::ActivityNotFound(99)
    ));
    assert!(matches!(
        dir.organization(99).unwrap_err(),
        DirectoryError::OrganizationNotFound(99)
    ));
}

#[test]
fn test_duplicate_address_rejected() {
    let dir = seeded();

    let err = dir
        .add_building(NewBuilding {
            address: "1 Lenina St".into(),
            latitude: 0.0,
            longitude: 0.0,
        })
        .unwrap_err();
    assert!(matches!(err, DirectoryError::DuplicateAddress(_)));
}

#[test]
fn test_organization_references_must_exist() {
    let dir = seeded();

    let err = dir
        .add_organization(NewOrganization {
            name: "Ghost".into(),
            building_id: 42,
            phone_numbers: vec![],
            activity_ids: vec![],
        })
        .unwrap_err();
    assert!(matches!(err, DirectoryError::BuildingNotFound(42)));

    let err = dir
        .add_organization(NewOrganization {
            name: "Ghost".into(),
            building_id: 1,
            phone_numbers: vec![],
            activity_ids: vec![42],
        })
        .unwrap_err();
    assert!(matches!(err, DirectoryError::ActivityNotFound(42)));
}

#[test]
fn test_phone_replace_round_trip() {
    let dir = seeded();

    let numbers = vec!["8-800-100".to_string(), "8-800-200".to_string()];
    dir.set_phones(1, &numbers).unwrap();

    let mut phones = dir.phones_of(1).unwrap();
    phones.sort();
    assert_eq!(phones, numbers);

    // Replace is not a merge
    dir.set_phones(1, &["9-900-000".to_string()]).unwrap();
    assert_eq!(dir.phones_of(1).unwrap(), vec!["9-900-000".to_string()]);
}

#[test]
fn test_phone_add_remove_idempotent() {
    let dir = seeded();

    dir.add_phone(1, "4-444-444").unwrap();
    dir.add_phone(1, "4-444-444").unwrap();
    let before = dir.phones_of(1).unwrap().len();

    dir.remove_phone(1, "4-444-444").unwrap();
    dir.remove_phone(1, "4-444-444").unwrap();
    assert_eq!(dir.phones_of(1).unwrap().len(), before - 1);

    // Unknown organization is an error for writes
    assert!(dir.add_phone(99, "1-111-111").is_err());
}

#[test]
fn test_update_organization_patch() {
    let dir = seeded();

    // Name-only patch leaves everything else alone
    let updated = dir
        .update_organization(
            1,
            OrganizationPatch {
                name: Some("Hooves and Horns".into()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(updated.name, "Hooves and Horns");
    assert_eq!(updated.building.id, 1);
    assert_eq!(updated.phone_numbers.len(), 2);

    // Rehome and clear activities in one patch
    let updated = dir
        .update_organization(
            1,
            OrganizationPatch {
                building_id: Some(2),
                activity_ids: Some(vec![]),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(updated.building.id, 2);
    assert!(updated.activities.is_empty());

    assert!(matches!(
        dir.update_organization(99, OrganizationPatch::default())
            .unwrap_err(),
        DirectoryError::OrganizationNotFound(99)
    ));
}

#[test]
fn test_delete_organization() {
    let dir = seeded();

    dir.delete_organization(1).unwrap();
    assert!(dir.organization(1).is_err());
    assert!(dir.phones_of(1).unwrap().is_empty());

    // Second delete reports not found
    assert!(matches!(
        dir.delete_organization(1).unwrap_err(),
        DirectoryError::OrganizationNotFound(1)
    ));
}

#[test]
fn test_set_activities() {
    let dir = seeded();

    dir.set_activities(1, &[1]).unwrap();
    let org = dir.organization(1).unwrap();
    assert_eq!(org.activities.len(), 1);
    assert_eq!(org.activities[0].id, 1);

    assert!(dir.set_activities(1, &[42]).is_err());
}

#[test]
fn test_stats() {
    let dir = seeded();
    let stats = dir.stats().unwrap();

    assert_eq!(stats.buildings, 2);
    assert_eq!(stats.activities, 2);
    assert_eq!(stats.organizations, 1);
    assert_eq!(stats.phone_links, 2);
}

#[test]
fn test_listing_defaults_come_from_config() {
    let dir = Directory::builder()
        .config(Config::default().with_default_page_limit(1))
        .build()
        .unwrap();

    dir.add_building(NewBuilding {
        address: "a".into(),
        latitude: 0.0,
        longitude: 0.0,
    })
    .unwrap();
    dir.add_building(NewBuilding {
        address: "b".into(),
        latitude: 0.0,
        longitude: 0.0,
    })
    .unwrap();

    assert_eq!(dir.buildings(0, None).unwrap().len(), 1);
    assert_eq!(dir.buildings(0, Some(10)).unwrap().len(), 2);
}
