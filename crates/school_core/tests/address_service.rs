use school_core::db::open_db_in_memory;
use school_core::{
    AddressRecord, AddressService, EntityKind, SchoolConfig, ServiceError, SqliteSchoolRepository,
};

fn address_record(city: &str) -> AddressRecord {
    AddressRecord {
        id: None,
        street: "10 Station Rd".to_string(),
        city: city.to_string(),
        country: "TR".to_string(),
    }
}

#[test]
fn create_get_update_delete_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSchoolRepository::try_new(&conn).unwrap();
    let service = AddressService::new(repo, SchoolConfig::default());

    let created = service.create_address(&address_record("Izmir")).unwrap();
    let id = created.id.unwrap();
    assert_eq!(service.get_address(id).unwrap(), created);

    let updated = service.update_address(&address_record("Ankara"), id).unwrap();
    assert_eq!(updated.city, "Ankara");
    assert_eq!(updated.id, Some(id));

    assert_eq!(
        service.delete_address(id).unwrap(),
        format!("Address with id = {id} Deleted....")
    );
    assert!(matches!(
        service.get_address(id),
        Err(ServiceError::NotFound {
            kind: EntityKind::Address,
            ..
        })
    ));
}

#[test]
fn missing_address_operations_signal_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSchoolRepository::try_new(&conn).unwrap();
    let service = AddressService::new(repo, SchoolConfig::default());

    assert!(matches!(
        service.update_address(&address_record("Nowhere"), 3),
        Err(ServiceError::NotFound { id: 3, .. })
    ));
    assert!(matches!(
        service.delete_address(3),
        Err(ServiceError::NotFound { id: 3, .. })
    ));
}

#[test]
fn list_signals_empty_then_returns_rows_in_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSchoolRepository::try_new(&conn).unwrap();
    let service = AddressService::new(repo, SchoolConfig::default());

    let err = service.list_addresses().unwrap_err();
    assert!(matches!(err, ServiceError::EmptyList(EntityKind::Address)));
    assert_eq!(err.to_string(), "Address list is empty");

    service.create_address(&address_record("Bursa")).unwrap();
    service.create_address(&address_record("Adana")).unwrap();
    let cities: Vec<_> = service
        .list_addresses()
        .unwrap()
        .into_iter()
        .map(|address| address.city)
        .collect();
    assert_eq!(cities, ["Bursa", "Adana"]);
    assert_eq!(service.number_of_students().unwrap(), 0);
}
