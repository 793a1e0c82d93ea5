use parcel_core::{Parcel, ParcelStatus, UNASSIGNED_NUMBER};

#[test]
fn parcel_new_starts_registered_and_unassigned() {
    let parcel = Parcel::new(1000, "Pskov, Voennaya 15", "2026-10-19T08:30:00Z");

    assert_eq!(parcel.number, UNASSIGNED_NUMBER);
    assert_eq!(parcel.client, 1000);
    assert_eq!(parcel.status, ParcelStatus::Registered);
    assert_eq!(parcel.address, "Pskov, Voennaya 15");
    assert_eq!(parcel.created_at, "2026-10-19T08:30:00Z");
    assert!(parcel.is_mutable());
}

#[test]
fn only_registered_parcels_are_mutable() {
    let mut parcel = Parcel::new(1, "somewhere", "2026-10-19T08:30:00Z");

    parcel.status = ParcelStatus::Sent;
    assert!(!parcel.is_mutable());

    parcel.status = ParcelStatus::Delivered;
    assert!(!parcel.is_mutable());
}

#[test]
fn status_lifecycle_ends_at_delivered() {
    assert_eq!(ParcelStatus::Registered.next(), Some(ParcelStatus::Sent));
    assert_eq!(ParcelStatus::Sent.next(), Some(ParcelStatus::Delivered));
    assert_eq!(ParcelStatus::Delivered.next(), None);
}

#[test]
fn unknown_status_string_is_rejected() {
    let err = "lost".parse::<ParcelStatus>().unwrap_err();
    assert_eq!(
        err.to_string(),
        "unknown parcel status `lost`; expected registered|sent|delivered"
    );
}

#[test]
fn parcel_serialization_uses_storage_status_names() {
    let mut parcel = Parcel::new(12, "Kazan, Bauman 7", "2026-10-19T08:30:00Z");
    parcel.number = 5;
    parcel.status = ParcelStatus::Sent;

    let json = serde_json::to_value(&parcel).unwrap();
    assert_eq!(json["number"], 5);
    assert_eq!(json["client"], 12);
    assert_eq!(json["status"], "sent");
    assert_eq!(json["address"], "Kazan, Bauman 7");
    assert_eq!(json["created_at"], "2026-10-19T08:30:00Z");

    let decoded: Parcel = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, parcel);
}
