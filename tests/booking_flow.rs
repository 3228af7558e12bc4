use chrono::{Datelike, Duration, Local, NaiveDate};
use std::sync::Arc;

use salon_booking::booking::SubmitOutcome;
use salon_booking::config::{BookingOptions, StoreBackend};
use salon_booking::events::AppointmentChange;
use salon_booking::prelude::*;
use salon_booking::store::{LocalStore, MemoryStore};

fn next_monday() -> NaiveDate {
    let today = Local::now().date_naive();
    let ahead = 7 - today.weekday().num_days_from_monday() as i64;
    today + Duration::days(ahead)
}

fn booking(date: NaiveDate, time: &str) -> AppointmentInput {
    AppointmentInput::new(
        "Ana",
        "+1 555 1234",
        date.format("%Y-%m-%d").to_string(),
        time,
        "Emma",
    )
}

#[tokio::test]
async fn monday_booking_is_listed_before_later_ones() {
    let salon = Salon::in_memory();
    let monday = next_monday();

    let bea = AppointmentInput::new(
        "Bea",
        "+44 20 7946 0958",
        monday.to_string(),
        "16:30",
        "Sophie",
    );
    let later = salon.actions().create(&bea).await.unwrap();

    let result = salon.actions().create_appointment(&booking(monday, "09:00")).await;
    assert!(result.is_success(), "{:?}", result);
    let ana = result.appointment.unwrap();
    assert_eq!(ana.client_name, "Ana");
    assert_eq!(ana.phone_number, "+1 555 1234");
    assert_eq!(ana.date, monday);
    assert_eq!(ana.time.format("%H:%M").to_string(), "09:00");
    assert_eq!(ana.stylist, "Emma");

    let listed = salon.actions().fetch_appointments().await;
    assert_eq!(listed, vec![ana, later]);
}

#[tokio::test]
async fn sunday_booking_is_rejected_without_a_write() {
    let salon = Salon::in_memory();
    let sunday = next_monday() + Duration::days(6);

    let result = salon.actions().create_appointment(&booking(sunday, "09:00")).await;
    assert!(!result.is_success());
    assert_eq!(result.message, "Failed to create appointment");
    assert_eq!(
        result.errors.get(Field::Date),
        Some("The salon is closed on Sundays")
    );
    assert!(salon.actions().fetch_appointments().await.is_empty());
}

#[tokio::test]
async fn hours_outside_opening_time_are_rejected() {
    let salon = Salon::in_memory();
    let monday = next_monday();

    for time in ["07:59", "20:00", "23:30"] {
        let err = salon.actions().create(&booking(monday, time)).await.unwrap_err();
        let errors = err.field_errors().unwrap();
        assert!(errors.contains(Field::Time), "{} accepted", time);
    }
    assert!(salon.actions().create(&booking(monday, "19:59")).await.is_ok());
}

#[tokio::test]
async fn identical_creates_make_two_records() {
    let salon = Salon::in_memory();
    let input = booking(next_monday(), "10:00");

    let first = salon.actions().create(&input).await.unwrap();
    let second = salon.actions().create(&input).await.unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(salon.actions().fetch_appointments().await.len(), 2);
}

#[tokio::test]
async fn update_replaces_the_whole_record() {
    let salon = Salon::in_memory();
    let monday = next_monday();
    let created = salon.actions().create(&booking(monday, "10:00")).await.unwrap();

    let replacement = AppointmentInput::new(
        "Carla",
        "(030) 1234-5678",
        (monday + Duration::days(1)).to_string(),
        "14:30",
        "Thomas",
    );
    let result = salon.actions().update_appointment(created.id, &replacement).await;
    assert_eq!(result.message, "Appointment updated successfully");

    let listed = salon.actions().fetch_appointments().await;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, created.id);
    assert_eq!(AppointmentInput::from(&listed[0]), replacement);
}

#[tokio::test]
async fn second_delete_reports_not_found() {
    let salon = Salon::in_memory();
    let created = salon.actions().create(&booking(next_monday(), "10:00")).await.unwrap();

    let first = salon.actions().delete_appointment(created.id).await;
    assert_eq!(first.message, "Appointment deleted successfully");
    assert!(salon.actions().fetch_appointments().await.is_empty());

    let second = salon.actions().delete_appointment(created.id).await;
    assert_eq!(second.message, "Failed to delete appointment");
    assert!(salon.actions().delete(created.id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn form_and_list_stay_in_step() {
    let salon = Salon::in_memory();
    let mut changes = salon.subscribe();
    let mut list = salon.booking_list().await;
    assert!(list.is_empty());

    let mut form = salon.booking_form();
    form.set_field(Field::ClientName, "Ana");
    form.set_field(Field::PhoneNumber, "+1 555 1234");
    form.set_field(Field::Date, next_monday().to_string());
    form.set_field(Field::Time, "09:00");
    form.set_field(Field::Stylist, "emma");

    let created = match form.submit(salon.actions()).await {
        SubmitOutcome::Created(appointment) => appointment,
        other => panic!("unexpected outcome {:?}", other),
    };
    assert_eq!(created.stylist, "Emma");
    assert_eq!(
        changes.recv().await.unwrap(),
        AppointmentChange::Created(created.clone())
    );

    assert_eq!(list.sync().await, 1);
    assert_eq!(list.view(), vec![created.clone()]);

    let result = list.delete_optimistic(created.id).await;
    assert!(result.is_success());
    assert!(list.is_empty());
}

#[tokio::test]
async fn local_store_keeps_bookings_between_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let options = BookingOptions::default()
        .with_backend(StoreBackend::Local)
        .with_data_file(dir.path().join("bookings.json"));

    let created = Salon::new(options.clone())
        .unwrap()
        .actions()
        .create(&booking(next_monday(), "11:00"))
        .await
        .unwrap();

    let reopened = Salon::new(options).unwrap();
    let list = reopened.booking_list().await;
    assert_eq!(list.view(), vec![created]);
}

#[tokio::test]
async fn stores_are_interchangeable() {
    let dir = tempfile::tempdir().unwrap();
    let stores: Vec<Arc<dyn AppointmentStore>> = vec![
        Arc::new(MemoryStore::new()),
        Arc::new(LocalStore::new(dir.path().join("bookings.json"))),
    ];

    for store in stores {
        let salon = Salon::with_store(BookingOptions::default(), store);
        let created = salon.actions().create(&booking(next_monday(), "12:00")).await.unwrap();
        assert_eq!(salon.actions().fetch_appointments().await, vec![created.clone()]);
        salon.actions().delete(created.id).await.unwrap();
        assert!(salon.actions().fetch_appointments().await.is_empty());
    }
}
