//! Business rules every appointment must satisfy before it is written
//!
//! The booking form and the actions layer both call [`validate`], so a
//! record the form accepts is exactly a record the server accepts.

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike, Weekday};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use crate::models::{AppointmentInput, Stylist, ValidAppointment};

/// First bookable hour of the day
pub const OPENING_HOUR: u32 = 8;
/// Bookings must start before this hour
pub const CLOSING_HOUR: u32 = 20;
/// Spacing of the start times offered by the booking form
pub const SLOT_MINUTES: u32 = 30;

/// Optional leading `+`, then at least eight digits, spaces, hyphens or parentheses
static PHONE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9\s\-()]{8,}$").expect("phone pattern compiles"));

/// Booking form fields, named as clients send them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    ClientName,
    PhoneNumber,
    Date,
    Time,
    Stylist,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::ClientName,
        Field::PhoneNumber,
        Field::Date,
        Field::Time,
        Field::Stylist,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::ClientName => "clientName",
            Field::PhoneNumber => "phoneNumber",
            Field::Date => "date",
            Field::Time => "time",
            Field::Stylist => "stylist",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Human-readable error per failing field; empty means valid
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn remove(&mut self, field: Field) -> Option<String> {
        self.0.remove(&field)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// Check a draft against every rule, collecting all failures
pub fn validate(input: &AppointmentInput) -> Result<ValidAppointment, FieldErrors> {
    let mut errors = FieldErrors::new();

    let client_name = input.client_name.trim();
    if client_name.is_empty() {
        errors.insert(Field::ClientName, "Client name is required");
    }

    let phone_number = input.phone_number.trim();
    if phone_number.is_empty() {
        errors.insert(Field::PhoneNumber, "Phone number is required");
    } else if !PHONE_NUMBER.is_match(phone_number) {
        errors.insert(Field::PhoneNumber, "Please enter a valid phone number");
    }

    let date = check_date(&input.date).map_err(|message| errors.insert(Field::Date, message));
    let time = check_time(&input.time).map_err(|message| errors.insert(Field::Time, message));
    let stylist =
        check_stylist(&input.stylist).map_err(|message| errors.insert(Field::Stylist, message));

    match (date, time, stylist) {
        (Ok(date), Ok(time), Ok(stylist)) if errors.is_empty() => Ok(ValidAppointment {
            client_name: client_name.to_string(),
            phone_number: phone_number.to_string(),
            date,
            time,
            stylist,
        }),
        _ => Err(errors),
    }
}

fn check_date(raw: &str) -> Result<NaiveDate, &'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("Date is required");
    }
    let date =
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| "Please enter a valid date")?;
    if date.weekday() == Weekday::Sun {
        return Err("The salon is closed on Sundays");
    }
    Ok(date)
}

fn check_time(raw: &str) -> Result<NaiveTime, &'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("Time is required");
    }
    let time = NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| "Please enter a valid time")?;
    if !is_within_opening_hours(time) {
        return Err("The salon is open from 8 AM to 8 PM");
    }
    // Seconds are not part of a booking.
    time.with_second(0).ok_or("Please enter a valid time")
}

fn check_stylist(raw: &str) -> Result<Stylist, &'static str> {
    if raw.trim().is_empty() {
        return Err("Stylist is required");
    }
    raw.parse::<Stylist>()
        .map_err(|_| "Please choose one of our stylists")
}

pub fn is_within_opening_hours(time: NaiveTime) -> bool {
    (OPENING_HOUR..CLOSING_HOUR).contains(&time.hour())
}

/// Start times the booking form offers: 08:00 through 19:30
pub fn time_slots() -> Vec<NaiveTime> {
    (OPENING_HOUR * 60..CLOSING_HOUR * 60)
        .step_by(SLOT_MINUTES as usize)
        .filter_map(|minutes| NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2025-01-06 is a Monday, 2025-01-05 a Sunday.
    fn monday_booking() -> AppointmentInput {
        AppointmentInput::new("Ana", "+1 555 1234", "2025-01-06", "09:00", "Emma")
    }

    #[test]
    fn accepts_a_regular_booking() {
        let valid = validate(&monday_booking()).unwrap();
        assert_eq!(valid.client_name, "Ana");
        assert_eq!(valid.stylist, Stylist::Emma);
        assert_eq!(valid.time, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
    }

    #[test]
    fn trims_name_and_phone() {
        let mut input = monday_booking();
        input.client_name = "  Ana Lopez ".to_string();
        input.phone_number = " (030) 123-4567 ".to_string();

        let valid = validate(&input).unwrap();
        assert_eq!(valid.client_name, "Ana Lopez");
        assert_eq!(valid.phone_number, "(030) 123-4567");
    }

    #[test]
    fn sundays_fail_regardless_of_other_fields() {
        let mut input = monday_booking();
        input.date = "2025-01-05".to_string();
        let errors = validate(&input).unwrap_err();
        assert_eq!(errors.get(Field::Date), Some("The salon is closed on Sundays"));
        assert_eq!(errors.len(), 1);

        let broken = AppointmentInput::new("", "12", "2025-01-12", "21:00", "");
        let errors = validate(&broken).unwrap_err();
        assert_eq!(errors.get(Field::Date), Some("The salon is closed on Sundays"));
        assert_eq!(errors.len(), 5);
    }

    #[test]
    fn hours_outside_opening_time_fail() {
        for time in ["07:59", "20:00", "20:30", "00:00", "23:45"] {
            let mut input = monday_booking();
            input.time = time.to_string();
            let errors = validate(&input).unwrap_err();
            assert_eq!(
                errors.get(Field::Time),
                Some("The salon is open from 8 AM to 8 PM"),
                "time {}",
                time
            );
        }
        for time in ["08:00", "12:15", "19:59"] {
            let mut input = monday_booking();
            input.time = time.to_string();
            assert!(validate(&input).is_ok(), "time {}", time);
        }
    }

    #[test]
    fn malformed_values_report_invalid() {
        let input = AppointmentInput::new("Ana", "call me", "06/01/2025", "nine", "Emma");
        let errors = validate(&input).unwrap_err();
        assert_eq!(errors.get(Field::PhoneNumber), Some("Please enter a valid phone number"));
        assert_eq!(errors.get(Field::Date), Some("Please enter a valid date"));
        assert_eq!(errors.get(Field::Time), Some("Please enter a valid time"));
        assert!(!errors.contains(Field::ClientName));
    }

    #[test]
    fn phone_pattern() {
        for phone in ["+1 555 1234", "01234567", "(030) 12-34", "+49 (0) 30 1234567"] {
            assert!(PHONE_NUMBER.is_match(phone), "{}", phone);
        }
        for phone in ["1234567", "+1 555 12a4", "++12345678", "555.123.4567"] {
            assert!(!PHONE_NUMBER.is_match(phone), "{}", phone);
        }
    }

    #[test]
    fn unknown_stylist_is_rejected() {
        let mut input = monday_booking();
        input.stylist = "Pierre".to_string();
        let errors = validate(&input).unwrap_err();
        assert_eq!(errors.get(Field::Stylist), Some("Please choose one of our stylists"));

        input.stylist = "   ".to_string();
        let errors = validate(&input).unwrap_err();
        assert_eq!(errors.get(Field::Stylist), Some("Stylist is required"));
    }

    #[test]
    fn empty_draft_reports_every_field() {
        let errors = validate(&AppointmentInput::default()).unwrap_err();
        for field in Field::ALL {
            assert!(errors.contains(field), "{}", field);
        }
        assert_eq!(errors.get(Field::Time), Some("Time is required"));
    }

    #[test]
    fn slots_cover_opening_hours() {
        let slots = time_slots();
        assert_eq!(slots.len(), 24);
        assert_eq!(slots.first(), NaiveTime::from_hms_opt(8, 0, 0).as_ref());
        assert_eq!(slots.last(), NaiveTime::from_hms_opt(19, 30, 0).as_ref());
        assert!(slots.iter().all(|slot| is_within_opening_hours(*slot)));
    }
}
