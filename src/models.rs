//! Appointment records and the shapes they travel in

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Staff members clients can book with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stylist {
    Emma,
    Sophie,
    Thomas,
    Lukas,
    Marie,
}

impl Stylist {
    pub const ALL: [Stylist; 5] = [
        Stylist::Emma,
        Stylist::Sophie,
        Stylist::Thomas,
        Stylist::Lukas,
        Stylist::Marie,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Stylist::Emma => "Emma",
            Stylist::Sophie => "Sophie",
            Stylist::Thomas => "Thomas",
            Stylist::Lukas => "Lukas",
            Stylist::Marie => "Marie",
        }
    }
}

impl fmt::Display for Stylist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown stylist: {0}")]
pub struct UnknownStylist(pub String);

impl FromStr for Stylist {
    type Err = UnknownStylist;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Stylist::ALL
            .into_iter()
            .find(|stylist| stylist.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownStylist(wanted.to_string()))
    }
}

/// Raw booking fields as a client submits them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentInput {
    pub client_name: String,
    pub phone_number: String,
    pub date: String,
    pub time: String,
    pub stylist: String,
}

impl AppointmentInput {
    pub fn new(
        client_name: impl Into<String>,
        phone_number: impl Into<String>,
        date: impl Into<String>,
        time: impl Into<String>,
        stylist: impl Into<String>,
    ) -> Self {
        Self {
            client_name: client_name.into(),
            phone_number: phone_number.into(),
            date: date.into(),
            time: time.into(),
            stylist: stylist.into(),
        }
    }
}

impl From<&Appointment> for AppointmentInput {
    fn from(appointment: &Appointment) -> Self {
        Self {
            client_name: appointment.client_name.clone(),
            phone_number: appointment.phone_number.clone(),
            date: appointment.date.format("%Y-%m-%d").to_string(),
            time: appointment.time.format("%H:%M").to_string(),
            stylist: appointment.stylist.clone(),
        }
    }
}

/// A booking that passed every validation rule, with normalized fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidAppointment {
    pub client_name: String,
    pub phone_number: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub stylist: Stylist,
}

impl ValidAppointment {
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    /// Attach a store-assigned id
    pub fn with_id(&self, id: Uuid) -> Appointment {
        Appointment {
            id,
            client_name: self.client_name.clone(),
            phone_number: self.phone_number.clone(),
            date: self.date,
            time: self.time,
            stylist: self.stylist.name().to_string(),
        }
    }
}

/// A stored appointment in its external shape
///
/// Serializes as `{ id, clientName, phoneNumber, date: "YYYY-MM-DD",
/// time: "HH:MM", stylist }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub client_name: String,
    pub phone_number: String,
    pub date: NaiveDate,
    #[serde(with = "hour_minute")]
    pub time: NaiveTime,
    pub stylist: String,
}

impl Appointment {
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }
}

/// Serde adapter for `HH:MM` times
pub mod hour_minute {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .map_err(de::Error::custom)
    }
}
