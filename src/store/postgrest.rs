use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Client;
use salon_postgrest::{PostgrestClient, SortOrder};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{sort_chronologically, AppointmentStore};
use crate::error::StoreError;
use crate::models::{Appointment, ValidAppointment};

/// A row of the `appointment` table
///
/// `date` and `time` both hold the combined start timestamp; reads take
/// the start from `date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentRow {
    pub id: Uuid,
    pub clientname: String,
    pub clientphone: String,
    #[serde(with = "timestamp")]
    pub date: NaiveDateTime,
    #[serde(with = "timestamp")]
    pub time: NaiveDateTime,
    pub stylists: String,
}

impl From<AppointmentRow> for Appointment {
    fn from(row: AppointmentRow) -> Self {
        Appointment {
            id: row.id,
            client_name: row.clientname,
            phone_number: row.clientphone,
            date: row.date.date(),
            time: row.date.time(),
            stylist: row.stylists,
        }
    }
}

/// Column values written on insert and update; the table assigns `id`
#[derive(Debug, Serialize)]
struct AppointmentColumns<'a> {
    clientname: &'a str,
    clientphone: &'a str,
    #[serde(with = "timestamp")]
    date: NaiveDateTime,
    #[serde(with = "timestamp")]
    time: NaiveDateTime,
    stylists: &'static str,
}

impl<'a> From<&'a ValidAppointment> for AppointmentColumns<'a> {
    fn from(appointment: &'a ValidAppointment) -> Self {
        let starts_at = appointment.starts_at();
        Self {
            clientname: &appointment.client_name,
            clientphone: &appointment.phone_number,
            date: starts_at,
            time: starts_at,
            stylists: appointment.stylist.name(),
        }
    }
}

/// Appointments in a PostgREST-exposed Postgres table
#[derive(Debug, Clone)]
pub struct PostgrestStore {
    base_url: String,
    api_key: String,
    table: String,
    http_client: Client,
    access_token: Option<String>,
}

impl PostgrestStore {
    pub fn new(
        base_url: &str,
        api_key: &str,
        table: &str,
        http_client: Client,
    ) -> Result<Self, StoreError> {
        if base_url.trim().is_empty() || api_key.trim().is_empty() {
            return Err(StoreError::persistence("PostgREST URL and key must be set"));
        }

        Ok(Self {
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
            table: table.to_string(),
            http_client,
            access_token: None,
        })
    }

    /// Act as a signed-in user rather than the anon role
    pub fn with_access_token(mut self, token: &str) -> Self {
        self.access_token = Some(token.to_string());
        self
    }

    fn table_client(&self) -> Result<PostgrestClient, StoreError> {
        let client = PostgrestClient::new(
            &self.base_url,
            &self.api_key,
            &self.table,
            self.http_client.clone(),
        )?;
        match &self.access_token {
            Some(token) => Ok(client.with_auth(token)?),
            None => Ok(client),
        }
    }
}

#[async_trait]
impl AppointmentStore for PostgrestStore {
    async fn create(&self, appointment: &ValidAppointment) -> Result<Appointment, StoreError> {
        let rows: Vec<AppointmentRow> = self
            .table_client()?
            .insert(AppointmentColumns::from(appointment))
            .await?;

        rows.into_iter()
            .next()
            .map(Appointment::from)
            .ok_or_else(|| StoreError::persistence("insert returned no row"))
    }

    async fn update(
        &self,
        id: Uuid,
        appointment: &ValidAppointment,
    ) -> Result<Appointment, StoreError> {
        let rows: Vec<AppointmentRow> = self
            .table_client()?
            .eq("id", &id.to_string())
            .update(AppointmentColumns::from(appointment))
            .await?;

        rows.into_iter()
            .next()
            .map(Appointment::from)
            .ok_or(StoreError::NotFound(id))
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let rows: Vec<AppointmentRow> = self
            .table_client()?
            .eq("id", &id.to_string())
            .delete()
            .await?;

        if rows.is_empty() {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Appointment>, StoreError> {
        let rows: Vec<AppointmentRow> = self
            .table_client()?
            .select("*")
            .order("date", SortOrder::Ascending)
            .execute()
            .await?;

        let mut appointments: Vec<Appointment> = rows.into_iter().map(Appointment::from).collect();
        sort_chronologically(&mut appointments);
        Ok(appointments)
    }
}

/// Serde adapter for Postgres timestamps
///
/// Writes `YYYY-MM-DDTHH:MM:SS`. Reads plain timestamps as well as
/// `timestamptz` values, keeping the wall-clock time in the given offset.
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime};
    use serde::{de, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    pub fn serialize<S: Serializer>(
        value: &NaiveDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp: {}", raw)))
    }

    pub fn parse(raw: &str) -> Option<NaiveDateTime> {
        if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
            return Some(with_offset.naive_local());
        }
        if let Ok(with_offset) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%#z") {
            return Some(with_offset.naive_local());
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn nine_am() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 6)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    #[test]
    fn timestamps_with_and_without_offset() {
        for raw in [
            "2025-01-06T09:00:00",
            "2025-01-06T09:00:00.000",
            "2025-01-06 09:00:00",
            "2025-01-06T09:00:00+00:00",
        ] {
            assert_eq!(timestamp::parse(raw), Some(nine_am()), "{}", raw);
        }
        assert_eq!(timestamp::parse("yesterday"), None);
    }

    #[test]
    fn row_projects_into_external_shape() {
        let row = AppointmentRow {
            id: Uuid::nil(),
            clientname: "Ana".to_string(),
            clientphone: "+1 555 1234".to_string(),
            date: nine_am(),
            time: nine_am(),
            stylists: "Emma".to_string(),
        };

        let appointment = Appointment::from(row);
        assert_eq!(appointment.date.to_string(), "2025-01-06");
        assert_eq!(appointment.time.format("%H:%M").to_string(), "09:00");
        assert_eq!(appointment.stylist, "Emma");
    }
}
