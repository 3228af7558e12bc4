//! Persistence boundary for appointment records
//!
//! Every backend implements [`AppointmentStore`]; which one is used is a
//! matter of configuration (see [`open`]).

mod local;
mod memory;
mod postgrest;

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::{BookingOptions, StoreBackend};
use crate::error::{Error, StoreError};
use crate::models::{Appointment, ValidAppointment};

pub use local::LocalStore;
pub use memory::MemoryStore;
pub use postgrest::{AppointmentRow, PostgrestStore};

/// Create, update, delete and list operations on appointments
///
/// Stores only accept [`ValidAppointment`]s, so nothing unvalidated can be
/// written. Updates replace every field except the id.
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    /// Persist a new appointment and return it with its assigned id
    async fn create(&self, appointment: &ValidAppointment) -> Result<Appointment, StoreError>;

    /// Replace all fields of the appointment at `id`
    async fn update(
        &self,
        id: Uuid,
        appointment: &ValidAppointment,
    ) -> Result<Appointment, StoreError>;

    /// Remove the appointment at `id`
    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;

    /// Every appointment, ordered by date then time
    async fn list(&self) -> Result<Vec<Appointment>, StoreError>;
}

/// Order appointments by their start timestamp
pub fn sort_chronologically(appointments: &mut [Appointment]) {
    appointments.sort_by_key(Appointment::starts_at);
}

/// Build the store selected by `options`
pub fn open(options: &BookingOptions) -> Result<Arc<dyn AppointmentStore>, Error> {
    let store: Arc<dyn AppointmentStore> = match options.backend {
        StoreBackend::Postgrest => {
            let (url, key) = options.supabase_credentials()?;
            let mut builder = reqwest::Client::builder();
            if let Some(timeout) = options.request_timeout {
                builder = builder.timeout(timeout);
            }
            Arc::new(PostgrestStore::new(url, key, &options.table, builder.build()?)?)
        }
        StoreBackend::Local => Arc::new(LocalStore::new(&options.data_file)),
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
    };

    tracing::info!(backend = %options.backend, "appointment store ready");
    Ok(store)
}
