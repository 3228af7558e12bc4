use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{sort_chronologically, AppointmentStore};
use crate::error::StoreError;
use crate::models::{Appointment, ValidAppointment};

/// Appointments held in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    appointments: RwLock<Vec<Appointment>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_appointments(appointments: Vec<Appointment>) -> Self {
        Self {
            appointments: RwLock::new(appointments),
        }
    }
}

#[async_trait]
impl AppointmentStore for MemoryStore {
    async fn create(&self, appointment: &ValidAppointment) -> Result<Appointment, StoreError> {
        let mut appointments = self.appointments.write().await;
        Ok(insert(&mut appointments, appointment))
    }

    async fn update(
        &self,
        id: Uuid,
        appointment: &ValidAppointment,
    ) -> Result<Appointment, StoreError> {
        let mut appointments = self.appointments.write().await;
        replace(&mut appointments, id, appointment)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut appointments = self.appointments.write().await;
        remove(&mut appointments, id)
    }

    async fn list(&self) -> Result<Vec<Appointment>, StoreError> {
        let mut appointments = self.appointments.read().await.clone();
        sort_chronologically(&mut appointments);
        Ok(appointments)
    }
}

// List operations shared with the file-backed store.

pub(super) fn insert(
    appointments: &mut Vec<Appointment>,
    appointment: &ValidAppointment,
) -> Appointment {
    let stored = appointment.with_id(Uuid::new_v4());
    appointments.push(stored.clone());
    stored
}

pub(super) fn replace(
    appointments: &mut [Appointment],
    id: Uuid,
    appointment: &ValidAppointment,
) -> Result<Appointment, StoreError> {
    let slot = appointments
        .iter_mut()
        .find(|existing| existing.id == id)
        .ok_or(StoreError::NotFound(id))?;
    *slot = appointment.with_id(id);
    Ok(slot.clone())
}

pub(super) fn remove(appointments: &mut Vec<Appointment>, id: Uuid) -> Result<(), StoreError> {
    let before = appointments.len();
    appointments.retain(|existing| existing.id != id);
    if appointments.len() == before {
        return Err(StoreError::NotFound(id));
    }
    Ok(())
}
