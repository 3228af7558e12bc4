//! Orchestration between callers and the appointment store
//!
//! Every write validates first, so invalid input never reaches a store.
//! Store failures are logged here and reported to callers with a generic
//! message only.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{Error, Result, StoreError};
use crate::events::{AppointmentChange, ChangeNotifier};
use crate::models::{Appointment, AppointmentInput};
use crate::store::AppointmentStore;
use crate::validation::{validate, FieldErrors};

pub const CREATED: &str = "Appointment created successfully";
pub const UPDATED: &str = "Appointment updated successfully";
pub const DELETED: &str = "Appointment deleted successfully";
pub const CREATE_FAILED: &str = "Failed to create appointment";
pub const UPDATE_FAILED: &str = "Failed to update appointment";
pub const DELETE_FAILED: &str = "Failed to delete appointment";

/// Outcome of a write, shaped for display
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResult {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appointment: Option<Appointment>,
    #[serde(default, skip_serializing_if = "FieldErrors::is_empty")]
    pub errors: FieldErrors,
    /// Set when the list changed and viewers should refresh
    #[serde(default)]
    pub changed: bool,
}

impl ActionResult {
    fn success(message: &str, appointment: Option<Appointment>) -> Self {
        Self {
            message: message.to_string(),
            appointment,
            errors: FieldErrors::new(),
            changed: true,
        }
    }

    fn failure(message: &str, errors: FieldErrors) -> Self {
        Self {
            message: message.to_string(),
            appointment: None,
            errors,
            changed: false,
        }
    }

    pub fn is_success(&self) -> bool {
        self.changed
    }
}

/// Validated create, update, delete and list over a shared store
#[derive(Clone)]
pub struct AppointmentActions {
    store: Arc<dyn AppointmentStore>,
    notifier: ChangeNotifier,
}

impl AppointmentActions {
    pub fn new(store: Arc<dyn AppointmentStore>, notifier: ChangeNotifier) -> Self {
        Self { store, notifier }
    }

    pub fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    pub fn store(&self) -> &Arc<dyn AppointmentStore> {
        &self.store
    }

    /// Validate and store a new appointment
    pub async fn create(&self, input: &AppointmentInput) -> Result<Appointment> {
        let valid = validate(input).map_err(Error::Validation)?;
        let created = self.store.create(&valid).await?;
        tracing::info!(id = %created.id, stylist = %created.stylist, "appointment created");
        self.notifier.notify(AppointmentChange::Created(created.clone()));
        Ok(created)
    }

    /// Validate and replace every field of the appointment at `id`
    pub async fn update(&self, id: Uuid, input: &AppointmentInput) -> Result<Appointment> {
        let valid = validate(input).map_err(Error::Validation)?;
        let updated = self.store.update(id, &valid).await?;
        tracing::info!(%id, "appointment updated");
        self.notifier.notify(AppointmentChange::Updated(updated.clone()));
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        self.store.delete(id).await?;
        tracing::info!(%id, "appointment deleted");
        self.notifier.notify(AppointmentChange::Deleted(id));
        Ok(())
    }

    pub async fn create_appointment(&self, input: &AppointmentInput) -> ActionResult {
        match self.create(input).await {
            Ok(created) => ActionResult::success(CREATED, Some(created)),
            Err(err) => failed("create", CREATE_FAILED, err),
        }
    }

    pub async fn update_appointment(&self, id: Uuid, input: &AppointmentInput) -> ActionResult {
        match self.update(id, input).await {
            Ok(updated) => ActionResult::success(UPDATED, Some(updated)),
            Err(err) => failed("update", UPDATE_FAILED, err),
        }
    }

    pub async fn delete_appointment(&self, id: Uuid) -> ActionResult {
        match self.delete(id).await {
            Ok(()) => ActionResult::success(DELETED, None),
            Err(err) => failed("delete", DELETE_FAILED, err),
        }
    }

    /// The full list ordered by start time, or an empty list if the store
    /// could not be read
    ///
    /// An empty result does not tell "no appointments" from "store down";
    /// use [`try_fetch_appointments`](Self::try_fetch_appointments) when
    /// that matters.
    pub async fn fetch_appointments(&self) -> Vec<Appointment> {
        self.try_fetch_appointments().await.unwrap_or_default()
    }

    pub async fn try_fetch_appointments(
        &self,
    ) -> std::result::Result<Vec<Appointment>, StoreError> {
        self.store.list().await.map_err(|err| {
            tracing::error!(error = %err, "failed to fetch appointments");
            err
        })
    }
}

fn failed(operation: &str, message: &str, err: Error) -> ActionResult {
    match err {
        Error::Validation(errors) => {
            tracing::debug!(operation, %errors, "appointment rejected by validation");
            ActionResult::failure(message, errors)
        }
        other => {
            tracing::error!(operation, error = %other, "appointment store failure");
            ActionResult::failure(message, FieldErrors::new())
        }
    }
}
