use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::memory::{insert, remove, replace};
use super::{sort_chronologically, AppointmentStore};
use crate::error::StoreError;
use crate::models::{Appointment, ValidAppointment};

/// On-disk layout: the whole list under a single key
#[derive(Debug, Default, Serialize, Deserialize)]
struct LocalDocument {
    #[serde(default)]
    bookings: Vec<Appointment>,
}

/// Appointments kept in a JSON file on the local machine
///
/// The file is read and rewritten in full on every operation.
#[derive(Debug)]
pub struct LocalStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl LocalStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Vec<Appointment>, StoreError> {
        match fs::read_to_string(&self.path).await {
            Ok(text) if text.trim().is_empty() => Ok(Vec::new()),
            Ok(text) => Ok(serde_json::from_str::<LocalDocument>(&text)?.bookings),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(err.into()),
        }
    }

    // Write to a sibling file and rename so readers never see half a document.
    async fn save(&self, bookings: Vec<Appointment>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let body = serde_json::to_vec_pretty(&LocalDocument { bookings })?;
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, body).await?;
        fs::rename(&staging, &self.path).await?;
        tracing::debug!(path = %self.path.display(), "local bookings saved");
        Ok(())
    }
}

#[async_trait]
impl AppointmentStore for LocalStore {
    async fn create(&self, appointment: &ValidAppointment) -> Result<Appointment, StoreError> {
        let _guard = self.lock.lock().await;
        let mut bookings = self.load().await?;
        let stored = insert(&mut bookings, appointment);
        self.save(bookings).await?;
        Ok(stored)
    }

    async fn update(
        &self,
        id: Uuid,
        appointment: &ValidAppointment,
    ) -> Result<Appointment, StoreError> {
        let _guard = self.lock.lock().await;
        let mut bookings = self.load().await?;
        let stored = replace(&mut bookings, id, appointment)?;
        self.save(bookings).await?;
        Ok(stored)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut bookings = self.load().await?;
        remove(&mut bookings, id)?;
        self.save(bookings).await
    }

    async fn list(&self) -> Result<Vec<Appointment>, StoreError> {
        let _guard = self.lock.lock().await;
        let mut bookings = self.load().await?;
        sort_chronologically(&mut bookings);
        Ok(bookings)
    }
}
