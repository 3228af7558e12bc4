//! Salon Booking Library
//!
//! Appointment booking for a hair salon: validation of booking requests,
//! interchangeable appointment stores (PostgREST, a local JSON file or
//! memory), an actions layer that ties them together, and the state behind
//! the booking form and list.

pub mod actions;
pub mod booking;
pub mod config;
pub mod error;
pub mod events;
pub mod models;
pub mod salon;
pub mod store;
pub mod validation;

use std::sync::Arc;
use tokio::sync::broadcast;

use crate::actions::AppointmentActions;
use crate::booking::{BookingForm, BookingList};
use crate::config::BookingOptions;
use crate::events::{AppointmentChange, ChangeNotifier};
use crate::salon::SalonProfile;
use crate::store::{AppointmentStore, MemoryStore};

pub use crate::error::{Error, Result};

/// The main entry point for the booking library
///
/// Owns the configured store and the change channel that keeps booking
/// lists in step with writes.
#[derive(Clone)]
pub struct Salon {
    /// Options the salon was opened with
    pub options: BookingOptions,
    actions: AppointmentActions,
    profile: SalonProfile,
}

impl Salon {
    /// Open the store selected by `options`
    ///
    /// # Example
    ///
    /// ```
    /// use salon_booking::{config::{BookingOptions, StoreBackend}, Salon};
    ///
    /// let options = BookingOptions::default().with_backend(StoreBackend::Memory);
    /// let salon = Salon::new(options).unwrap();
    /// assert_eq!(salon.profile().name, "Elegance Salon");
    /// ```
    pub fn new(options: BookingOptions) -> Result<Self> {
        let store = store::open(&options)?;
        Ok(Self::with_store(options, store))
    }

    /// Read the options from the environment and open the store
    pub fn from_env() -> Result<Self> {
        Self::new(BookingOptions::from_env()?)
    }

    /// Use an already constructed store
    pub fn with_store(options: BookingOptions, store: Arc<dyn AppointmentStore>) -> Self {
        Self {
            options,
            actions: AppointmentActions::new(store, ChangeNotifier::default()),
            profile: SalonProfile::default(),
        }
    }

    /// A salon backed by an empty in-memory store
    pub fn in_memory() -> Self {
        Self::with_store(BookingOptions::default(), Arc::new(MemoryStore::new()))
    }

    pub fn actions(&self) -> &AppointmentActions {
        &self.actions
    }

    /// Receive every confirmed create, update and delete from now on
    pub fn subscribe(&self) -> broadcast::Receiver<AppointmentChange> {
        self.actions.notifier().subscribe()
    }

    pub fn booking_form(&self) -> BookingForm {
        BookingForm::new()
    }

    /// A booking list subscribed to this salon's changes, loaded from the store
    pub async fn booking_list(&self) -> BookingList {
        BookingList::mount(self.actions.clone()).await
    }

    pub fn profile(&self) -> &SalonProfile {
        &self.profile
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::actions::{ActionResult, AppointmentActions};
    pub use crate::booking::{BookingForm, BookingItem, BookingList, SubmitOutcome};
    pub use crate::config::{BookingOptions, StoreBackend};
    pub use crate::error::{Error, StoreError};
    pub use crate::models::{Appointment, AppointmentInput, Stylist};
    pub use crate::store::AppointmentStore;
    pub use crate::validation::Field;
    pub use crate::Salon;
}
