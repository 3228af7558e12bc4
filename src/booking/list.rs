use chrono::NaiveDateTime;
use std::collections::HashMap;
use tokio::sync::broadcast::{self, error::TryRecvError};
use uuid::Uuid;

use super::item::BookingItem;
use crate::actions::{ActionResult, AppointmentActions};
use crate::events::AppointmentChange;
use crate::models::{Appointment, AppointmentInput};
use crate::store::sort_chronologically;
use crate::validation::validate;

pub const EMPTY_MESSAGE: &str = "No bookings yet. Add your first appointment!";

/// A local edit not yet confirmed by the store
#[derive(Debug, Clone, PartialEq)]
pub enum PendingMutation {
    /// Show this version of the record
    Upsert(Appointment),
    /// Hide the record
    Remove,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ListState {
    #[default]
    Loading,
    Ready,
    /// The last refresh could not read the store
    Failed(String),
}

/// The booking list: the store's last known contents plus in-flight edits
///
/// What callers see is the merge of both, ordered by start time. A pending
/// entry is dropped once the store confirms or rejects it.
pub struct BookingList {
    actions: AppointmentActions,
    confirmed: Vec<Appointment>,
    pending: HashMap<Uuid, PendingMutation>,
    state: ListState,
    changes: broadcast::Receiver<AppointmentChange>,
}

impl BookingList {
    pub fn new(actions: AppointmentActions) -> Self {
        let changes = actions.notifier().subscribe();
        Self {
            actions,
            confirmed: Vec::new(),
            pending: HashMap::new(),
            state: ListState::Loading,
            changes,
        }
    }

    /// Build the list and load it
    pub async fn mount(actions: AppointmentActions) -> Self {
        let mut list = Self::new(actions);
        list.refresh().await;
        list
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn pending(&self) -> &HashMap<Uuid, PendingMutation> {
        &self.pending
    }

    /// Replace the confirmed list with the store's contents
    ///
    /// On failure the previous contents stay visible and the state records
    /// the error.
    pub async fn refresh(&mut self) -> &ListState {
        match self.actions.try_fetch_appointments().await {
            Ok(appointments) => {
                self.confirmed = appointments;
                self.state = ListState::Ready;
            }
            Err(err) => {
                tracing::warn!(error = %err, "booking list refresh failed");
                self.state = ListState::Failed(err.to_string());
            }
        }
        &self.state
    }

    /// Confirmed records with pending edits applied, earliest first
    pub fn view(&self) -> Vec<Appointment> {
        let mut merged: Vec<Appointment> = self
            .confirmed
            .iter()
            .filter_map(|appointment| match self.pending.get(&appointment.id) {
                Some(PendingMutation::Remove) => None,
                Some(PendingMutation::Upsert(replacement)) => Some(replacement.clone()),
                None => Some(appointment.clone()),
            })
            .collect();

        for (id, mutation) in &self.pending {
            if let PendingMutation::Upsert(added) = mutation {
                if !self.confirmed.iter().any(|existing| existing.id == *id) {
                    merged.push(added.clone());
                }
            }
        }

        sort_chronologically(&mut merged);
        merged
    }

    pub fn items(&self, now: NaiveDateTime) -> Vec<BookingItem> {
        self.view()
            .into_iter()
            .map(|appointment| BookingItem::new(appointment, now))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.view().is_empty()
    }

    /// Hand the visible record at `id` to `on_edit`, typically a form's `load`
    pub fn edit<F>(&self, id: Uuid, on_edit: F) -> bool
    where
        F: FnOnce(&Appointment),
    {
        match self.view().iter().find(|appointment| appointment.id == id) {
            Some(appointment) => {
                on_edit(appointment);
                true
            }
            None => false,
        }
    }

    /// Record a speculative edit so the view shows it immediately
    pub fn stage(&mut self, id: Uuid, mutation: PendingMutation) {
        self.pending.insert(id, mutation);
    }

    /// Drop the pending edit for `id`, whether it was confirmed or not
    pub fn settle(&mut self, id: Uuid) -> Option<PendingMutation> {
        self.pending.remove(&id)
    }

    /// Delete through the actions layer, then reload
    pub async fn delete(&mut self, id: Uuid) -> ActionResult {
        let result = self.actions.delete_appointment(id).await;
        if result.changed {
            self.refresh().await;
        }
        result
    }

    /// Hide the row at once, then reconcile with the store's answer
    pub async fn delete_optimistic(&mut self, id: Uuid) -> ActionResult {
        self.stage(id, PendingMutation::Remove);
        let result = self.actions.delete_appointment(id).await;
        self.reconcile(id, &result).await;
        result
    }

    /// Show the edited record at once, then reconcile with the store's answer
    pub async fn update_optimistic(&mut self, id: Uuid, input: &AppointmentInput) -> ActionResult {
        if let Ok(valid) = validate(input) {
            self.stage(id, PendingMutation::Upsert(valid.with_id(id)));
        }
        let result = self.actions.update_appointment(id, input).await;
        self.reconcile(id, &result).await;
        result
    }

    // A confirmed change is folded in before reloading, so a failed reload
    // still shows what the store accepted.
    async fn reconcile(&mut self, id: Uuid, result: &ActionResult) {
        self.settle(id);
        if !result.changed {
            tracing::debug!(%id, "optimistic change reverted");
            return;
        }

        let confirmed = match &result.appointment {
            Some(appointment) => AppointmentChange::Updated(appointment.clone()),
            None => AppointmentChange::Deleted(id),
        };
        self.apply_change(confirmed);
        self.refresh().await;
    }

    /// Fold a confirmed change into the list
    pub fn apply_change(&mut self, change: AppointmentChange) {
        self.pending.remove(&change.id());
        match change {
            AppointmentChange::Created(appointment) | AppointmentChange::Updated(appointment) => {
                match self.confirmed.iter_mut().find(|existing| existing.id == appointment.id) {
                    Some(existing) => *existing = appointment,
                    None => self.confirmed.push(appointment),
                }
                sort_chronologically(&mut self.confirmed);
            }
            AppointmentChange::Deleted(id) => self.confirmed.retain(|existing| existing.id != id),
        }
    }

    /// Apply every change published since the last call
    ///
    /// If changes were dropped because this list fell behind, the whole
    /// list is reloaded instead. Returns how many changes were seen.
    pub async fn sync(&mut self) -> usize {
        let mut seen = 0;
        loop {
            match self.changes.try_recv() {
                Ok(change) => {
                    self.apply_change(change);
                    seen += 1;
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "booking list lagged behind changes");
                    self.refresh().await;
                    seen += skipped as usize;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        seen
    }
}
