//! Change notification between the actions layer and its viewers
//!
//! Every successful write is published on a broadcast channel; booking
//! lists and other viewers subscribe and refresh when something changed.

use tokio::sync::broadcast;
use uuid::Uuid;

use crate::models::Appointment;

const DEFAULT_CAPACITY: usize = 64;

/// A confirmed mutation of the appointment list
#[derive(Debug, Clone, PartialEq)]
pub enum AppointmentChange {
    Created(Appointment),
    Updated(Appointment),
    Deleted(Uuid),
}

impl AppointmentChange {
    pub fn id(&self) -> Uuid {
        match self {
            AppointmentChange::Created(appointment) | AppointmentChange::Updated(appointment) => {
                appointment.id
            }
            AppointmentChange::Deleted(id) => *id,
        }
    }
}

/// Publisher side of the change channel; clones share the channel
#[derive(Debug, Clone)]
pub struct ChangeNotifier {
    sender: broadcast::Sender<AppointmentChange>,
}

impl ChangeNotifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppointmentChange> {
        self.sender.subscribe()
    }

    /// Publish a change, returning how many subscribers will see it
    pub fn notify(&self, change: AppointmentChange) -> usize {
        let id = change.id();
        match self.sender.send(change) {
            Ok(receivers) => {
                tracing::debug!(%id, receivers, "published appointment change");
                receivers
            }
            // Nobody listening is fine.
            Err(_) => 0,
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_changes() {
        let notifier = ChangeNotifier::default();
        let mut first = notifier.subscribe();
        let mut second = notifier.subscribe();

        let id = Uuid::new_v4();
        assert_eq!(notifier.notify(AppointmentChange::Deleted(id)), 2);

        assert_eq!(first.recv().await.unwrap(), AppointmentChange::Deleted(id));
        assert_eq!(second.recv().await.unwrap().id(), id);
    }

    #[test]
    fn notify_without_subscribers_is_harmless() {
        let notifier = ChangeNotifier::new(4);
        assert_eq!(notifier.subscriber_count(), 0);
        assert_eq!(notifier.notify(AppointmentChange::Deleted(Uuid::nil())), 0);
    }
}
