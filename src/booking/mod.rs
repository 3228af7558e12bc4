//! Presentation-side state for booking appointments
//!
//! [`BookingForm`] drives the create/edit form, [`BookingList`] the list of
//! upcoming appointments and [`BookingItem`] a single row of it. None of them
//! render anything; they hold the state a front end displays.

mod form;
mod item;
mod list;

pub use form::{BookingForm, FormStatus, Submission, SubmitOutcome, SubmitRejected};
pub use item::{time_remaining, BookingItem, Urgency};
pub use list::{BookingList, ListState, PendingMutation, EMPTY_MESSAGE};
