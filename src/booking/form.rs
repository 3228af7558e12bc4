use uuid::Uuid;

use crate::actions::{ActionResult, AppointmentActions};
use crate::models::{Appointment, AppointmentInput, Stylist};
use crate::validation::{self, Field, FieldErrors};

/// Submission lifecycle: `Idle -> Submitting -> (Idle | Error)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormStatus {
    #[default]
    Idle,
    Submitting,
    /// The last submission was rejected; the form can be resubmitted
    Error,
}

/// Why a submission did not start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejected {
    /// A submission is already in flight
    Busy,
    /// Local validation failed; see [`BookingForm::errors`]
    Invalid,
}

/// A validated draft handed to the actions layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub input: AppointmentInput,
    /// Record being replaced, or `None` for a new booking
    pub editing: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Busy,
    Invalid,
    Failed,
    Created(Appointment),
    Updated(Appointment),
}

impl SubmitOutcome {
    /// Whether viewers of the list should refresh
    pub fn changed(&self) -> bool {
        matches!(self, SubmitOutcome::Created(_) | SubmitOutcome::Updated(_))
    }
}

/// State behind the create/edit booking form
#[derive(Debug, Clone, Default)]
pub struct BookingForm {
    values: AppointmentInput,
    errors: FieldErrors,
    status: FormStatus,
    editing: Option<Uuid>,
    message: Option<String>,
}

impl BookingForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_edit(appointment: &Appointment) -> Self {
        let mut form = Self::new();
        form.load(appointment);
        form
    }

    /// Fill the form from an existing record and switch to edit mode
    pub fn load(&mut self, appointment: &Appointment) {
        self.values = AppointmentInput::from(appointment);
        self.editing = Some(appointment.id);
        self.errors.clear();
        self.message = None;
        self.status = FormStatus::Idle;
    }

    /// Drop the record being edited and return to an empty create form
    pub fn cancel_edit(&mut self) {
        *self = Self::new();
    }

    pub fn values(&self) -> &AppointmentInput {
        &self.values
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::ClientName => &self.values.client_name,
            Field::PhoneNumber => &self.values.phone_number,
            Field::Date => &self.values.date,
            Field::Time => &self.values.time,
            Field::Stylist => &self.values.stylist,
        }
    }

    /// Change one field and clear its error
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::ClientName => self.values.client_name = value,
            Field::PhoneNumber => self.values.phone_number = value,
            Field::Date => self.values.date = value,
            Field::Time => self.values.time = value,
            Field::Stylist => self.values.stylist = value,
        }
        self.errors.remove(field);
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error(&self, field: Field) -> Option<&str> {
        self.errors.get(field)
    }

    pub fn status(&self) -> FormStatus {
        self.status
    }

    pub fn editing(&self) -> Option<Uuid> {
        self.editing
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// Message from the last completed submission
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn is_submit_disabled(&self) -> bool {
        self.status == FormStatus::Submitting
    }

    pub fn submit_label(&self) -> &'static str {
        match (self.status, self.is_editing()) {
            (FormStatus::Submitting, _) => "Saving...",
            (_, true) => "Update Booking",
            (_, false) => "Add Booking",
        }
    }

    pub fn time_options() -> Vec<String> {
        validation::time_slots()
            .into_iter()
            .map(|slot| slot.format("%H:%M").to_string())
            .collect()
    }

    pub fn stylist_options() -> &'static [Stylist] {
        &Stylist::ALL
    }

    /// Run the shared rules against the current values, replacing the
    /// displayed errors
    pub fn validate(&mut self) -> bool {
        match validation::validate(&self.values) {
            Ok(_) => {
                self.errors.clear();
                true
            }
            Err(errors) => {
                self.errors = errors;
                false
            }
        }
    }

    /// Validate locally and enter `Submitting`
    pub fn begin_submit(&mut self) -> Result<Submission, SubmitRejected> {
        if self.status == FormStatus::Submitting {
            return Err(SubmitRejected::Busy);
        }
        if !self.validate() {
            self.status = FormStatus::Error;
            return Err(SubmitRejected::Invalid);
        }

        self.status = FormStatus::Submitting;
        self.message = None;
        Ok(Submission {
            input: self.values.clone(),
            editing: self.editing,
        })
    }

    /// Apply the outcome of the submission started by [`begin_submit`](Self::begin_submit)
    ///
    /// A successful write empties the form and leaves edit mode. A rejected
    /// one keeps the values and shows the returned field errors.
    pub fn complete_submit(
        &mut self,
        submission: &Submission,
        result: &ActionResult,
    ) -> SubmitOutcome {
        self.message = Some(result.message.clone());

        match (&result.appointment, result.is_success()) {
            (Some(appointment), true) => {
                let appointment = appointment.clone();
                self.values = AppointmentInput::default();
                self.errors.clear();
                self.editing = None;
                self.status = FormStatus::Idle;
                match submission.editing {
                    Some(_) => SubmitOutcome::Updated(appointment),
                    None => SubmitOutcome::Created(appointment),
                }
            }
            _ => {
                self.errors = result.errors.clone();
                self.status = FormStatus::Error;
                SubmitOutcome::Failed
            }
        }
    }

    /// Validate, call the matching action and apply its result
    pub async fn submit(&mut self, actions: &AppointmentActions) -> SubmitOutcome {
        let submission = match self.begin_submit() {
            Ok(submission) => submission,
            Err(SubmitRejected::Busy) => return SubmitOutcome::Busy,
            Err(SubmitRejected::Invalid) => return SubmitOutcome::Invalid,
        };

        let result = match submission.editing {
            Some(id) => actions.update_appointment(id, &submission.input).await,
            None => actions.create_appointment(&submission.input).await,
        };
        self.complete_submit(&submission, &result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ChangeNotifier;
    use crate::store::MemoryStore;
    use std::sync::Arc;

    fn filled() -> BookingForm {
        let mut form = BookingForm::new();
        form.set_field(Field::ClientName, "Ana");
        form.set_field(Field::PhoneNumber, "+1 555 1234");
        form.set_field(Field::Date, "2025-01-06");
        form.set_field(Field::Time, "09:00");
        form.set_field(Field::Stylist, "Emma");
        form
    }

    fn actions() -> AppointmentActions {
        AppointmentActions::new(Arc::new(MemoryStore::new()), ChangeNotifier::default())
    }

    #[test]
    fn time_options_cover_opening_hours() {
        let options = BookingForm::time_options();
        assert_eq!(options.first().map(String::as_str), Some("08:00"));
        assert_eq!(options.last().map(String::as_str), Some("19:30"));
        assert_eq!(options.len(), 24);
    }

    #[test]
    fn editing_a_field_clears_its_error() {
        let mut form = BookingForm::new();
        assert!(!form.validate());
        assert!(form.error(Field::ClientName).is_some());

        form.set_field(Field::ClientName, "Ana");
        assert_eq!(form.error(Field::ClientName), None);
        assert!(form.error(Field::PhoneNumber).is_some());
    }

    #[test]
    fn second_submit_while_in_flight_is_busy() {
        let mut form = filled();
        let submission = form.begin_submit().unwrap();
        assert!(form.is_submit_disabled());
        assert_eq!(form.begin_submit(), Err(SubmitRejected::Busy));

        let rejected = ActionResult {
            message: "Failed to create appointment".to_string(),
            ..Default::default()
        };
        assert_eq!(form.complete_submit(&submission, &rejected), SubmitOutcome::Failed);
        assert_eq!(form.status(), FormStatus::Error);
        assert!(form.begin_submit().is_ok());
    }

    #[tokio::test]
    async fn invalid_form_is_not_sent() {
        let actions = actions();
        let mut form = filled();
        form.set_field(Field::Date, "2025-01-05");

        assert_eq!(form.submit(&actions).await, SubmitOutcome::Invalid);
        assert_eq!(form.error(Field::Date), Some("The salon is closed on Sundays"));
        assert!(actions.fetch_appointments().await.is_empty());
    }

    #[tokio::test]
    async fn create_then_edit() {
        let actions = actions();
        let mut form = filled();

        let created = match form.submit(&actions).await {
            SubmitOutcome::Created(appointment) => appointment,
            other => panic!("unexpected outcome {:?}", other),
        };
        assert_eq!(form.values(), &AppointmentInput::default());
        assert_eq!(form.message(), Some("Appointment created successfully"));

        form.load(&created);
        assert_eq!(form.submit_label(), "Update Booking");
        form.set_field(Field::Stylist, "Marie");

        match form.submit(&actions).await {
            SubmitOutcome::Updated(updated) => {
                assert_eq!(updated.id, created.id);
                assert_eq!(updated.stylist, "Marie");
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert!(!form.is_editing());
    }

    #[test]
    fn cancel_edit_returns_to_create_mode() {
        let appointment = Appointment {
            id: Uuid::new_v4(),
            client_name: "Ana".to_string(),
            phone_number: "+1 555 1234".to_string(),
            date: chrono::NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
            time: chrono::NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            stylist: "Emma".to_string(),
        };
        let mut form = BookingForm::for_edit(&appointment);
        assert_eq!(form.value(Field::Time), "09:00");

        form.cancel_edit();
        assert!(!form.is_editing());
        assert_eq!(form.value(Field::ClientName), "");
        assert_eq!(form.submit_label(), "Add Booking");
    }
}
