use chrono::NaiveDateTime;
use serde::Serialize;

use crate::models::Appointment;

/// How close an appointment is, relative to a reference time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    /// Starts within two hours
    Urgent,
    /// Starts within a day
    Soon,
    Upcoming,
    Past,
}

impl Urgency {
    pub fn classify(starts_at: NaiveDateTime, now: NaiveDateTime) -> Self {
        if starts_at <= now {
            return Urgency::Past;
        }

        let minutes = (starts_at - now).num_minutes();
        if minutes <= 2 * 60 {
            Urgency::Urgent
        } else if minutes <= 24 * 60 {
            Urgency::Soon
        } else {
            Urgency::Upcoming
        }
    }

    pub fn badge(&self) -> &'static str {
        match self {
            Urgency::Urgent => "Within 2 hours",
            Urgency::Soon => "Within 24 hours",
            Urgency::Upcoming => "Upcoming",
            Urgency::Past => "Past",
        }
    }
}

/// One row of the booking list, as of a given moment
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingItem {
    pub appointment: Appointment,
    pub urgency: Urgency,
    pub time_remaining: String,
}

impl BookingItem {
    pub fn new(appointment: Appointment, now: NaiveDateTime) -> Self {
        let starts_at = appointment.starts_at();
        Self {
            urgency: Urgency::classify(starts_at, now),
            time_remaining: time_remaining(starts_at, now),
            appointment,
        }
    }

    pub fn is_upcoming(&self) -> bool {
        self.urgency != Urgency::Past
    }

    /// Past appointments can be deleted but not edited
    pub fn can_edit(&self) -> bool {
        self.is_upcoming()
    }
}

/// Relative label such as `in about 3 hours`
pub fn time_remaining(starts_at: NaiveDateTime, now: NaiveDateTime) -> String {
    if starts_at <= now {
        return "Appointment has passed".to_string();
    }
    format!("in {}", distance((starts_at - now).num_seconds()))
}

const MINUTES_IN_DAY: i64 = 1440;
const MINUTES_IN_MONTH: i64 = 43200;

// Buckets follow the common "time ago" wording: rounded minutes, then
// approximate hours, days, months and years.
fn distance(seconds: i64) -> String {
    let minutes = (seconds as f64 / 60.0).round() as i64;

    if minutes < 1 {
        return "less than a minute".to_string();
    }
    if minutes < 45 {
        return plural(minutes, "minute");
    }
    if minutes < 90 {
        return "about 1 hour".to_string();
    }
    if minutes < MINUTES_IN_DAY {
        let hours = (minutes as f64 / 60.0).round() as i64;
        return format!("about {}", plural(hours, "hour"));
    }
    if minutes < 2520 {
        return "1 day".to_string();
    }
    if minutes < MINUTES_IN_MONTH {
        let days = (minutes as f64 / MINUTES_IN_DAY as f64).round() as i64;
        return plural(days, "day");
    }
    if minutes < 2 * MINUTES_IN_MONTH {
        let months = (minutes as f64 / MINUTES_IN_MONTH as f64).round() as i64;
        return format!("about {}", plural(months, "month"));
    }

    let months = minutes / MINUTES_IN_MONTH;
    if months < 12 {
        return plural(months, "month");
    }

    let years = months / 12;
    match months % 12 {
        0..=2 => format!("about {}", plural(years, "year")),
        3..=8 => format!("over {}", plural(years, "year")),
        _ => format!("almost {}", plural(years + 1, "year")),
    }
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", count, unit)
    }
}
