use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{
    blank_amount, current_timestamp, new_id, optional_text, require_non_negative, require_text,
    validate_date, validate_email, validate_time,
};
use crate::api::{AppError, AppResult};
use crate::db::{Direction, Editable, FilterKind, Resource};
use crate::export::CsvRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaffRole {
    Manager,
    Waiter,
    Chef,
    Cashier,
    Cleaner,
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StaffRole::Manager => "manager",
            StaffRole::Waiter => "waiter",
            StaffRole::Chef => "chef",
            StaffRole::Cashier => "cashier",
            StaffRole::Cleaner => "cleaner",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: String,
    pub name: String,
    pub role: StaffRole,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub hourly_rate: Decimal,
    pub active: bool,
    pub created_at: i64,
}

fn check_email(email: Option<String>) -> AppResult<Option<String>> {
    let email = optional_text(email);
    if let Some(email) = &email {
        if !validate_email(email) {
            return Err(AppError::validation_field("email", "is not a valid email"));
        }
    }
    Ok(email)
}

#[derive(Debug, Deserialize)]
pub struct StaffMemberCreate {
    pub name: String,
    pub role: StaffRole,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "blank_amount")]
    pub hourly_rate: Option<Decimal>,
    #[serde(default)]
    pub active: Option<bool>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StaffMemberUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<StaffRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(
        default,
        deserialize_with = "blank_amount",
        serialize_with = "rust_decimal::serde::float_option::serialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub hourly_rate: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

impl Resource for StaffMember {
    const TABLE: &'static str = "staff_members";
    const LABEL: &'static str = "Staff member";
    const FILTERS: &'static [(&'static str, FilterKind)] =
        &[("role", FilterKind::Text), ("active", FilterKind::Bool)];

    fn id(&self) -> &str {
        &self.id
    }

    fn default_order() -> (&'static str, Direction) {
        ("name", Direction::Asc)
    }
}

impl Editable for StaffMember {
    type Create = StaffMemberCreate;
    type Patch = StaffMemberUpdate;

    fn from_create(input: StaffMemberCreate) -> AppResult<Self> {
        Ok(StaffMember {
            id: new_id(),
            name: require_text("name", &input.name)?,
            role: input.role,
            email: check_email(input.email)?,
            phone: optional_text(input.phone),
            hourly_rate: require_non_negative("hourly_rate", input.hourly_rate.unwrap_or_default())?,
            active: input.active.unwrap_or(true),
            created_at: current_timestamp(),
        })
    }

    fn prepare_patch(mut patch: StaffMemberUpdate) -> AppResult<StaffMemberUpdate> {
        if let Some(name) = &patch.name {
            patch.name = Some(require_text("name", name)?);
        }
        if patch.email.is_some() {
            patch.email = check_email(patch.email)?;
        }
        if let Some(rate) = patch.hourly_rate {
            require_non_negative("hourly_rate", rate)?;
        }
        Ok(patch)
    }
}

impl CsvRecord for StaffMember {
    const HEADERS: &'static [&'static str] =
        &["id", "name", "role", "email", "phone", "hourly_rate", "active"];

    fn csv_row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.role.to_string(),
            self.email.clone().unwrap_or_default(),
            self.phone.clone().unwrap_or_default(),
            self.hourly_rate.to_string(),
            self.active.to_string(),
        ]
    }
}

/// Turno de trabajo de un día. No cruza la medianoche.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffShift {
    pub id: String,
    pub staff_id: String,
    pub date: String,
    pub start: String,
    pub end: String,
    pub created_at: i64,
}

impl StaffShift {
    pub fn day(&self) -> AppResult<NaiveDate> {
        validate_date(&self.date)
    }

    /// Comprueba que el turno sigue terminando después de empezar una vez
    /// aplicada la edición
    pub fn check_patch(&self, patch: &StaffShiftUpdate) -> AppResult<()> {
        let start = patch.start.as_deref().unwrap_or(&self.start);
        let end = patch.end.as_deref().unwrap_or(&self.end);
        check_shift_times(start, end)
    }

    pub fn hours(&self) -> AppResult<Decimal> {
        let start = validate_time(&self.start)?;
        let end = validate_time(&self.end)?;
        let minutes = (end - start).num_minutes();
        Ok(Decimal::from(minutes) / Decimal::from(60))
    }
}

fn check_shift_times(start: &str, end: &str) -> AppResult<()> {
    if validate_time(end)? <= validate_time(start)? {
        return Err(AppError::validation_field("end", "must be after start"));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct StaffShiftCreate {
    pub staff_id: String,
    pub date: String,
    pub start: String,
    pub end: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StaffShiftUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

impl Resource for StaffShift {
    const TABLE: &'static str = "staff_shifts";
    const LABEL: &'static str = "Shift";
    const FILTERS: &'static [(&'static str, FilterKind)] =
        &[("staff_id", FilterKind::Text), ("date", FilterKind::Text)];

    fn id(&self) -> &str {
        &self.id
    }

    fn default_order() -> (&'static str, Direction) {
        ("date", Direction::Asc)
    }
}

impl Editable for StaffShift {
    type Create = StaffShiftCreate;
    type Patch = StaffShiftUpdate;

    fn from_create(input: StaffShiftCreate) -> AppResult<Self> {
        validate_date(&input.date)?;
        check_shift_times(&input.start, &input.end)?;

        Ok(StaffShift {
            id: new_id(),
            staff_id: require_text("staff_id", &input.staff_id)?,
            date: input.date,
            start: input.start,
            end: input.end,
            created_at: current_timestamp(),
        })
    }

    fn prepare_patch(patch: StaffShiftUpdate) -> AppResult<StaffShiftUpdate> {
        if let Some(date) = &patch.date {
            validate_date(date)?;
        }
        match (&patch.start, &patch.end) {
            (Some(start), Some(end)) => check_shift_times(start, end)?,
            (Some(time), None) | (None, Some(time)) => {
                validate_time(time)?;
            }
            (None, None) => {}
        }
        Ok(patch)
    }
}

impl CsvRecord for StaffShift {
    const HEADERS: &'static [&'static str] = &["id", "staff_id", "date", "start", "end"];

    fn csv_row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.staff_id.clone(),
            self.date.clone(),
            self.start.clone(),
            self.end.clone(),
        ]
    }
}
