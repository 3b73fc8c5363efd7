//! Input collection and local validation for every create and update dialog.
//!
//! A form owns a list of text fields. `validate` walks them in display order and
//! the first failing field wins, so nothing goes over the wire until the whole
//! request is well formed.

use crate::error::{ApiError, ClientResult, ValidationError};
use crate::events::Notifier;
use std::str::FromStr;

mod account;
mod building;
mod complaint;
mod fee;
mod house;
mod parking;
mod repair;
mod user;

pub use account::{LoginForm, RegisterForm, EMPTY_CREDENTIALS};
pub use building::BuildingForm;
pub use complaint::{ComplaintForm, ComplaintUpdateForm};
pub use fee::{check_payable, FeeAddForm};
pub use house::HouseForm;
pub use parking::ParkingForm;
pub use repair::{RepairForm, RepairUpdateForm, MISSING_USER};
pub use user::UserCreateForm;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub key: &'static str,
    pub label: &'static str,
    pub value: String,
    /// Prefilled from the session and not editable.
    pub locked: bool,
    pub secret: bool,
}

impl Field {
    pub fn new(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            value: String::new(),
            locked: false,
            secret: false,
        }
    }

    pub fn secret(mut self) -> Self {
        self.secret = true;
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    fields: Vec<Field>,
}

impl FormState {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn get(&self, key: &str) -> &str {
        self.fields
            .iter()
            .find(|f| f.key == key)
            .map_or("", |f| f.value.as_str())
    }

    /// Returns `false` if the field is unknown or locked.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> bool {
        match self.fields.iter_mut().find(|f| f.key == key) {
            Some(field) if !field.locked => {
                field.value = value.into();
                true
            }
            _ => false,
        }
    }

    pub fn field_mut(&mut self, index: usize) -> Option<&mut Field> {
        self.fields.get_mut(index).filter(|f| !f.locked)
    }

    pub fn lock(&mut self, key: &str, value: impl Into<String>) {
        if let Some(field) = self.fields.iter_mut().find(|f| f.key == key) {
            field.value = value.into();
            field.locked = true;
        }
    }

    pub fn is_locked(&self, key: &str) -> bool {
        self.fields.iter().any(|f| f.key == key && f.locked)
    }

    fn trimmed(&self, key: &str) -> &str {
        self.get(key).trim()
    }

    pub(crate) fn required(
        &self,
        key: &'static str,
        message: &str,
    ) -> Result<String, ValidationError> {
        let value = self.trimmed(key);
        if value.is_empty() {
            return Err(ValidationError::new(key, message));
        }
        Ok(value.to_string())
    }

    pub(crate) fn optional(&self, key: &str) -> Option<String> {
        let value = self.trimmed(key);
        (!value.is_empty()).then(|| value.to_string())
    }

    /// Required field parsed into `T`.
    pub(crate) fn parsed<T: FromStr>(
        &self,
        key: &'static str,
        missing: &str,
        invalid: &str,
    ) -> Result<T, ValidationError> {
        self.required(key, missing)?
            .parse()
            .map_err(|_| ValidationError::new(key, invalid))
    }

    /// Optional field that must parse when present.
    pub(crate) fn parsed_opt<T: FromStr>(
        &self,
        key: &'static str,
        invalid: &str,
    ) -> Result<Option<T>, ValidationError> {
        self.optional(key)
            .map(|v| v.parse().map_err(|_| ValidationError::new(key, invalid)))
            .transpose()
    }

    /// Required decimal. `NaN` and infinities have no JSON form, so they are invalid.
    pub(crate) fn decimal(
        &self,
        key: &'static str,
        missing: &str,
        invalid: &str,
    ) -> Result<f64, ValidationError> {
        let value: f64 = self.parsed(key, missing, invalid)?;
        finite(key, value, invalid)
    }

    pub(crate) fn decimal_opt(
        &self,
        key: &'static str,
        invalid: &str,
    ) -> Result<Option<f64>, ValidationError> {
        self.parsed_opt::<f64>(key, invalid)?
            .map(|value| finite(key, value, invalid))
            .transpose()
    }
}

fn finite(key: &'static str, value: f64, invalid: &str) -> Result<f64, ValidationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::new(key, invalid))
    }
}

pub trait Form {
    type Request;

    fn title(&self) -> &'static str;

    fn state(&self) -> &FormState;

    fn state_mut(&mut self) -> &mut FormState;

    fn validate(&self) -> Result<Self::Request, ValidationError>;

    /// Validates and reports the failing field to the user.
    fn checked(&self, notifier: &Notifier) -> ClientResult<Self::Request> {
        self.validate().map_err(|err| {
            tracing::debug!("Form {} rejected {}", self.title(), err.field);
            notifier.error(err.message.clone());
            ApiError::Validation(err)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> FormState {
        FormState::new(vec![
            Field::new("name", "Name"),
            Field::new("floors", "Floors"),
            Field::new("area", "Area"),
        ])
    }

    #[test]
    fn locked_fields_ignore_edits() {
        let mut state = state();
        state.lock("name", "Li");

        assert!(!state.set("name", "Wang"));
        assert!(state.field_mut(0).is_none());
        assert_eq!(state.get("name"), "Li");
        assert!(state.is_locked("name"));
        assert!(!state.set("unknown", "x"));
    }

    #[test]
    fn parsing_distinguishes_missing_and_invalid() {
        let mut state = state();
        let err = state.parsed::<u32>("floors", "missing", "invalid").unwrap_err();
        assert_eq!(err.message, "missing");

        state.set("floors", " 3x ");
        let err = state.parsed::<u32>("floors", "missing", "invalid").unwrap_err();
        assert_eq!(err.message, "invalid");

        state.set("floors", " 12 ");
        assert_eq!(state.parsed::<u32>("floors", "missing", "invalid"), Ok(12));

        assert_eq!(state.parsed_opt::<f64>("area", "bad"), Ok(None));
        state.set("area", "88.5");
        assert_eq!(state.parsed_opt::<f64>("area", "bad"), Ok(Some(88.5)));
    }

    #[test]
    fn decimals_must_be_finite() {
        let mut state = state();
        for bad in ["NaN", "inf", "-infinity"] {
            state.set("area", bad);
            let err = state.decimal("area", "missing", "invalid").unwrap_err();
            assert_eq!(err.message, "invalid");
            let err = state.decimal_opt("area", "invalid").unwrap_err();
            assert_eq!(err.field, "area");
        }

        state.set("area", "");
        assert_eq!(state.decimal_opt("area", "invalid"), Ok(None));
        state.set("area", "-12.5");
        assert_eq!(state.decimal("area", "missing", "invalid"), Ok(-12.5));
    }
}
