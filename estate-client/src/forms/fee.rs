use super::{Field, Form, FormState};
use crate::error::ValidationError;
use crate::session::Session;
use estate_common::api::{FeeAddRequest, FeeResponse, PayRequest};
use estate_common::domain::FeeStatus;

pub struct FeeAddForm {
    state: FormState,
}

impl FeeAddForm {
    pub fn new() -> Self {
        Self {
            state: FormState::new(vec![
                Field::new("house_number", "House number"),
                Field::new("resident_name", "Resident name"),
                Field::new("amount", "Amount"),
                Field::new("month", "Month (YYYY-MM)"),
            ]),
        }
    }
}

impl Default for FeeAddForm {
    fn default() -> Self {
        Self::new()
    }
}

impl Form for FeeAddForm {
    type Request = FeeAddRequest;

    fn title(&self) -> &'static str {
        "Add fee"
    }

    fn state(&self) -> &FormState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut FormState {
        &mut self.state
    }

    fn validate(&self) -> Result<FeeAddRequest, ValidationError> {
        Ok(FeeAddRequest {
            house_number: self.state.required("house_number", "Enter a house number")?,
            resident_name: self.state.required("resident_name", "Enter the resident name")?,
            amount: self
                .state
                .decimal("amount", "Enter an amount", "Amount must be a number")?,
            month: self.state.required("month", "Enter the month")?,
        })
    }
}

/// Only residents pay, and only what is still unpaid.
pub fn check_payable(session: &Session, fee: &FeeResponse) -> Result<PayRequest, ValidationError> {
    if session.is_admin() {
        return Err(ValidationError::new("fee", "Only residents can pay fees"));
    }
    if fee.status != FeeStatus::Unpaid {
        return Err(ValidationError::new("fee", "This fee has already been paid"));
    }
    Ok(PayRequest { fee_id: fee.id })
}

#[cfg(test)]
mod tests {
    use super::*;
    use estate_common::domain::Role;

    #[test]
    fn amount_must_be_decimal() {
        let mut form = FeeAddForm::new();
        form.state_mut().set("house_number", "A101");
        form.state_mut().set("resident_name", "Li");
        form.state_mut().set("amount", "twelve");
        assert_eq!(form.validate().unwrap_err().message, "Amount must be a number");

        form.state_mut().set("amount", "120.50");
        assert_eq!(form.validate().unwrap_err().field, "month");

        form.state_mut().set("month", "2024-06");
        assert_eq!(form.validate().unwrap().amount, 120.5);
    }

    #[test]
    fn non_finite_amounts_never_validate() {
        let mut form = FeeAddForm::new();
        form.state_mut().set("house_number", "A101");
        form.state_mut().set("resident_name", "Li");
        form.state_mut().set("month", "2024-06");
        for bad in ["NaN", "inf", "infinity", "-inf"] {
            form.state_mut().set("amount", bad);
            let err = form.validate().unwrap_err();
            assert_eq!(err.field, "amount");
            assert_eq!(err.message, "Amount must be a number");
        }
    }

    #[test]
    fn paid_fees_are_not_payable() {
        let mut fee = FeeResponse {
            id: 9,
            house_number: "A101".into(),
            resident_name: "Li".into(),
            amount: 80.0,
            month: "2024-06".into(),
            status: FeeStatus::Paid,
            payment_date: Some("2024-06-02".into()),
        };
        let resident = Session {
            house_number: Some("A101".into()),
            ..Default::default()
        };
        assert!(check_payable(&resident, &fee).is_err());

        fee.status = FeeStatus::Unpaid;
        assert_eq!(check_payable(&resident, &fee), Ok(PayRequest { fee_id: 9 }));

        let admin = Session {
            role: Role::Admin,
            ..Default::default()
        };
        assert!(check_payable(&admin, &fee).is_err());
    }
}
