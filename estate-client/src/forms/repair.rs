use super::{Field, Form, FormState};
use crate::error::ValidationError;
use crate::session::Session;
use estate_common::api::{RepairResponse, RepairSubmitRequest, RepairUpdateRequest};
use estate_common::domain::WorkStatus;

pub const MISSING_USER: &str = "Unable to read user information";

pub struct RepairForm {
    state: FormState,
    user_id: u64,
}

impl RepairForm {
    /// Residents report for their own house, so those fields come from the session.
    pub fn for_session(session: &Session) -> Self {
        let mut state = FormState::new(vec![
            Field::new("house_number", "House number"),
            Field::new("resident_name", "Resident name"),
            Field::new("phone", "Phone"),
            Field::new("kind", "Type (plumbing, electrical, ...)"),
            Field::new("description", "Description (optional)"),
        ]);
        if !session.is_admin() {
            state.lock("house_number", session.house_number().unwrap_or_default());
            state.lock(
                "resident_name",
                session.display_name.as_deref().unwrap_or_default(),
            );
        }
        Self {
            state,
            user_id: session.user_id,
        }
    }
}

impl Form for RepairForm {
    type Request = RepairSubmitRequest;

    fn title(&self) -> &'static str {
        "Report a repair"
    }

    fn state(&self) -> &FormState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut FormState {
        &mut self.state
    }

    fn validate(&self) -> Result<RepairSubmitRequest, ValidationError> {
        let house_number = self.state.required("house_number", "Enter a house number")?;
        let resident_name = self.state.required("resident_name", "Enter the resident name")?;
        let phone = self.state.required("phone", "Enter a phone number")?;
        let kind = self.state.required("kind", "Choose a repair type")?;
        if self.user_id == 0 {
            return Err(ValidationError::new("user_id", MISSING_USER));
        }
        Ok(RepairSubmitRequest {
            user_id: self.user_id,
            house_number,
            resident_name,
            phone,
            kind,
            description: self.state.optional("description"),
        })
    }
}

pub struct RepairUpdateForm {
    state: FormState,
    repair_id: u64,
}

impl RepairUpdateForm {
    pub fn new(repair: &RepairResponse) -> Self {
        let state = FormState::new(vec![
            Field::new("status", "Status (PENDING, PROCESSING, COMPLETED)")
                .value(repair.status.as_str()),
            Field::new("feedback", "Feedback (optional)")
                .value(repair.feedback.clone().unwrap_or_default()),
        ]);
        Self {
            state,
            repair_id: repair.id,
        }
    }
}

impl Form for RepairUpdateForm {
    type Request = RepairUpdateRequest;

    fn title(&self) -> &'static str {
        "Update repair"
    }

    fn state(&self) -> &FormState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut FormState {
        &mut self.state
    }

    fn validate(&self) -> Result<RepairUpdateRequest, ValidationError> {
        let status: WorkStatus = self
            .state
            .parsed("status", "Choose a status", "Unknown status")?;
        Ok(RepairUpdateRequest {
            repair_id: self.repair_id,
            status,
            feedback: self.state.optional("feedback"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use estate_common::domain::Role;

    fn resident() -> Session {
        Session {
            username: Some("li".into()),
            role: Role::Resident,
            house_number: Some("A101".into()),
            user_id: 4,
            display_name: Some("Li Lei".into()),
            token: Some("t".into()),
        }
    }

    #[test]
    fn resident_identity_is_prefilled_and_locked() {
        let mut form = RepairForm::for_session(&resident());

        assert_eq!(form.state().get("house_number"), "A101");
        assert!(!form.state_mut().set("house_number", "B202"));
        assert!(form.state().is_locked("resident_name"));

        form.state_mut().set("phone", "555");
        form.state_mut().set("kind", "plumbing");
        let req = form.validate().unwrap();
        assert_eq!(req.user_id, 4);
        assert_eq!(req.house_number, "A101");
        assert_eq!(req.resident_name, "Li Lei");
        assert_eq!(req.description, None);
    }

    #[test]
    fn zero_user_id_is_rejected() {
        let mut session = resident();
        session.user_id = 0;
        let mut form = RepairForm::for_session(&session);
        form.state_mut().set("phone", "555");
        form.state_mut().set("kind", "plumbing");

        assert_eq!(form.validate().unwrap_err().message, MISSING_USER);
    }

    #[test]
    fn admin_fields_are_editable() {
        let admin = Session {
            role: Role::Admin,
            user_id: 1,
            ..Default::default()
        };
        let form = RepairForm::for_session(&admin);
        assert!(!form.state().is_locked("house_number"));
        assert_eq!(form.validate().unwrap_err().field, "house_number");
    }

    #[test]
    fn update_requires_known_status() {
        let repair: RepairResponse = serde_json::from_value(serde_json::json!({
            "id": 3, "houseNumber": "A101", "residentName": "Li", "phone": "555",
            "type": "plumbing", "status": "PENDING", "submitTime": "2024-06-01 10:00:00"
        }))
        .unwrap();
        let mut form = RepairUpdateForm::new(&repair);
        assert_eq!(form.state().get("status"), "PENDING");

        form.state_mut().set("status", "");
        assert_eq!(form.validate().unwrap_err().message, "Choose a status");

        form.state_mut().set("status", "done-ish");
        assert_eq!(form.validate().unwrap_err().message, "Unknown status");

        form.state_mut().set("status", "completed");
        form.state_mut().set("feedback", "Replaced the valve");
        let req = form.validate().unwrap();
        assert_eq!(req.status, WorkStatus::Completed);
        assert_eq!(req.repair_id, 3);
    }
}
