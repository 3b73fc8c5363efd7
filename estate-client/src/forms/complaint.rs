use super::{Field, Form, FormState};
use crate::error::ValidationError;
use crate::session::Session;
use estate_common::api::{ComplaintResponse, ComplaintSubmitRequest, ComplaintUpdateRequest};
use estate_common::domain::WorkStatus;

pub struct ComplaintForm {
    state: FormState,
}

impl ComplaintForm {
    pub fn for_session(session: &Session) -> Self {
        let mut state = FormState::new(vec![
            Field::new("house_number", "House number"),
            Field::new("resident_name", "Resident name"),
            Field::new("phone", "Phone"),
            Field::new("kind", "Type (noise, hygiene, ...)"),
            Field::new("content", "Details"),
        ]);
        if !session.is_admin() {
            state.lock("house_number", session.house_number().unwrap_or_default());
            state.lock(
                "resident_name",
                session.display_name.as_deref().unwrap_or_default(),
            );
        }
        Self { state }
    }
}

impl Form for ComplaintForm {
    type Request = ComplaintSubmitRequest;

    fn title(&self) -> &'static str {
        "File a complaint"
    }

    fn state(&self) -> &FormState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut FormState {
        &mut self.state
    }

    fn validate(&self) -> Result<ComplaintSubmitRequest, ValidationError> {
        Ok(ComplaintSubmitRequest {
            house_number: self.state.required("house_number", "Enter a house number")?,
            resident_name: self.state.required("resident_name", "Enter the resident name")?,
            phone: self.state.required("phone", "Enter a phone number")?,
            kind: self.state.required("kind", "Choose a complaint type")?,
            content: self.state.required("content", "Enter the complaint details")?,
        })
    }
}

pub struct ComplaintUpdateForm {
    state: FormState,
    complaint_id: u64,
}

impl ComplaintUpdateForm {
    pub fn new(complaint: &ComplaintResponse) -> Self {
        let state = FormState::new(vec![
            Field::new("status", "Status (PENDING, PROCESSING, COMPLETED)")
                .value(complaint.status.as_str()),
            Field::new("handle_result", "Result (optional)")
                .value(complaint.handle_result.clone().unwrap_or_default()),
        ]);
        Self {
            state,
            complaint_id: complaint.id,
        }
    }
}

impl Form for ComplaintUpdateForm {
    type Request = ComplaintUpdateRequest;

    fn title(&self) -> &'static str {
        "Handle complaint"
    }

    fn state(&self) -> &FormState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut FormState {
        &mut self.state
    }

    fn validate(&self) -> Result<ComplaintUpdateRequest, ValidationError> {
        let status: WorkStatus = self
            .state
            .parsed("status", "Choose a status", "Unknown status")?;
        Ok(ComplaintUpdateRequest {
            complaint_id: self.complaint_id,
            status,
            handle_result: self.state.optional("handle_result"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_is_required() {
        let session = Session {
            house_number: Some("A101".into()),
            display_name: Some("Li".into()),
            user_id: 4,
            ..Default::default()
        };
        let mut form = ComplaintForm::for_session(&session);
        form.state_mut().set("phone", "555");
        form.state_mut().set("kind", "noise");

        assert_eq!(
            form.validate().unwrap_err().message,
            "Enter the complaint details"
        );

        form.state_mut().set("content", "Drilling at night");
        let req = form.validate().unwrap();
        assert_eq!(req.house_number, "A101");
        assert_eq!(req.resident_name, "Li");
    }
}
