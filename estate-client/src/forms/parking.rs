use super::{Field, Form, FormState};
use crate::error::ValidationError;
use estate_common::api::{ParkingRequest, ParkingResponse};
use estate_common::domain::ParkingStatus;

pub struct ParkingForm {
    state: FormState,
    id: Option<u64>,
}

impl ParkingForm {
    fn fields() -> Vec<Field> {
        vec![
            Field::new("parking_number", "Parking number"),
            Field::new("status", "Status (ASSIGNED, FREE)").value(ParkingStatus::Free.as_str()),
            Field::new("house_number", "House number (optional)"),
            Field::new("resident_name", "Resident name (optional)"),
            Field::new("car_plate", "Car plate (optional)"),
        ]
    }

    pub fn new() -> Self {
        Self {
            state: FormState::new(Self::fields()),
            id: None,
        }
    }

    pub fn edit(parking: &ParkingResponse) -> Self {
        let mut state = FormState::new(Self::fields());
        state.set("parking_number", parking.parking_number.as_str());
        state.set("status", parking.status.as_str());
        state.set("house_number", parking.house_number.clone().unwrap_or_default());
        state.set("resident_name", parking.resident_name.clone().unwrap_or_default());
        state.set("car_plate", parking.car_plate.clone().unwrap_or_default());
        Self {
            state,
            id: Some(parking.id),
        }
    }

    pub fn is_update(&self) -> bool {
        self.id.is_some()
    }
}

impl Default for ParkingForm {
    fn default() -> Self {
        Self::new()
    }
}

impl Form for ParkingForm {
    type Request = ParkingRequest;

    fn title(&self) -> &'static str {
        if self.is_update() {
            "Edit parking space"
        } else {
            "Add parking space"
        }
    }

    fn state(&self) -> &FormState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut FormState {
        &mut self.state
    }

    fn validate(&self) -> Result<ParkingRequest, ValidationError> {
        let parking_number = self.state.required("parking_number", "Enter a parking number")?;
        let status: ParkingStatus = self.state.parsed(
            "status",
            "Choose a status",
            "Status must be ASSIGNED or FREE",
        )?;
        Ok(ParkingRequest {
            id: self.id,
            parking_number,
            house_number: self.state.optional("house_number"),
            resident_name: self.state.optional("resident_name"),
            car_plate: self.state.optional("car_plate"),
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_keeps_the_id() {
        let parking = ParkingResponse {
            id: 12,
            parking_number: "P-12".into(),
            house_number: Some("A101".into()),
            resident_name: None,
            car_plate: Some("ABC123".into()),
            status: ParkingStatus::Assigned,
            start_time: None,
        };
        let form = ParkingForm::edit(&parking);
        let req = form.validate().unwrap();
        assert_eq!(req.id, Some(12));
        assert_eq!(req.status, ParkingStatus::Assigned);
        assert_eq!(req.resident_name, None);
    }

    #[test]
    fn number_is_required() {
        let form = ParkingForm::new();
        assert_eq!(form.validate().unwrap_err().message, "Enter a parking number");
    }
}
