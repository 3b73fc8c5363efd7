use super::{Field, Form, FormState};
use crate::error::ValidationError;
use estate_common::api::{BuildingRequest, BuildingResponse};

pub struct BuildingForm {
    state: FormState,
    id: Option<u64>,
    status: Option<String>,
}

impl BuildingForm {
    fn fields() -> Vec<Field> {
        vec![
            Field::new("building_number", "Building number"),
            Field::new("building_name", "Building name"),
            Field::new("total_floors", "Floors"),
            Field::new("total_units", "Units"),
            Field::new("building_type", "Type (optional)"),
            Field::new("completion_date", "Completed on (optional)"),
        ]
    }

    pub fn new() -> Self {
        Self {
            state: FormState::new(Self::fields()),
            id: None,
            status: None,
        }
    }

    pub fn edit(building: &BuildingResponse) -> Self {
        let mut state = FormState::new(Self::fields());
        state.set("building_number", building.building_number.as_str());
        state.set("building_name", building.building_name.as_str());
        state.set("total_floors", building.total_floors.to_string());
        state.set("total_units", building.total_units.to_string());
        state.set("building_type", building.building_type.clone().unwrap_or_default());
        state.set(
            "completion_date",
            building.completion_date.clone().unwrap_or_default(),
        );
        Self {
            state,
            id: Some(building.id),
            status: Some(building.status.clone()),
        }
    }
}

impl Default for BuildingForm {
    fn default() -> Self {
        Self::new()
    }
}

impl Form for BuildingForm {
    type Request = BuildingRequest;

    fn title(&self) -> &'static str {
        if self.id.is_some() {
            "Edit building"
        } else {
            "Add building"
        }
    }

    fn state(&self) -> &FormState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut FormState {
        &mut self.state
    }

    fn validate(&self) -> Result<BuildingRequest, ValidationError> {
        Ok(BuildingRequest {
            id: self.id,
            building_number: self
                .state
                .required("building_number", "Enter a building number")?,
            building_name: self.state.required("building_name", "Enter a building name")?,
            total_floors: self.state.parsed(
                "total_floors",
                "Enter the number of floors",
                "Floors must be a whole number",
            )?,
            total_units: self.state.parsed(
                "total_units",
                "Enter the number of units",
                "Units must be a whole number",
            )?,
            building_type: self.state.optional("building_type"),
            completion_date: self.state.optional("completion_date"),
            status: self.status.clone(),
        })
    }
}
