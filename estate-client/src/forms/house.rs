use super::{Field, Form, FormState};
use crate::error::ValidationError;
use estate_common::api::{HouseRequest, HouseResponse};

const WHOLE_NUMBER: &str = "must be a whole number";

pub struct HouseForm {
    state: FormState,
    id: Option<u64>,
}

impl HouseForm {
    fn fields() -> Vec<Field> {
        vec![
            Field::new("building_id", "Building id"),
            Field::new("house_number", "House number"),
            Field::new("floor", "Floor"),
            Field::new("unit_type", "Unit type (optional)"),
            Field::new("area", "Area m² (optional)"),
            Field::new("room_count", "Rooms (optional)"),
            Field::new("living_room_count", "Living rooms (optional)"),
            Field::new("bathroom_count", "Bathrooms (optional)"),
            Field::new("orientation", "Orientation (optional)"),
            Field::new("house_status", "Status (optional)"),
            Field::new("owner_name", "Owner (optional)"),
            Field::new("owner_phone", "Owner phone (optional)"),
            Field::new("resident_name", "Resident (optional)"),
            Field::new("resident_phone", "Resident phone (optional)"),
        ]
    }

    pub fn new() -> Self {
        Self {
            state: FormState::new(Self::fields()),
            id: None,
        }
    }

    /// New house in a known building.
    pub fn in_building(building_id: u64) -> Self {
        let mut form = Self::new();
        form.state.set("building_id", building_id.to_string());
        form
    }

    pub fn edit(house: &HouseResponse) -> Self {
        let mut state = FormState::new(Self::fields());
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        let number = |v: Option<u32>| v.map(|n| n.to_string()).unwrap_or_default();

        state.set("building_id", house.building_id.to_string());
        state.set("house_number", house.house_number.as_str());
        state.set("floor", house.floor.to_string());
        state.set("unit_type", text(&house.unit_type));
        state.set("area", house.area.map(|a| a.to_string()).unwrap_or_default());
        state.set("room_count", number(house.room_count));
        state.set("living_room_count", number(house.living_room_count));
        state.set("bathroom_count", number(house.bathroom_count));
        state.set("orientation", text(&house.orientation));
        state.set("house_status", house.house_status.as_str());
        state.set("owner_name", text(&house.owner_name));
        state.set("owner_phone", text(&house.owner_phone));
        state.set("resident_name", text(&house.resident_name));
        state.set("resident_phone", text(&house.resident_phone));
        Self {
            state,
            id: Some(house.id),
        }
    }

    fn count(&self, key: &'static str, label: &str) -> Result<Option<u32>, ValidationError> {
        self.state.parsed_opt(key, &format!("{label} {WHOLE_NUMBER}"))
    }
}

impl Default for HouseForm {
    fn default() -> Self {
        Self::new()
    }
}

impl Form for HouseForm {
    type Request = HouseRequest;

    fn title(&self) -> &'static str {
        if self.id.is_some() {
            "Edit house"
        } else {
            "Add house"
        }
    }

    fn state(&self) -> &FormState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut FormState {
        &mut self.state
    }

    fn validate(&self) -> Result<HouseRequest, ValidationError> {
        let building_id = self.state.parsed(
            "building_id",
            "Enter a building id",
            &format!("Building id {WHOLE_NUMBER}"),
        )?;
        let house_number = self.state.required("house_number", "Enter a house number")?;
        let floor = self
            .state
            .parsed("floor", "Enter a floor", &format!("Floor {WHOLE_NUMBER}"))?;

        Ok(HouseRequest {
            id: self.id,
            building_id,
            house_number,
            floor,
            unit_type: self.state.optional("unit_type"),
            area: self.state.decimal_opt("area", "Area must be a number")?,
            room_count: self.count("room_count", "Rooms")?,
            living_room_count: self.count("living_room_count", "Living rooms")?,
            bathroom_count: self.count("bathroom_count", "Bathrooms")?,
            orientation: self.state.optional("orientation"),
            house_status: self.state.optional("house_status"),
            owner_name: self.state.optional("owner_name"),
            owner_phone: self.state.optional("owner_phone"),
            resident_name: self.state.optional("resident_name"),
            resident_phone: self.state.optional("resident_phone"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_numbers_must_parse() {
        let mut form = HouseForm::in_building(3);
        form.state_mut().set("house_number", "A101");
        form.state_mut().set("floor", "-1");
        form.state_mut().set("room_count", "two");
        assert_eq!(
            form.validate().unwrap_err().message,
            "Rooms must be a whole number"
        );

        form.state_mut().set("room_count", "2");
        form.state_mut().set("area", "89.5");
        let req = form.validate().unwrap();
        assert_eq!(req.building_id, 3);
        assert_eq!(req.floor, -1);
        assert_eq!(req.room_count, Some(2));
        assert_eq!(req.area, Some(89.5));
        assert_eq!(req.bathroom_count, None);
    }

    #[test]
    fn area_must_be_finite() {
        let mut form = HouseForm::in_building(3);
        form.state_mut().set("house_number", "A101");
        form.state_mut().set("floor", "2");
        form.state_mut().set("area", "NaN");
        assert_eq!(form.validate().unwrap_err().message, "Area must be a number");

        form.state_mut().set("area", "infinity");
        assert_eq!(form.validate().unwrap_err().field, "area");
    }

    #[test]
    fn building_id_comes_first() {
        let form = HouseForm::new();
        assert_eq!(form.validate().unwrap_err().field, "building_id");
    }
}
