use estate_common::api::{
    BuildingResponse, ComplaintResponse, FeeResponse, HouseResponse, ParkingResponse,
    RegistrationResponse, RepairResponse, UserResponse,
};

/// How a record is laid out as one line of a table.
pub(crate) trait Row {
    const HEADERS: &'static [&'static str];

    fn cells(&self) -> Vec<String>;

    fn line(&self) -> String {
        self.cells().join("\t")
    }
}

fn or_dash(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| "-".into())
}

impl Row for FeeResponse {
    const HEADERS: &'static [&'static str] = &["Id", "House", "Resident", "Month", "Amount", "Status", "Paid on"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.house_number.clone(),
            self.resident_name.clone(),
            self.month.clone(),
            format!("{:.2}", self.amount),
            self.status.to_string(),
            or_dash(&self.payment_date),
        ]
    }
}

impl Row for RepairResponse {
    const HEADERS: &'static [&'static str] = &["Id", "House", "Resident", "Type", "Status", "Submitted", "Feedback"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.house_number.clone(),
            self.resident_name.clone(),
            self.kind.clone(),
            self.status.to_string(),
            self.submit_time.clone(),
            or_dash(&self.feedback),
        ]
    }
}

impl Row for ComplaintResponse {
    const HEADERS: &'static [&'static str] = &["Id", "House", "Resident", "Type", "Status", "Submitted", "Content"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.house_number.clone(),
            self.resident_name.clone(),
            self.kind.clone(),
            self.status.to_string(),
            self.submit_time.clone(),
            self.content.clone(),
        ]
    }
}

impl Row for ParkingResponse {
    const HEADERS: &'static [&'static str] = &["Id", "Number", "Status", "House", "Resident", "Plate"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.parking_number.clone(),
            self.status.to_string(),
            or_dash(&self.house_number),
            or_dash(&self.resident_name),
            or_dash(&self.car_plate),
        ]
    }
}

impl Row for BuildingResponse {
    const HEADERS: &'static [&'static str] = &["Id", "Number", "Name", "Floors", "Units", "Type", "Status"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.building_number.clone(),
            self.building_name.clone(),
            self.total_floors.to_string(),
            self.total_units.to_string(),
            or_dash(&self.building_type),
            self.status.clone(),
        ]
    }
}

impl Row for HouseResponse {
    const HEADERS: &'static [&'static str] = &["Id", "Building", "House", "Floor", "Area", "Status", "Owner"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.building_number
                .clone()
                .unwrap_or_else(|| self.building_id.to_string()),
            self.house_number.clone(),
            self.floor.to_string(),
            self.area.map_or_else(|| "-".into(), |a| format!("{a:.1}")),
            self.house_status.clone(),
            or_dash(&self.owner_name),
        ]
    }
}

impl Row for UserResponse {
    const HEADERS: &'static [&'static str] = &["Id", "Username", "Name", "Role", "House", "Phone"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.username.clone(),
            self.name.clone(),
            self.role.label().to_string(),
            or_dash(&self.house_number),
            or_dash(&self.phone),
        ]
    }
}

impl Row for RegistrationResponse {
    const HEADERS: &'static [&'static str] = &["Id", "Username", "House", "Status", "Submitted"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.username.clone(),
            self.house_number.clone(),
            self.status.to_string(),
            self.submit_time.clone(),
        ]
    }
}
