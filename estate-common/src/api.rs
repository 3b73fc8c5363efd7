use crate::domain::{FeeStatus, ParkingStatus, RegistrationStatus, Role, WorkStatus};

/// Logical success code carried in the envelope.
pub const SUCCESS_CODE: i32 = 200;

/// Response header the backend uses to hand out a refreshed token.
pub const RENEW_TOKEN_HEADER: &str = "X-Renew-Token";

/// Every backend response is wrapped in this envelope.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ApiResult<T> {
    pub code: i32,
    #[serde(default, alias = "message")]
    pub msg: Option<String>,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

impl<T> ApiResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            code: SUCCESS_CODE,
            msg: Some("success".into()),
            data: Some(data),
        }
    }

    pub fn fail(code: i32, msg: &str) -> Self {
        Self {
            code,
            msg: Some(msg.into()),
            data: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PageResponse<T> {
    #[serde(default = "Vec::new")]
    pub records: Vec<T>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub current: u64,
    #[serde(default)]
    pub pages: u64,
}

impl<T> PageResponse<T> {
    /// Wraps an unpaginated list so flat endpoints read like a single page.
    pub fn single(records: Vec<T>) -> Self {
        let total = records.len() as u64;
        Self {
            records,
            total,
            size: total,
            current: 1,
            pages: 1,
        }
    }
}

// Requests

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub name: String,
    pub house_number: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayRequest {
    pub fee_id: u64,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeAddRequest {
    pub house_number: String,
    pub resident_name: String,
    pub amount: f64,
    pub month: String,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairSubmitRequest {
    pub user_id: u64,
    pub house_number: String,
    pub resident_name: String,
    pub phone: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairUpdateRequest {
    pub repair_id: u64,
    pub status: WorkStatus,
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintSubmitRequest {
    pub house_number: String,
    pub resident_name: String,
    pub phone: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintUpdateRequest {
    pub complaint_id: u64,
    pub status: WorkStatus,
    pub handle_result: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkingRequest {
    /// Present on updates only.
    #[serde(rename = "parkingId", skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub parking_number: String,
    pub house_number: Option<String>,
    pub resident_name: Option<String>,
    pub car_plate: Option<String>,
    pub status: ParkingStatus,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub building_number: String,
    pub building_name: String,
    pub total_floors: u32,
    pub total_units: u32,
    pub building_type: Option<String>,
    pub completion_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub building_id: u64,
    pub house_number: String,
    pub floor: i32,
    pub unit_type: Option<String>,
    pub area: Option<f64>,
    pub room_count: Option<u32>,
    pub living_room_count: Option<u32>,
    pub bathroom_count: Option<u32>,
    pub orientation: Option<String>,
    pub house_status: Option<String>,
    pub owner_name: Option<String>,
    pub owner_phone: Option<String>,
    pub resident_name: Option<String>,
    pub resident_phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCreateRequest {
    pub username: String,
    pub password: String,
    pub name: String,
    pub house_number: Option<String>,
    pub phone: Option<String>,
    pub role: Role,
}

// Records

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeResponse {
    pub id: u64,
    pub house_number: String,
    pub resident_name: String,
    pub amount: f64,
    pub month: String,
    pub status: FeeStatus,
    pub payment_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairResponse {
    pub id: u64,
    #[serde(default)]
    pub user_id: u64,
    pub house_number: String,
    pub resident_name: String,
    pub phone: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: Option<String>,
    pub status: WorkStatus,
    pub submit_time: String,
    pub handle_time: Option<String>,
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintResponse {
    pub id: u64,
    pub house_number: String,
    pub resident_name: String,
    pub phone: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
    pub status: WorkStatus,
    pub submit_time: String,
    pub handle_result: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkingResponse {
    pub id: u64,
    pub parking_number: String,
    pub house_number: Option<String>,
    pub resident_name: Option<String>,
    pub car_plate: Option<String>,
    pub status: ParkingStatus,
    pub start_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResponse {
    pub id: u64,
    pub username: String,
    pub house_number: String,
    pub status: RegistrationStatus,
    pub submit_time: String,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: u64,
    pub username: String,
    pub name: String,
    pub house_number: Option<String>,
    pub phone: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub status: i32,
    #[serde(default)]
    pub create_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingResponse {
    pub id: u64,
    pub building_number: String,
    pub building_name: String,
    pub total_floors: u32,
    pub total_units: u32,
    pub building_type: Option<String>,
    pub completion_date: Option<String>,
    pub status: String,
    #[serde(default)]
    pub create_time: Option<String>,
    pub update_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseResponse {
    pub id: u64,
    pub building_id: u64,
    pub building_number: Option<String>,
    pub building_name: Option<String>,
    pub house_number: String,
    pub floor: i32,
    pub unit_type: Option<String>,
    pub area: Option<f64>,
    pub room_count: Option<u32>,
    pub living_room_count: Option<u32>,
    pub bathroom_count: Option<u32>,
    pub orientation: Option<String>,
    pub house_status: String,
    pub owner_name: Option<String>,
    pub owner_phone: Option<String>,
    pub resident_name: Option<String>,
    pub resident_phone: Option<String>,
    #[serde(default)]
    pub create_time: Option<String>,
    pub update_time: Option<String>,
}
