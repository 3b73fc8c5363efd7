use super::{opt_text, text, Record, ResourceApi, Routes};
use crate::error::ClientResult;
use crate::session::Session;
use crate::transport::Request;
use estate_common::api::{ParkingRequest, ParkingResponse};
use std::borrow::Cow;

static ROUTES: Routes = Routes {
    name: "parking",
    mine: Some("/api/parking/my"),
    owner_param: Some("houseNumber"),
    all: "/api/parking/admin/all",
    search_mine: Some("/api/parking/search"),
    search_all: Some("/api/parking/admin/search"),
    search_aliases: &[],
    paged: true,
    admin_only: false,
};

impl Record for ParkingResponse {
    const ROUTES: &'static Routes = &ROUTES;

    fn id(&self) -> u64 {
        self.id
    }

    fn search_text(&self) -> Vec<Cow<'_, str>> {
        vec![
            text(&self.parking_number),
            opt_text(&self.house_number),
            opt_text(&self.resident_name),
            opt_text(&self.car_plate),
            text(self.status.as_str()),
        ]
    }
}

impl ResourceApi<ParkingResponse> {
    pub async fn add(&self, session: &Session, req: &ParkingRequest) -> ClientResult<()> {
        let req = Request::post("/api/parking/admin/add").json(req)?;
        self.client.execute(session, req).await
    }

    pub async fn update(&self, session: &Session, req: &ParkingRequest) -> ClientResult<()> {
        let req = Request::put("/api/parking/admin/update").json(req)?;
        self.client.execute(session, req).await
    }

    pub async fn delete(&self, session: &Session, parking_id: u64) -> ClientResult<()> {
        let req = Request::delete(format!("/api/parking/admin/delete/{parking_id}"));
        self.client.execute(session, req).await
    }
}
