use super::{opt_text, text, Record, ResourceApi, Routes};
use crate::error::ClientResult;
use crate::session::Session;
use crate::transport::Request;
use estate_common::api::{BuildingRequest, BuildingResponse};
use std::borrow::Cow;

// No remote search, typed keywords filter the loaded pages.
static ROUTES: Routes = Routes {
    name: "building",
    mine: None,
    owner_param: None,
    all: "/api/building/admin/all",
    search_mine: None,
    search_all: None,
    search_aliases: &[],
    paged: true,
    admin_only: true,
};

impl Record for BuildingResponse {
    const ROUTES: &'static Routes = &ROUTES;

    fn id(&self) -> u64 {
        self.id
    }

    fn search_text(&self) -> Vec<Cow<'_, str>> {
        vec![
            text(&self.building_number),
            text(&self.building_name),
            opt_text(&self.building_type),
            text(&self.status),
        ]
    }
}

impl ResourceApi<BuildingResponse> {
    pub async fn detail(&self, session: &Session, building_id: u64) -> ClientResult<BuildingResponse> {
        let req = Request::get(format!("/api/building/{building_id}"));
        self.client.fetch(session, req).await
    }

    pub async fn add(&self, session: &Session, req: &BuildingRequest) -> ClientResult<()> {
        let req = Request::post("/api/building/admin/add").json(req)?;
        self.client.execute(session, req).await
    }

    pub async fn update(&self, session: &Session, req: &BuildingRequest) -> ClientResult<()> {
        let req = Request::put("/api/building/admin/update").json(req)?;
        self.client.execute(session, req).await
    }

    pub async fn delete(&self, session: &Session, building_id: u64) -> ClientResult<()> {
        let req = Request::delete(format!("/api/building/admin/delete/{building_id}"));
        self.client.execute(session, req).await
    }
}
