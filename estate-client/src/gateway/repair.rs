use super::{opt_text, text, Record, ResourceApi, Routes};
use crate::error::{ApiError, ClientResult};
use crate::session::Session;
use crate::transport::Request;
use estate_common::api::{RepairResponse, RepairSubmitRequest, RepairUpdateRequest};
use std::borrow::Cow;

// The backend derives the owner of `my` from the token.
static ROUTES: Routes = Routes {
    name: "repair",
    mine: Some("/api/repair/my"),
    owner_param: None,
    all: "/api/repair/admin/all",
    search_mine: Some("/api/repair/search"),
    search_all: Some("/api/repair/admin/search"),
    search_aliases: &[],
    paged: true,
    admin_only: false,
};

impl Record for RepairResponse {
    const ROUTES: &'static Routes = &ROUTES;

    fn id(&self) -> u64 {
        self.id
    }

    fn search_text(&self) -> Vec<Cow<'_, str>> {
        vec![
            text(&self.house_number),
            text(&self.resident_name),
            text(&self.phone),
            text(&self.kind),
            opt_text(&self.description),
            text(self.status.as_str()),
        ]
    }
}

impl ResourceApi<RepairResponse> {
    pub async fn submit(&self, session: &Session, req: &RepairSubmitRequest) -> ClientResult<()> {
        let req = Request::post("/api/repair/submit").json(req)?;
        self.client.execute(session, req).await
    }

    pub async fn update(&self, session: &Session, req: &RepairUpdateRequest) -> ClientResult<()> {
        let req = Request::put("/api/repair/admin/update").json(req)?;
        self.client.execute(session, req).await
    }

    pub async fn delete(&self, _session: &Session, _repair_id: u64) -> ClientResult<()> {
        Err(ApiError::Unsupported("Deleting repairs"))
    }
}
