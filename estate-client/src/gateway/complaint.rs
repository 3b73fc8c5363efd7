use super::{opt_text, text, Record, ResourceApi, Routes};
use crate::error::{ApiError, ClientResult};
use crate::session::Session;
use crate::transport::Request;
use estate_common::api::{ComplaintResponse, ComplaintSubmitRequest, ComplaintUpdateRequest};
use std::borrow::Cow;

static ROUTES: Routes = Routes {
    name: "complaint",
    mine: Some("/api/complaint/my"),
    owner_param: Some("houseNumber"),
    all: "/api/complaint/admin/all",
    search_mine: Some("/api/complaint/search"),
    search_all: Some("/api/complaint/admin/search"),
    search_aliases: &[],
    paged: true,
    admin_only: false,
};

impl Record for ComplaintResponse {
    const ROUTES: &'static Routes = &ROUTES;

    fn id(&self) -> u64 {
        self.id
    }

    fn search_text(&self) -> Vec<Cow<'_, str>> {
        vec![
            text(&self.house_number),
            text(&self.resident_name),
            text(&self.kind),
            text(&self.content),
            text(self.status.as_str()),
            opt_text(&self.handle_result),
        ]
    }
}

impl ResourceApi<ComplaintResponse> {
    pub async fn submit(&self, session: &Session, req: &ComplaintSubmitRequest) -> ClientResult<()> {
        let req = Request::post("/api/complaint/submit").json(req)?;
        self.client.execute(session, req).await
    }

    pub async fn update(&self, session: &Session, req: &ComplaintUpdateRequest) -> ClientResult<()> {
        let req = Request::put("/api/complaint/admin/update").json(req)?;
        self.client.execute(session, req).await
    }

    pub async fn delete(&self, _session: &Session, _complaint_id: u64) -> ClientResult<()> {
        Err(ApiError::Unsupported("Deleting complaints"))
    }
}
