use super::{opt_text, text, Record, ResourceApi, Routes};
use crate::error::{ApiError, ClientResult};
use crate::session::Session;
use crate::transport::Request;
use estate_common::api::{FeeAddRequest, FeeResponse, PayRequest};
use std::borrow::Cow;

static ROUTES: Routes = Routes {
    name: "fee",
    mine: Some("/api/fee/my"),
    owner_param: Some("houseNumber"),
    all: "/api/fee/admin/all",
    search_mine: Some("/api/fee/search"),
    search_all: Some("/api/fee/admin/search"),
    search_aliases: &[],
    paged: true,
    admin_only: false,
};

impl Record for FeeResponse {
    const ROUTES: &'static Routes = &ROUTES;

    fn id(&self) -> u64 {
        self.id
    }

    fn search_text(&self) -> Vec<Cow<'_, str>> {
        vec![
            text(&self.house_number),
            text(&self.resident_name),
            text(&self.month),
            text(self.status.as_str()),
            opt_text(&self.payment_date),
        ]
    }
}

impl ResourceApi<FeeResponse> {
    pub async fn add(&self, session: &Session, req: &FeeAddRequest) -> ClientResult<()> {
        let req = Request::post("/api/fee/admin/add").json(req)?;
        self.client.execute(session, req).await
    }

    pub async fn pay(&self, session: &Session, fee_id: u64) -> ClientResult<()> {
        let req = Request::put("/api/fee/pay").json(&PayRequest { fee_id })?;
        self.client.execute(session, req).await
    }

    /// The backend has no fee update endpoint.
    pub async fn update(&self, _session: &Session, _fee: &FeeResponse) -> ClientResult<()> {
        Err(ApiError::Unsupported("Editing fees"))
    }

    pub async fn delete(&self, _session: &Session, _fee_id: u64) -> ClientResult<()> {
        Err(ApiError::Unsupported("Deleting fees"))
    }
}
