use super::{text, Record, ResourceApi, Routes};
use crate::error::ClientResult;
use crate::session::Session;
use crate::transport::Request;
use estate_common::api::RegistrationResponse;
use std::borrow::Cow;

static ROUTES: Routes = Routes {
    name: "registration",
    mine: None,
    owner_param: None,
    all: "/api/registration/admin/pending",
    search_mine: None,
    search_all: None,
    search_aliases: &[],
    paged: false,
    admin_only: true,
};

impl Record for RegistrationResponse {
    const ROUTES: &'static Routes = &ROUTES;

    fn id(&self) -> u64 {
        self.id
    }

    fn search_text(&self) -> Vec<Cow<'_, str>> {
        vec![
            text(&self.username),
            text(&self.house_number),
            text(self.status.as_str()),
        ]
    }
}

impl ResourceApi<RegistrationResponse> {
    pub async fn pending_count(&self, session: &Session) -> ClientResult<u64> {
        let req = Request::get("/api/registration/admin/pending-count");
        self.client.fetch(session, req).await
    }

    pub async fn approve(&self, session: &Session, request_id: u64) -> ClientResult<()> {
        let req = Request::post(format!("/api/registration/admin/approve/{request_id}"));
        self.client.execute(session, req).await
    }

    pub async fn reject(&self, session: &Session, request_id: u64) -> ClientResult<()> {
        let req = Request::post(format!("/api/registration/admin/reject/{request_id}"));
        self.client.execute(session, req).await
    }
}
