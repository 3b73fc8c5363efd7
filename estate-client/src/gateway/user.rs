use super::{opt_text, text, Record, ResourceApi, Routes};
use crate::error::{ClientResult, ValidationError};
use crate::session::Session;
use crate::transport::Request;
use estate_common::api::{UserCreateRequest, UserResponse};
use estate_common::domain::Role;
use std::borrow::Cow;

pub const ADMIN_UNDELETABLE: &str = "Administrators cannot be deleted";

static ROUTES: Routes = Routes {
    name: "user",
    mine: None,
    owner_param: None,
    all: "/api/user/admin/all",
    search_mine: None,
    search_all: None,
    search_aliases: &[],
    paged: false,
    admin_only: true,
};

impl Record for UserResponse {
    const ROUTES: &'static Routes = &ROUTES;

    fn id(&self) -> u64 {
        self.id
    }

    fn search_text(&self) -> Vec<Cow<'_, str>> {
        vec![
            text(&self.username),
            text(&self.name),
            opt_text(&self.house_number),
            opt_text(&self.phone),
            text(self.role.as_str()),
        ]
    }
}

impl ResourceApi<UserResponse> {
    pub async fn create(&self, session: &Session, req: &UserCreateRequest) -> ClientResult<()> {
        let req = Request::post("/api/user/admin/create").json(req)?;
        self.client.execute(session, req).await
    }

    /// Administrators are refused before anything is sent.
    pub async fn delete(&self, session: &Session, user: &UserResponse) -> ClientResult<()> {
        if user.role == Role::Admin {
            return Err(ValidationError::new("role", ADMIN_UNDELETABLE).into());
        }
        let req = Request::delete(format!("/api/user/admin/delete/{}", user.id));
        self.client.execute(session, req).await
    }
}
