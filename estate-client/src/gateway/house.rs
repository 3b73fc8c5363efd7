use super::{opt_text, text, ListSource, Page, Record, ResourceApi, Routes};
use crate::error::{ApiError, ClientResult};
use crate::session::Session;
use crate::transport::Request;
use async_trait::async_trait;
use estate_common::api::{HouseRequest, HouseResponse, PageResponse};
use std::borrow::Cow;

static ROUTES: Routes = Routes {
    name: "house",
    mine: None,
    owner_param: None,
    all: "/api/house/admin/all",
    search_mine: None,
    search_all: Some("/api/house/search"),
    search_aliases: &["houseNumber"],
    paged: true,
    admin_only: true,
};

impl Record for HouseResponse {
    const ROUTES: &'static Routes = &ROUTES;

    fn id(&self) -> u64 {
        self.id
    }

    fn search_text(&self) -> Vec<Cow<'_, str>> {
        vec![
            text(&self.house_number),
            opt_text(&self.building_number),
            opt_text(&self.building_name),
            opt_text(&self.owner_name),
            opt_text(&self.resident_name),
            text(&self.house_status),
        ]
    }
}

impl ResourceApi<HouseResponse> {
    pub async fn detail(&self, session: &Session, house_id: u64) -> ClientResult<HouseResponse> {
        let req = Request::get(format!("/api/house/{house_id}"));
        self.client.fetch(session, req).await
    }

    pub async fn add(&self, session: &Session, req: &HouseRequest) -> ClientResult<()> {
        let req = Request::post("/api/house/admin/add").json(req)?;
        self.client.execute(session, req).await
    }

    pub async fn update(&self, session: &Session, req: &HouseRequest) -> ClientResult<()> {
        let req = Request::put("/api/house/admin/update").json(req)?;
        self.client.execute(session, req).await
    }

    pub async fn delete(&self, session: &Session, house_id: u64) -> ClientResult<()> {
        let req = Request::delete(format!("/api/house/admin/delete/{house_id}"));
        self.client.execute(session, req).await
    }

    pub fn in_building(&self, building_id: u64) -> HousesInBuilding {
        HousesInBuilding {
            houses: self.clone(),
            building_id,
        }
    }
}

/// Houses of one building. Search still covers every building.
#[derive(Clone)]
pub struct HousesInBuilding {
    houses: ResourceApi<HouseResponse>,
    building_id: u64,
}

impl HousesInBuilding {
    pub fn building_id(&self) -> u64 {
        self.building_id
    }

    pub fn houses(&self) -> &ResourceApi<HouseResponse> {
        &self.houses
    }
}

#[async_trait]
impl ListSource for HousesInBuilding {
    type Record = HouseResponse;

    fn remote_search(&self) -> bool {
        true
    }

    fn admin_only(&self) -> bool {
        true
    }

    async fn fetch_mine(
        &self,
        _session: &Session,
        _house_number: &str,
        _page: u64,
        _size: u64,
    ) -> ClientResult<Page<HouseResponse>> {
        Err(ApiError::Unsupported("Listing your own houses"))
    }

    async fn fetch_all(
        &self,
        session: &Session,
        page: u64,
        size: u64,
    ) -> ClientResult<Page<HouseResponse>> {
        let req = Request::get(format!("/api/house/building/{}", self.building_id)).page(page, size);
        let res: PageResponse<HouseResponse> = self.houses.client.fetch(session, req).await?;
        Ok(Page::from_response(res, page))
    }

    async fn search_mine(
        &self,
        session: &Session,
        house_number: &str,
        keyword: &str,
        page: u64,
        size: u64,
    ) -> ClientResult<Page<HouseResponse>> {
        self.houses
            .search_mine(session, house_number, keyword, page, size)
            .await
    }

    async fn search_all(
        &self,
        session: &Session,
        keyword: &str,
        page: u64,
        size: u64,
    ) -> ClientResult<Page<HouseResponse>> {
        self.houses.search_all(session, keyword, page, size).await
    }
}
