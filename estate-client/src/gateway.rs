//! Typed remote operations, one generic implementation for every resource.
//!
//! Each record type carries a static route table. `ResourceApi<R>` turns that
//! table into list, search and paging calls, and the per-resource modules add
//! their own mutations on top.

use crate::api_client::ApiClient;
use crate::error::{ApiError, ClientResult};
use crate::session::Session;
use crate::transport::Request;
use async_trait::async_trait;
use estate_common::api::PageResponse;
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::marker::PhantomData;

mod building;
mod complaint;
mod fee;
mod house;
mod parking;
mod registration;
mod repair;
mod user;

pub use house::HousesInBuilding;
pub use user::ADMIN_UNDELETABLE;

/// Where a resource lives on the backend.
#[derive(Debug)]
pub struct Routes {
    pub name: &'static str,
    /// Resident listing. `None` when residents have no view of the resource.
    pub mine: Option<&'static str>,
    /// Query parameter carrying the house number on `mine`, if the backend wants one.
    pub owner_param: Option<&'static str>,
    pub all: &'static str,
    pub search_mine: Option<&'static str>,
    pub search_all: Option<&'static str>,
    /// Extra query parameters that repeat the search keyword.
    pub search_aliases: &'static [&'static str],
    /// Flat list endpoints return a bare array instead of a page.
    pub paged: bool,
    pub admin_only: bool,
}

impl Routes {
    pub fn remote_search(&self) -> bool {
        self.search_all.is_some()
    }
}

pub trait Record: DeserializeOwned + Clone + Send + Sync + 'static {
    const ROUTES: &'static Routes;

    fn id(&self) -> u64;

    /// Fields the in-memory filter looks at.
    fn search_text(&self) -> Vec<Cow<'_, str>>;

    fn matches(&self, keyword: &str) -> bool {
        let keyword = keyword.trim().to_lowercase();
        keyword.is_empty()
            || self
                .search_text()
                .iter()
                .any(|field| field.to_lowercase().contains(&keyword))
    }
}

/// One page of records as the controllers see it.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<R> {
    pub records: Vec<R>,
    pub total: u64,
    pub page_size: u64,
    pub current_page: u64,
    pub total_pages: u64,
}

impl<R> Page<R> {
    /// Normalises a backend page. A missing `current` is taken from the request.
    ///
    /// An empty result reports zero pages, so `total_pages` is raised to keep
    /// `current_page <= total_pages`.
    pub fn from_response(res: PageResponse<R>, requested: u64) -> Self {
        let current_page = if res.current == 0 { requested } else { res.current };
        Self {
            total: res.total,
            page_size: res.size,
            current_page,
            total_pages: res.pages.max(current_page),
            records: res.records,
        }
    }

    pub fn single(records: Vec<R>) -> Self {
        Self::from_response(PageResponse::single(records), 1)
    }

    pub fn is_last(&self) -> bool {
        self.current_page >= self.total_pages
    }
}

/// The four fetch variants a list screen can ask for.
#[async_trait]
pub trait ListSource: Send + Sync {
    type Record: Record;

    /// Whether typed search goes to the backend or filters locally.
    fn remote_search(&self) -> bool;

    fn admin_only(&self) -> bool;

    async fn fetch_mine(
        &self,
        session: &Session,
        house_number: &str,
        page: u64,
        size: u64,
    ) -> ClientResult<Page<Self::Record>>;

    async fn fetch_all(
        &self,
        session: &Session,
        page: u64,
        size: u64,
    ) -> ClientResult<Page<Self::Record>>;

    async fn search_mine(
        &self,
        session: &Session,
        house_number: &str,
        keyword: &str,
        page: u64,
        size: u64,
    ) -> ClientResult<Page<Self::Record>>;

    async fn search_all(
        &self,
        session: &Session,
        keyword: &str,
        page: u64,
        size: u64,
    ) -> ClientResult<Page<Self::Record>>;
}

pub struct ResourceApi<R> {
    client: ApiClient,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for ResourceApi<R> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            _record: PhantomData,
        }
    }
}

impl<R: Record> ResourceApi<R> {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            _record: PhantomData,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn routes(&self) -> &'static Routes {
        R::ROUTES
    }

    async fn list(&self, session: &Session, req: Request, page: u64) -> ClientResult<Page<R>> {
        if R::ROUTES.paged {
            let res: PageResponse<R> = self.client.fetch(session, req).await?;
            Ok(Page::from_response(res, page))
        } else {
            let records: Vec<R> = self.client.fetch(session, req).await?;
            Ok(Page::single(records))
        }
    }

    fn paged(&self, req: Request, page: u64, size: u64) -> Request {
        if R::ROUTES.paged {
            req.page(page, size)
        } else {
            req
        }
    }

    fn unsupported(&self) -> ApiError {
        ApiError::Unsupported("This action")
    }
}

#[async_trait]
impl<R: Record> ListSource for ResourceApi<R> {
    type Record = R;

    fn remote_search(&self) -> bool {
        R::ROUTES.remote_search()
    }

    fn admin_only(&self) -> bool {
        R::ROUTES.admin_only
    }

    async fn fetch_mine(
        &self,
        session: &Session,
        house_number: &str,
        page: u64,
        size: u64,
    ) -> ClientResult<Page<R>> {
        let path = R::ROUTES.mine.ok_or_else(|| self.unsupported())?;
        let mut req = Request::get(path);
        if let Some(param) = R::ROUTES.owner_param {
            req = req.query(param, house_number);
        }
        let req = self.paged(req, page, size);
        self.list(session, req, page).await
    }

    async fn fetch_all(&self, session: &Session, page: u64, size: u64) -> ClientResult<Page<R>> {
        let req = self.paged(Request::get(R::ROUTES.all), page, size);
        self.list(session, req, page).await
    }

    async fn search_mine(
        &self,
        session: &Session,
        house_number: &str,
        keyword: &str,
        page: u64,
        size: u64,
    ) -> ClientResult<Page<R>> {
        let path = R::ROUTES.search_mine.ok_or_else(|| self.unsupported())?;
        let req = Request::get(path)
            .query("houseNumber", house_number)
            .query("keyword", keyword)
            .page(page, size);
        self.list(session, req, page).await
    }

    async fn search_all(
        &self,
        session: &Session,
        keyword: &str,
        page: u64,
        size: u64,
    ) -> ClientResult<Page<R>> {
        let path = R::ROUTES.search_all.ok_or_else(|| self.unsupported())?;
        let mut req = Request::get(path).query("keyword", keyword);
        for alias in R::ROUTES.search_aliases {
            req = req.query(*alias, keyword);
        }
        self.list(session, req.page(page, size), page).await
    }
}

/// Shortcut for building `Cow` field lists.
pub(crate) fn text(value: &str) -> Cow<'_, str> {
    Cow::Borrowed(value)
}

pub(crate) fn opt_text(value: &Option<String>) -> Cow<'_, str> {
    Cow::Borrowed(value.as_deref().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use estate_common::api::FeeResponse;
    use estate_common::domain::FeeStatus;

    #[test]
    fn page_takes_requested_number_when_missing() {
        let res = PageResponse::<u8> {
            records: vec![1, 2],
            total: 12,
            size: 2,
            current: 0,
            pages: 6,
        };
        let page = Page::from_response(res, 3);
        assert_eq!(page.current_page, 3);
        assert!(!page.is_last());
    }

    #[test]
    fn empty_result_is_the_last_page() {
        let page = Page::from_response(
            PageResponse::<u8> {
                records: vec![],
                total: 0,
                size: 20,
                current: 1,
                pages: 0,
            },
            1,
        );
        assert!(page.is_last());
        assert_eq!(page.current_page, 1);
        assert!(page.current_page <= page.total_pages);
    }

    #[test]
    fn record_match_is_case_insensitive() {
        let fee = FeeResponse {
            id: 1,
            house_number: "A101".into(),
            resident_name: "Li Lei".into(),
            amount: 120.0,
            month: "2024-05".into(),
            status: FeeStatus::Unpaid,
            payment_date: None,
        };
        assert!(fee.matches("a10"));
        assert!(fee.matches("lei"));
        assert!(fee.matches("  "));
        assert!(!fee.matches("B202"));
    }
}
