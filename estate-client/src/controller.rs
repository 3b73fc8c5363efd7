//! Paged, searchable list state shared by every resource screen.
//!
//! The controller never awaits anything itself on the hot path. It hands out
//! [`FetchTicket`]s, the caller runs them wherever it likes, and the results
//! come back through [`ListController::apply`]. Every ticket carries the
//! sequence number it was issued under and only the latest one is applied.

use crate::error::{ApiError, ClientResult, FORBIDDEN, MISSING_HOUSE_NUMBER};
use crate::events::Notifier;
use crate::gateway::{ListSource, Page, Record};
use crate::session::Session;
use std::future::Future;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    Mine { house_number: String },
    All,
    SearchMine { house_number: String, keyword: String },
    SearchAll { keyword: String },
}

impl FetchRequest {
    fn is_search(&self) -> bool {
        matches!(self, Self::SearchMine { .. } | Self::SearchAll { .. })
    }
}

/// A fetch the controller wants done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub page: u64,
    pub size: u64,
    pub request: FetchRequest,
}

impl FetchTicket {
    pub async fn run<S: ListSource + ?Sized>(
        &self,
        source: &S,
        session: &Session,
    ) -> ClientResult<Page<S::Record>> {
        match &self.request {
            FetchRequest::Mine { house_number } => {
                source
                    .fetch_mine(session, house_number, self.page, self.size)
                    .await
            }
            FetchRequest::All => source.fetch_all(session, self.page, self.size).await,
            FetchRequest::SearchMine {
                house_number,
                keyword,
            } => {
                source
                    .search_mine(session, house_number, keyword, self.page, self.size)
                    .await
            }
            FetchRequest::SearchAll { keyword } => {
                source
                    .search_all(session, keyword, self.page, self.size)
                    .await
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Loaded,
    LoadingMore,
    Exhausted,
}

/// Paging position of one fetch variant.
#[derive(Debug, Clone)]
struct Cursor {
    request: FetchRequest,
    page: u64,
    exhausted: bool,
}

impl Cursor {
    fn new(request: FetchRequest) -> Self {
        Self {
            request,
            page: 0,
            exhausted: false,
        }
    }
}

#[derive(Debug, Clone)]
struct Search {
    keyword: String,
    /// `None` while filtering in memory.
    remote: Option<Cursor>,
}

pub struct ListController<S: ListSource> {
    source: Arc<S>,
    notifier: Notifier,
    page_size: u64,
    records: Vec<S::Record>,
    /// Last full, unfiltered list.
    snapshot: Option<Vec<S::Record>>,
    browse: Option<Cursor>,
    search: Option<Search>,
    loading: bool,
    seq: u64,
}

impl<S: ListSource> ListController<S> {
    pub fn new(source: S, page_size: u64, notifier: Notifier) -> Self {
        Self {
            source: Arc::new(source),
            notifier,
            page_size: page_size.max(1),
            records: Vec::new(),
            snapshot: None,
            browse: None,
            search: None,
            loading: false,
            seq: 0,
        }
    }

    pub fn source(&self) -> Arc<S> {
        Arc::clone(&self.source)
    }

    pub fn records(&self) -> &[S::Record] {
        &self.records
    }

    pub fn keyword(&self) -> Option<&str> {
        self.search.as_ref().map(|s| s.keyword.as_str())
    }

    pub fn is_searching(&self) -> bool {
        self.search.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn current_page(&self) -> u64 {
        self.active_cursor().map_or(0, |c| c.page)
    }

    pub fn is_last_page(&self) -> bool {
        self.active_cursor().is_some_and(|c| c.exhausted)
    }

    pub fn phase(&self) -> Phase {
        let Some(cursor) = self.active_cursor() else {
            // Local filtering of a loaded snapshot.
            return match (&self.search, self.loading) {
                (Some(_), _) => Phase::Loaded,
                (None, true) => Phase::Loading,
                (None, false) => Phase::Idle,
            };
        };
        match (self.loading, cursor.page) {
            (true, 0) => Phase::Loading,
            (true, _) => Phase::LoadingMore,
            (false, 0) => Phase::Idle,
            (false, _) if cursor.exhausted => Phase::Exhausted,
            (false, _) => Phase::Loaded,
        }
    }

    fn active_cursor(&self) -> Option<&Cursor> {
        match &self.search {
            Some(search) => search.remote.as_ref(),
            None => self.browse.as_ref(),
        }
    }

    fn issue(&mut self, request: FetchRequest, page: u64) -> FetchTicket {
        self.seq += 1;
        self.loading = true;
        FetchTicket {
            seq: self.seq,
            page,
            size: self.page_size,
            request,
        }
    }

    fn refuse(&self, err: ApiError) -> ApiError {
        match &err {
            ApiError::NotPermitted => self.notifier.error(FORBIDDEN),
            ApiError::MissingHouseNumber => self.notifier.error(MISSING_HOUSE_NUMBER),
            _ => {}
        }
        err
    }

    /// The house number a resident fetch is scoped to, `None` for admins.
    fn scope(&self, session: &Session) -> ClientResult<Option<String>> {
        if session.is_admin() {
            return Ok(None);
        }
        if self.source.admin_only() {
            return Err(self.refuse(ApiError::NotPermitted));
        }
        match session.house_number() {
            Some(house) => Ok(Some(house.to_string())),
            None => Err(self.refuse(ApiError::MissingHouseNumber)),
        }
    }

    /// Back to page one of the unfiltered list. Clears any search.
    pub fn refresh(&mut self, session: &Session) -> ClientResult<FetchTicket> {
        let request = match self.scope(session)? {
            Some(house_number) => FetchRequest::Mine { house_number },
            None => FetchRequest::All,
        };

        self.search = None;
        self.records.clear();
        self.snapshot = None;
        self.browse = Some(Cursor::new(request.clone()));
        Ok(self.issue(request, 1))
    }

    /// Next page, if the user has scrolled to `last_visible` and there is one.
    pub fn load_more(&mut self, last_visible: usize) -> Option<FetchTicket> {
        if self.loading || self.records.is_empty() || last_visible + 1 < self.records.len() {
            return None;
        }

        let cursor = self.active_cursor()?;
        if cursor.page == 0 || cursor.exhausted {
            return None;
        }

        let request = cursor.request.clone();
        let page = cursor.page + 1;
        Some(self.issue(request, page))
    }

    /// Reacts to the search box. Empty text goes back to the snapshot.
    pub fn set_search(&mut self, session: &Session, text: &str) -> ClientResult<Option<FetchTicket>> {
        let keyword = text.trim();

        if keyword.is_empty() {
            if self.search.take().is_none() {
                return Ok(None);
            }
            // Drop whatever search was still in flight.
            self.seq += 1;
            self.loading = false;
            return match &self.snapshot {
                Some(snapshot) => {
                    self.records = snapshot.clone();
                    Ok(None)
                }
                None => self.refresh(session).map(Some),
            };
        }

        let scope = self.scope(session)?;

        if !self.source.remote_search() {
            let base = self.snapshot.as_deref().unwrap_or(&self.records);
            self.records = base.iter().filter(|r| r.matches(keyword)).cloned().collect();
            self.search = Some(Search {
                keyword: keyword.to_string(),
                remote: None,
            });
            return Ok(None);
        }

        let request = match scope {
            Some(house_number) => FetchRequest::SearchMine {
                house_number,
                keyword: keyword.to_string(),
            },
            None => FetchRequest::SearchAll {
                keyword: keyword.to_string(),
            },
        };
        self.search = Some(Search {
            keyword: keyword.to_string(),
            remote: Some(Cursor::new(request.clone())),
        });
        Ok(Some(self.issue(request, 1)))
    }

    /// Applies a finished fetch. Returns `false` when the result was stale.
    pub fn apply(&mut self, ticket: &FetchTicket, result: ClientResult<Page<S::Record>>) -> bool {
        if ticket.seq != self.seq {
            tracing::debug!(
                "Discarding stale page {} (seq {} != {})",
                ticket.page,
                ticket.seq,
                self.seq
            );
            return false;
        }
        self.loading = false;

        let page = match result {
            Ok(page) => page,
            Err(err) => {
                tracing::warn!("Fetching page {} failed: {err}", ticket.page);
                self.notifier.report(&err);
                return true;
            }
        };

        let exhausted = ticket.page >= page.total_pages;
        let cursor = if ticket.request.is_search() {
            self.search.as_mut().and_then(|s| s.remote.as_mut())
        } else {
            self.browse.as_mut()
        };
        let Some(cursor) = cursor else {
            tracing::debug!("No cursor for {:?}", ticket.request);
            return false;
        };
        cursor.page = ticket.page;
        cursor.exhausted = exhausted;

        if ticket.request.is_search() {
            if ticket.page == 1 {
                self.records = page.records;
            } else {
                self.records.extend(page.records);
            }
            return true;
        }

        let mut snapshot = if ticket.page == 1 {
            Vec::new()
        } else {
            self.snapshot.take().unwrap_or_default()
        };
        snapshot.extend(page.records);
        self.records = match &self.search {
            Some(search) => snapshot
                .iter()
                .filter(|r| r.matches(&search.keyword))
                .cloned()
                .collect(),
            None => snapshot.clone(),
        };
        self.snapshot = Some(snapshot);
        true
    }

    async fn run(&mut self, session: &Session, ticket: FetchTicket) -> bool {
        let result = ticket.run(self.source.as_ref(), session).await;
        self.apply(&ticket, result)
    }

    /// `refresh` and wait for the first page.
    pub async fn reload(&mut self, session: &Session) -> ClientResult<()> {
        let ticket = self.refresh(session)?;
        self.run(session, ticket).await;
        Ok(())
    }

    /// `load_more` and wait. Returns `false` when nothing was fetched.
    pub async fn more(&mut self, session: &Session, last_visible: usize) -> bool {
        match self.load_more(last_visible) {
            Some(ticket) => self.run(session, ticket).await,
            None => false,
        }
    }

    pub async fn search(&mut self, session: &Session, text: &str) -> ClientResult<()> {
        if let Some(ticket) = self.set_search(session, text)? {
            self.run(session, ticket).await;
        }
        Ok(())
    }

    /// Runs a mutation and reloads from page one when it succeeds.
    pub async fn mutate<F>(&mut self, session: &Session, success: &str, op: F) -> ClientResult<()>
    where
        F: Future<Output = ClientResult<()>>,
    {
        match op.await {
            Ok(()) => {
                self.notifier.info(success);
                self.reload(session).await
            }
            Err(err) => {
                self.notifier.report(&err);
                Err(err)
            }
        }
    }

    /// Like [`Self::mutate`] but hands back the refresh ticket instead of running it.
    pub fn after_mutation(
        &mut self,
        session: &Session,
        success: &str,
        result: ClientResult<()>,
    ) -> ClientResult<FetchTicket> {
        match result {
            Ok(()) => {
                self.notifier.info(success);
                self.refresh(session)
            }
            Err(err) => {
                self.notifier.report(&err);
                Err(err)
            }
        }
    }
}
