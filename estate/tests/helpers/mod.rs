#![allow(dead_code)]

use estate_client::api_client::ApiClient;
use estate_client::events::{self, AppEvent, EventReceiver, NoticeLevel};
use estate_client::session::SessionStore;
use estate_client::settings::Settings;
use estate_common::api::{ApiResult, FeeResponse, PageResponse, RegistrationResponse};
use estate_common::domain::{FeeStatus, RegistrationStatus, Role};
use eyre::{eyre, Result};
use fake::faker::name::en::Name;
use fake::Fake;
use serde::Serialize;
use tempfile::TempDir;
use wiremock::{MockServer, ResponseTemplate};

pub const TOKEN: &str = "token-1";

/// A client wired to a mock backend, with its session file in a temp dir.
pub struct TestApp {
    pub server: MockServer,
    pub settings: Settings,
    pub api: ApiClient,
    pub events: EventReceiver,
    _dir: TempDir,
}

impl TestApp {
    pub async fn build() -> Result<Self> {
        let server = MockServer::start().await;
        let dir = TempDir::new()?;
        let session_path = dir.path().join("session.json");
        let log_path = dir.path().join("estate.log");

        let settings: Settings = Settings::build_default()?
            .set_default("server_address", server.uri())?
            .set_default("session_path", session_path.to_str())?
            .set_default("log_path", log_path.to_str())?
            .set_default("timeout_secs", 5)?
            .build()?
            .try_deserialize()
            .map_err(|e| eyre!("Failed to deserialize {e}"))?;

        let (notifier, events) = events::channel();
        let api = ApiClient::from_settings(&settings, notifier);

        Ok(Self {
            server,
            settings,
            api,
            events,
            _dir: dir,
        })
    }

    pub fn store(&self) -> &SessionStore {
        self.api.store()
    }

    pub fn login_as(&self, role: Role, house_number: Option<&str>) {
        self.store()
            .save_session("li", role, house_number, 7, "Li Lei")
            .unwrap();
        self.store().save_token(TOKEN).unwrap();
        self.api.session_started();
    }

    pub fn drain(&mut self) -> Vec<AppEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }

    /// Messages of the notices sent so far, errors and infos alike.
    pub fn notices(&mut self) -> Vec<String> {
        self.drain()
            .into_iter()
            .filter_map(|e| match e {
                AppEvent::Notice(n) => Some(n.message),
                AppEvent::Navigate(_) => None,
            })
            .collect()
    }

    pub fn errors(&mut self) -> Vec<String> {
        self.drain()
            .into_iter()
            .filter_map(|e| match e {
                AppEvent::Notice(n) if n.level == NoticeLevel::Error => Some(n.message),
                _ => None,
            })
            .collect()
    }
}

pub fn ok<T: Serialize>(data: T) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(ApiResult::ok(data))
}

pub fn fail(code: i32, msg: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(ApiResult::<()>::fail(code, msg))
}

pub fn page<T>(records: Vec<T>, current: u64, pages: u64, size: u64, total: u64) -> PageResponse<T> {
    PageResponse {
        records,
        total,
        size,
        current,
        pages,
    }
}

pub fn fee(id: u64, house_number: &str) -> FeeResponse {
    FeeResponse {
        id,
        house_number: house_number.into(),
        resident_name: Name().fake(),
        amount: 100.0 + id as f64,
        month: format!("2024-{:02}", id % 12 + 1),
        status: FeeStatus::Unpaid,
        payment_date: None,
    }
}

pub fn registration(id: u64) -> RegistrationResponse {
    RegistrationResponse {
        id,
        username: format!("user{id}"),
        house_number: format!("B{}", 200 + id),
        status: RegistrationStatus::Pending,
        submit_time: "2024-05-01 10:00:00".into(),
    }
}
