use crate::error::{ApiError, ClientResult, FORBIDDEN, GENERIC_FAILURE, SESSION_EXPIRED};
use crate::events::Notifier;
use crate::gateway::{Record, ResourceApi};
use crate::session::{Session, SessionStore};
use crate::settings::Settings;
use crate::shell::Route;
use crate::transport::{Reply, Request, Transport};
use estate_common::api::{
    ApiResult, BuildingResponse, ComplaintResponse, FeeResponse, HouseResponse, ParkingResponse,
    RegistrationResponse, RepairResponse, UserResponse,
};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Runs gateway calls and owns every session side effect of the wire.
///
/// Token renewal, forced logout on 401 and the 403 notice all happen here and
/// nowhere else.
#[derive(Debug, Clone)]
pub struct ApiClient {
    address: String,
    timeout: Duration,
    store: SessionStore,
    notifier: Notifier,
    expiry_reported: Arc<AtomicBool>,
}

impl ApiClient {
    pub fn new(address: &str, timeout: Duration, store: SessionStore, notifier: Notifier) -> Self {
        Self {
            address: address.trim_end_matches('/').to_string(),
            timeout,
            store,
            notifier,
            expiry_reported: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn from_settings(settings: &Settings, notifier: Notifier) -> Self {
        Self::new(
            &settings.server_address,
            settings.timeout(),
            SessionStore::new(&settings.session_path),
            notifier,
        )
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Fresh identity read from disk.
    pub fn session(&self) -> Session {
        self.store.context()
    }

    /// Re-arms the one-shot "session expired" notice after a new login.
    pub fn session_started(&self) {
        self.expiry_reported.store(false, Ordering::SeqCst);
    }

    /// Runs a call whose envelope must carry data.
    pub async fn fetch<T: DeserializeOwned>(&self, session: &Session, req: Request) -> ClientResult<T> {
        let path = req.path.clone();
        self.call::<T>(session, req)
            .await?
            .ok_or_else(|| ApiError::Decode(format!("{path} returned no data")))
    }

    /// Runs a call where only success matters.
    pub async fn execute(&self, session: &Session, req: Request) -> ClientResult<()> {
        self.call::<serde_json::Value>(session, req).await.map(|_| ())
    }

    pub async fn call<T: DeserializeOwned>(
        &self,
        session: &Session,
        req: Request,
    ) -> ClientResult<Option<T>> {
        let transport = Transport::new(&self.address, session.token.as_deref(), self.timeout)?;
        let reply = transport.send(req).await?;
        self.handle_reply(reply)
    }

    fn handle_reply<T: DeserializeOwned>(&self, reply: Reply) -> ClientResult<Option<T>> {
        if reply.status == StatusCode::UNAUTHORIZED {
            self.expire_session();
            return Err(ApiError::Unauthorized);
        }

        if let Some(token) = &reply.renewed_token {
            if let Err(err) = self.store.save_token(token) {
                tracing::warn!("Failed to store renewed token: {err}");
            }
        }

        if reply.status == StatusCode::FORBIDDEN {
            tracing::info!("Request forbidden");
            self.notifier.error(FORBIDDEN);
            return Err(ApiError::Forbidden);
        }

        let envelope = serde_json::from_slice::<ApiResult<T>>(&reply.body);
        if !reply.status.is_success() {
            let msg = envelope
                .ok()
                .and_then(|e| e.msg)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| GENERIC_FAILURE.to_string());
            tracing::debug!("HTTP {} with message {msg}", reply.status);
            return Err(ApiError::Logical(msg));
        }

        let envelope = envelope.map_err(|e| ApiError::Decode(e.to_string()))?;
        if !envelope.is_success() {
            let msg = envelope
                .msg
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| GENERIC_FAILURE.to_string());
            return Err(ApiError::Logical(msg));
        }

        Ok(envelope.data)
    }

    fn expire_session(&self) {
        tracing::info!("Backend rejected the session, logging out");
        if let Err(err) = self.store.clear_all() {
            tracing::warn!("Failed to clear session: {err}");
        }
        self.notifier.navigate(Route::Login);
        if !self.expiry_reported.swap(true, Ordering::SeqCst) {
            self.notifier.error(SESSION_EXPIRED);
        }
    }

    pub fn resource<R: Record>(&self) -> ResourceApi<R> {
        ResourceApi::new(self.clone())
    }

    pub fn fees(&self) -> ResourceApi<FeeResponse> {
        self.resource()
    }

    pub fn repairs(&self) -> ResourceApi<RepairResponse> {
        self.resource()
    }

    pub fn complaints(&self) -> ResourceApi<ComplaintResponse> {
        self.resource()
    }

    pub fn parking(&self) -> ResourceApi<ParkingResponse> {
        self.resource()
    }

    pub fn buildings(&self) -> ResourceApi<BuildingResponse> {
        self.resource()
    }

    pub fn houses(&self) -> ResourceApi<HouseResponse> {
        self.resource()
    }

    pub fn users(&self) -> ResourceApi<UserResponse> {
        self.resource()
    }

    pub fn registrations(&self) -> ResourceApi<RegistrationResponse> {
        self.resource()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{channel, AppEvent, EventReceiver, Notice, NoticeLevel};
    use tempfile::TempDir;

    fn client() -> (TempDir, ApiClient, EventReceiver) {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        let (notifier, rx) = channel();
        let client = ApiClient::new("http://127.0.0.1:1", Duration::from_secs(1), store, notifier);
        (dir, client, rx)
    }

    fn reply(status: u16, body: &str, renewed: Option<&str>) -> Reply {
        Reply {
            status: StatusCode::from_u16(status).unwrap(),
            body: body.as_bytes().to_vec(),
            renewed_token: renewed.map(String::from),
        }
    }

    fn drain(rx: &mut EventReceiver) -> Vec<AppEvent> {
        let mut events = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            events.push(ev);
        }
        events
    }

    #[test]
    fn unauthorized_wins_over_success_envelope() {
        let (_dir, client, mut rx) = client();
        client.store().save_token("old").unwrap();

        let res = client.handle_reply::<String>(reply(401, r#"{"code":200,"data":"x"}"#, None));

        assert_eq!(res, Err(ApiError::Unauthorized));
        assert_eq!(client.store().token(), None);
        let events = drain(&mut rx);
        assert_eq!(
            events,
            vec![
                AppEvent::Navigate(Route::Login),
                AppEvent::Notice(Notice {
                    level: NoticeLevel::Error,
                    message: SESSION_EXPIRED.into()
                }),
            ]
        );
    }

    #[test]
    fn expiry_notice_fires_once_until_new_session() {
        let (_dir, client, mut rx) = client();

        let _ = client.handle_reply::<String>(reply(401, "", None));
        let _ = client.handle_reply::<String>(reply(401, "", None));
        let notices = drain(&mut rx)
            .into_iter()
            .filter(|e| matches!(e, AppEvent::Notice(_)))
            .count();
        assert_eq!(notices, 1);

        client.session_started();
        let _ = client.handle_reply::<String>(reply(401, "", None));
        let notices = drain(&mut rx)
            .into_iter()
            .filter(|e| matches!(e, AppEvent::Notice(_)))
            .count();
        assert_eq!(notices, 1);
    }

    #[test]
    fn renewed_token_is_stored() {
        let (_dir, client, _rx) = client();
        client.store().save_token("old").unwrap();

        let res = client.handle_reply::<String>(reply(200, r#"{"code":200,"data":"ok"}"#, Some("new")));

        assert_eq!(res, Ok(Some("ok".to_string())));
        assert_eq!(client.store().token().as_deref(), Some("new"));
    }

    #[test]
    fn forbidden_keeps_session() {
        let (_dir, client, mut rx) = client();
        client.store().save_token("token").unwrap();

        let res = client.handle_reply::<String>(reply(403, "", None));

        assert_eq!(res, Err(ApiError::Forbidden));
        assert_eq!(client.store().token().as_deref(), Some("token"));
        assert_eq!(
            drain(&mut rx),
            vec![AppEvent::Notice(Notice {
                level: NoticeLevel::Error,
                message: FORBIDDEN.into()
            })]
        );
    }

    #[test]
    fn logical_failure_uses_message_or_fallback() {
        let (_dir, client, _rx) = client();

        let res = client.handle_reply::<String>(reply(200, r#"{"code":500,"msg":"Duplicate"}"#, None));
        assert_eq!(res, Err(ApiError::Logical("Duplicate".into())));

        let res = client.handle_reply::<String>(reply(200, r#"{"code":500}"#, None));
        assert_eq!(res, Err(ApiError::Logical(GENERIC_FAILURE.into())));

        let res = client.handle_reply::<String>(reply(500, "oops", None));
        assert_eq!(res, Err(ApiError::Logical(GENERIC_FAILURE.into())));
    }

    #[test]
    fn garbage_body_is_a_decode_error() {
        let (_dir, client, _rx) = client();

        let res = client.handle_reply::<String>(reply(200, "<html>", None));
        assert!(matches!(res, Err(ApiError::Decode(_))));
    }
}
