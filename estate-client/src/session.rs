use estate_common::domain::Role;
use estate_common::utils::redact;
use eyre::{Context, Result};
use std::path::{Path, PathBuf};
use time::{Duration, OffsetDateTime};

/// How long a login is presumed valid on the client side.
pub const SESSION_TTL: Duration = Duration::days(7);
/// How early before expiry the user gets warned.
pub const EXPIRY_WARNING: Duration = Duration::hours(24);

/// The persisted profile blob.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Profile {
    pub username: Option<String>,
    pub role: Option<Role>,
    pub house_number: Option<String>,
    pub user_id: u64,
    pub display_name: Option<String>,
    pub token: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub login_time: Option<OffsetDateTime>,
    pub logged_in: bool,
}

/// Identity of the acting user, captured once and passed to every remote call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub username: Option<String>,
    pub role: Role,
    pub house_number: Option<String>,
    pub user_id: u64,
    pub display_name: Option<String>,
    pub token: Option<String>,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn house_number(&self) -> Option<&str> {
        self.house_number.as_deref()
    }
}

/// File backed key-value store for the current login.
///
/// Nothing is cached: every read goes back to disk so that a token renewed by
/// one call is seen by the next one.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Profile {
        if !self.path.exists() {
            return Profile::default();
        }

        match fs_err::read(&self.path) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|err| {
                tracing::warn!("Ignoring unreadable session file: {err}");
                Profile::default()
            }),
            Err(err) => {
                tracing::warn!("Failed to read session file: {err}");
                Profile::default()
            }
        }
    }

    fn store(&self, profile: &Profile) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs_err::create_dir_all(dir).wrap_err("Failed to create session dir")?;
        }
        let bytes = serde_json::to_vec_pretty(profile)?;
        fs_err::write(&self.path, bytes).wrap_err("Failed to write session file")?;
        Ok(())
    }

    fn update(&self, f: impl FnOnce(&mut Profile)) -> Result<()> {
        let mut profile = self.load();
        f(&mut profile);
        self.store(&profile)
    }

    pub fn save_session(
        &self,
        username: &str,
        role: Role,
        house_number: Option<&str>,
        user_id: u64,
        display_name: &str,
    ) -> Result<()> {
        self.save_session_at(
            username,
            role,
            house_number,
            user_id,
            display_name,
            OffsetDateTime::now_utc(),
        )
    }

    pub fn save_session_at(
        &self,
        username: &str,
        role: Role,
        house_number: Option<&str>,
        user_id: u64,
        display_name: &str,
        now: OffsetDateTime,
    ) -> Result<()> {
        tracing::info!("Saving session for {username} as {role}");
        self.update(|p| {
            p.username = Some(username.into());
            p.role = Some(role);
            p.house_number = house_number.filter(|h| !h.is_empty()).map(Into::into);
            p.user_id = user_id;
            p.display_name = Some(display_name.into());
            p.login_time = Some(now);
            p.logged_in = true;
        })
    }

    pub fn save_token(&self, token: &str) -> Result<()> {
        tracing::debug!("Storing token {}", redact(token));
        self.update(|p| p.token = Some(token.into()))
    }

    pub fn current_role(&self) -> Role {
        self.load().role.unwrap_or_default()
    }

    pub fn is_admin(&self) -> bool {
        self.current_role() == Role::Admin
    }

    pub fn current_house_number(&self) -> Option<String> {
        self.load().house_number.filter(|h| !h.is_empty())
    }

    pub fn current_user_id(&self) -> u64 {
        self.load().user_id
    }

    pub fn current_display_name(&self) -> Option<String> {
        self.load().display_name
    }

    pub fn current_username(&self) -> Option<String> {
        self.load().username
    }

    pub fn token(&self) -> Option<String> {
        self.load().token
    }

    pub fn login_time(&self) -> Option<OffsetDateTime> {
        self.load().login_time
    }

    pub fn is_logged_in(&self) -> bool {
        let profile = self.load();
        profile.logged_in && profile.token.is_some()
    }

    pub fn expires_at(&self) -> Option<OffsetDateTime> {
        self.login_time().map(|t| t + SESSION_TTL)
    }

    pub fn is_session_expired(&self) -> bool {
        self.is_session_expired_at(OffsetDateTime::now_utc())
    }

    /// Advisory only. The backend answering 401 is what actually ends a session.
    pub fn is_session_expired_at(&self, now: OffsetDateTime) -> bool {
        match self.login_time() {
            Some(login) => now - login > SESSION_TTL,
            None => true,
        }
    }

    pub fn expiry_warning(&self) -> bool {
        self.expiry_warning_at(OffsetDateTime::now_utc())
    }

    pub fn expiry_warning_at(&self, now: OffsetDateTime) -> bool {
        match self.expires_at() {
            Some(expires) => expires - now <= EXPIRY_WARNING,
            None => false,
        }
    }

    /// Drops the token but keeps the profile fields.
    pub fn logout(&self) -> Result<()> {
        tracing::info!("Soft logout");
        self.update(|p| {
            p.token = None;
            p.logged_in = false;
        })
    }

    pub fn clear_all(&self) -> Result<()> {
        tracing::info!("Clearing session");
        if self.path.exists() {
            fs_err::remove_file(&self.path).wrap_err("Failed to remove session file")?;
        }
        Ok(())
    }

    pub fn context(&self) -> Session {
        let profile = self.load();
        Session {
            username: profile.username,
            role: profile.role.unwrap_or_default(),
            house_number: profile.house_number.filter(|h| !h.is_empty()),
            user_id: profile.user_id,
            display_name: profile.display_name,
            token: profile.token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, SessionStore) {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        (dir, store)
    }

    #[test]
    fn empty_store_has_defaults() {
        let (_dir, store) = store();

        assert_eq!(store.current_role(), Role::Resident);
        assert!(!store.is_admin());
        assert_eq!(store.current_user_id(), 0);
        assert_eq!(store.current_house_number(), None);
        assert_eq!(store.token(), None);
        assert!(!store.is_logged_in());
        assert!(store.is_session_expired());
        assert!(!store.expiry_warning());
    }

    #[test]
    fn logged_in_needs_flag_and_token() {
        let (_dir, store) = store();

        store
            .save_session("li", Role::Resident, Some("A101"), 4, "Li Lei")
            .unwrap();
        assert!(!store.is_logged_in());

        store.save_token("abcdef123456").unwrap();
        assert!(store.is_logged_in());
        assert_eq!(store.current_house_number().as_deref(), Some("A101"));
        assert_eq!(store.current_display_name().as_deref(), Some("Li Lei"));
    }

    #[test]
    fn soft_logout_keeps_profile() {
        let (_dir, store) = store();
        store
            .save_session("admin", Role::Admin, None, 1, "Admin")
            .unwrap();
        store.save_token("token").unwrap();

        store.logout().unwrap();

        assert!(!store.is_logged_in());
        assert_eq!(store.token(), None);
        assert_eq!(store.current_username().as_deref(), Some("admin"));
        assert!(store.is_admin());
    }

    #[test]
    fn clear_all_erases_everything() {
        let (_dir, store) = store();
        store
            .save_session("admin", Role::Admin, None, 1, "Admin")
            .unwrap();
        store.save_token("token").unwrap();

        store.clear_all().unwrap();

        assert_eq!(store.load(), Profile::default());
        // Clearing twice is fine.
        store.clear_all().unwrap();
    }

    #[test]
    fn expiry_is_seven_days_from_login() {
        let (_dir, store) = store();
        let login = OffsetDateTime::now_utc() - Duration::days(3);
        store
            .save_session_at("li", Role::Resident, Some("A101"), 4, "Li", login)
            .unwrap();

        assert!(!store.is_session_expired_at(login + Duration::days(7)));
        assert!(store.is_session_expired_at(login + Duration::days(7) + Duration::seconds(1)));
        assert!(!store.expiry_warning_at(login + Duration::days(5)));
        assert!(store.expiry_warning_at(login + Duration::days(6) + Duration::hours(1)));
    }

    #[test]
    fn empty_house_number_reads_as_absent() {
        let (_dir, store) = store();
        store
            .save_session("li", Role::Resident, Some(""), 4, "Li")
            .unwrap();

        assert_eq!(store.current_house_number(), None);
        assert_eq!(store.context().house_number, None);
    }

    #[test]
    fn corrupt_file_reads_as_empty() {
        let (_dir, store) = store();
        fs_err::write(store.path(), b"not json").unwrap();

        assert_eq!(store.load(), Profile::default());
        store.save_token("fresh").unwrap();
        assert_eq!(store.token().as_deref(), Some("fresh"));
    }
}
