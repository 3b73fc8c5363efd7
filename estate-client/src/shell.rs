use crate::api_client::ApiClient;
use crate::error::{ClientResult, FORBIDDEN};
use crate::events::{AppEvent, Notice, Notifier};
use crate::session::SessionStore;
use estate_common::domain::Role;
use std::str::FromStr;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

const TIME_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Fees,
    Repairs,
    Complaints,
    Parking,
    Buildings,
    Houses,
    Users,
    Registrations,
}

impl Resource {
    pub const ALL: [Resource; 8] = [
        Resource::Fees,
        Resource::Repairs,
        Resource::Complaints,
        Resource::Parking,
        Resource::Buildings,
        Resource::Houses,
        Resource::Users,
        Resource::Registrations,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Fees => "fees",
            Resource::Repairs => "repairs",
            Resource::Complaints => "complaints",
            Resource::Parking => "parking",
            Resource::Buildings => "buildings",
            Resource::Houses => "houses",
            Resource::Users => "users",
            Resource::Registrations => "registrations",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Resource::Fees => "Fees",
            Resource::Repairs => "Repairs",
            Resource::Complaints => "Complaints",
            Resource::Parking => "Parking",
            Resource::Buildings => "Buildings",
            Resource::Houses => "Houses",
            Resource::Users => "Users",
            Resource::Registrations => "Registrations",
        }
    }

    pub fn admin_only(&self) -> bool {
        matches!(
            self,
            Resource::Buildings | Resource::Houses | Resource::Users | Resource::Registrations
        )
    }
}

impl FromStr for Resource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        Resource::ALL
            .into_iter()
            .find(|r| r.as_str() == s || r.as_str().trim_end_matches('s') == s)
            .ok_or_else(|| format!("Unknown resource {s}"))
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Home,
    Profile,
    Settings,
    About,
    Resource(Resource),
}

impl Route {
    fn needs_login(&self) -> bool {
        !matches!(self, Route::Login | Route::Register)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub target: Route,
}

const fn item(
    title: &'static str,
    description: &'static str,
    icon: &'static str,
    target: Route,
) -> MenuItem {
    MenuItem {
        title,
        description,
        icon,
        target,
    }
}

/// Home screen entries for `role`.
pub fn function_items(role: Role) -> Vec<MenuItem> {
    let mut items = vec![
        item(
            "Buildings",
            "Buildings and houses of the estate",
            "▦",
            Route::Resource(Resource::Buildings),
        ),
        item(
            "Fees",
            "Management fees and payments",
            "¤",
            Route::Resource(Resource::Fees),
        ),
        item(
            "Parking",
            "Parking spaces and assignments",
            "P",
            Route::Resource(Resource::Parking),
        ),
        item(
            "Repairs",
            "Repair requests and their progress",
            "⚒",
            Route::Resource(Resource::Repairs),
        ),
        item(
            "Complaints",
            "Complaints and follow-ups",
            "!",
            Route::Resource(Resource::Complaints),
        ),
    ];
    if role == Role::Admin {
        items.push(item(
            "User management",
            "Accounts and registration approval",
            "☺",
            Route::Resource(Resource::Users),
        ));
    }
    items
}

/// Profile screen entries for `role`.
pub fn profile_items(role: Role) -> Vec<MenuItem> {
    let mut items = Vec::new();
    if role == Role::Admin {
        items.push(item(
            "User management",
            "Accounts and registration approval",
            "☺",
            Route::Resource(Resource::Users),
        ));
        items.push(item(
            "Buildings",
            "Buildings of the estate",
            "▦",
            Route::Resource(Resource::Buildings),
        ));
        items.push(item(
            "Houses",
            "Houses and their residents",
            "⌂",
            Route::Resource(Resource::Houses),
        ));
    }
    items.push(item("Settings", "Client configuration", "⚙", Route::Settings));
    items.push(item("About", "Version information", "i", Route::About));
    items
}

/// Text for the pending registration badge. Nothing for zero.
pub fn badge_text(count: u64) -> Option<String> {
    match count {
        0 => None,
        1..=99 => Some(count.to_string()),
        _ => Some("99+".into()),
    }
}

/// Badge count for home and profile. Residents have none and make no request.
pub async fn pending_registrations(api: &ApiClient) -> ClientResult<Option<u64>> {
    let session = api.session();
    if !session.is_admin() {
        return Ok(None);
    }
    api.registrations().pending_count(&session).await.map(Some)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSummary {
    pub username: String,
    pub display_name: String,
    pub role: &'static str,
    pub house_number: String,
    pub login_time: String,
    pub expires_at: String,
    pub expiry_warning: bool,
}

fn format_time(t: Option<OffsetDateTime>) -> String {
    t.and_then(|t| t.format(TIME_FORMAT).ok())
        .unwrap_or_else(|| "unknown".into())
}

/// Current screen plus everything derived from the role.
pub struct Shell {
    store: SessionStore,
    route: Route,
    history: Vec<Route>,
    notice: Option<Notice>,
    pending: Option<u64>,
}

impl Shell {
    /// Starts at home when a login survived the last run.
    pub fn mount(store: SessionStore) -> Self {
        let route = if store.is_logged_in() {
            Route::Home
        } else {
            Route::Login
        };
        tracing::debug!("Mounting shell at {route:?}");
        Self {
            store,
            route,
            history: Vec::new(),
            notice: None,
            pending: None,
        }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn role(&self) -> Role {
        self.store.current_role()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Moves to `route` unless the role does not allow it.
    pub fn navigate(&mut self, route: Route, notifier: &Notifier) -> bool {
        if route.needs_login() && !self.store.is_logged_in() {
            self.reset(Route::Login);
            return false;
        }
        if let Route::Resource(resource) = route {
            if resource.admin_only() && self.role() != Role::Admin {
                tracing::info!("Refusing {resource} for {}", self.role());
                notifier.error(FORBIDDEN);
                return false;
            }
        }
        if route != self.route {
            self.history.push(self.route);
            self.route = route;
        }
        true
    }

    /// Returns to the previous screen, or home.
    pub fn back(&mut self) -> Route {
        self.route = self.history.pop().unwrap_or(match self.route {
            Route::Register => Route::Login,
            _ if self.store.is_logged_in() => Route::Home,
            _ => Route::Login,
        });
        self.route
    }

    fn reset(&mut self, route: Route) {
        self.history.clear();
        self.pending = None;
        self.route = route;
    }

    pub fn handle(&mut self, event: AppEvent) {
        match event {
            AppEvent::Navigate(route) => {
                tracing::debug!("Forced navigation to {route:?}");
                self.reset(route);
            }
            AppEvent::Notice(notice) => self.notice = Some(notice),
        }
    }

    pub fn function_items(&self) -> Vec<MenuItem> {
        function_items(self.role())
    }

    pub fn profile_items(&self) -> Vec<MenuItem> {
        profile_items(self.role())
    }

    pub fn badge(&self) -> Option<String> {
        if self.role() != Role::Admin {
            return None;
        }
        self.pending.and_then(badge_text)
    }

    /// Applies a finished [`pending_registrations`] call. Failures keep the old count.
    pub fn set_pending(&mut self, pending: ClientResult<Option<u64>>) {
        match pending {
            Ok(pending) => self.pending = pending,
            Err(err) => tracing::warn!("Failed to load pending registrations: {err}"),
        }
    }

    pub fn profile(&self) -> ProfileSummary {
        let session = self.store.context();
        ProfileSummary {
            username: session.username.clone().unwrap_or_default(),
            display_name: session.display_name.clone().unwrap_or_default(),
            role: session.role.label(),
            house_number: session.house_number.clone().unwrap_or_else(|| "none".into()),
            login_time: format_time(self.store.login_time()),
            expires_at: format_time(self.store.expires_at()),
            expiry_warning: self.store.expiry_warning(),
        }
    }
}
