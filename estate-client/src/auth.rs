use crate::api_client::ApiClient;
use crate::error::ClientResult;
use crate::forms::{Form, LoginForm, RegisterForm};
use crate::session::Session;
use crate::shell::Route;
use crate::transport::Request;
use estate_common::api::UserResponse;

pub const REGISTERED: &str = "Registration submitted, please wait for administrator approval";

/// Logs in and loads the profile. Nothing is kept if either step fails.
pub async fn login(api: &ApiClient, form: &LoginForm) -> ClientResult<Session> {
    let req = form.checked(api.notifier())?;
    let anonymous = Session::default();

    let token: String = api
        .fetch(&anonymous, Request::post("/api/user/login").json(&req)?)
        .await
        .inspect_err(|err| api.notifier().report(err))?;
    api.store().save_token(&token)?;

    let session = api.session();
    let user: UserResponse = match api.fetch(&session, Request::get("/api/user/info")).await {
        Ok(user) => user,
        Err(err) => {
            tracing::warn!("Logged in but could not load profile: {err}");
            api.store().clear_all()?;
            api.notifier().report(&err);
            return Err(err);
        }
    };

    api.store().save_session(
        &user.username,
        user.role,
        user.house_number.as_deref(),
        user.id,
        &user.name,
    )?;
    api.session_started();
    tracing::info!("Logged in as {} ({})", user.username, user.role);
    api.notifier().info(format!("Welcome, {}", user.name));

    Ok(api.session())
}

pub async fn register(api: &ApiClient, form: &RegisterForm) -> ClientResult<()> {
    let req = form.checked(api.notifier())?;
    let anonymous = Session::default();

    api.execute(&anonymous, Request::post("/api/user/register").json(&req)?)
        .await
        .inspect_err(|err| api.notifier().report(err))?;
    api.notifier().info(REGISTERED);
    Ok(())
}

/// Hard logout. Everything about the user is forgotten.
pub fn logout(api: &ApiClient) -> ClientResult<()> {
    api.store().clear_all()?;
    api.notifier().navigate(Route::Login);
    api.notifier().info("Logged out");
    Ok(())
}
