use crate::command::print_notices;
use estate_client::api_client::ApiClient;
use estate_client::auth;
use estate_client::events;
use estate_client::settings::Settings;
use eyre::{Context, Result};

pub fn run(settings: &Settings) -> Result<()> {
    let (notifier, mut events) = events::channel();
    let api = ApiClient::from_settings(settings, notifier);

    if !api.store().is_logged_in() {
        println!("You are not logged in.");
        return Ok(());
    }

    let res = auth::logout(&api);
    print_notices(&mut events);
    res.wrap_err("Failed to log out")
}
