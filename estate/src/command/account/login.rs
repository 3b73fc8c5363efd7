use crate::command::print_notices;
use clap::Parser;
use estate_client::api_client::ApiClient;
use estate_client::auth;
use estate_client::events;
use estate_client::forms::{Form, LoginForm};
use estate_client::settings::Settings;
use estate_client::utils::{read_input, read_input_hidden};
use eyre::{Context, Result};

#[derive(Parser, Debug)]
pub struct Cmd {
    #[arg(long, short)]
    pub username: Option<String>,
    #[arg(long, short)]
    pub password: Option<String>,
}

impl Cmd {
    pub async fn run(self, settings: &Settings) -> Result<()> {
        let (notifier, mut events) = events::channel();
        let api = ApiClient::from_settings(settings, notifier);

        if api.store().is_logged_in() {
            println!("You are already logged in.");
            return Ok(());
        }

        let remembered = api.store().current_username();
        let username = self.username.or(remembered).unwrap_or_else(|| read_input("username"));
        let password = self
            .password
            .unwrap_or_else(|| read_input_hidden("password"));

        let mut form = LoginForm::new();
        form.state_mut().set("username", username);
        form.state_mut().set("password", password);

        let res = auth::login(&api, &form).await;
        print_notices(&mut events);
        let session = res.wrap_err("Login failed")?;

        println!(
            "Logged in as {} ({})",
            session.username.unwrap_or_default(),
            session.role.label()
        );
        Ok(())
    }
}
