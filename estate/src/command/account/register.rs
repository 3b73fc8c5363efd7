use crate::command::print_notices;
use clap::Parser;
use estate_client::api_client::ApiClient;
use estate_client::auth;
use estate_client::events;
use estate_client::forms::{Form, RegisterForm};
use estate_client::settings::Settings;
use estate_client::utils::{read_input, read_input_hidden};
use eyre::{Context, Result};

#[derive(Parser, Debug)]
pub struct Cmd {
    #[arg(short, long)]
    username: Option<String>,
    #[arg(short, long)]
    password: Option<String>,
    #[arg(short, long)]
    name: Option<String>,
    #[arg(long)]
    house_number: Option<String>,
    #[arg(long)]
    phone: Option<String>,
}

impl Cmd {
    pub async fn run(self, settings: &Settings) -> Result<()> {
        let (notifier, mut events) = events::channel();
        let api = ApiClient::from_settings(settings, notifier);

        let username = self.username.unwrap_or_else(|| read_input("username"));
        let (password, confirm) = match self.password {
            Some(password) => (password.clone(), password),
            None => (
                read_input_hidden("password"),
                read_input_hidden("confirm password"),
            ),
        };
        let name = self.name.unwrap_or_else(|| read_input("name"));
        let house_number = self
            .house_number
            .unwrap_or_else(|| read_input("house number"));
        let phone = self
            .phone
            .unwrap_or_else(|| read_input("phone [optional]"));

        let mut form = RegisterForm::new();
        let state = form.state_mut();
        state.set("username", username);
        state.set("password", password);
        state.set("confirm", confirm);
        state.set("name", name);
        state.set("house_number", house_number);
        state.set("phone", phone);

        let res = auth::register(&api, &form).await;
        print_notices(&mut events);
        res.wrap_err("Registration failed")?;

        Ok(())
    }
}
