use clap::Subcommand;
use estate_client::settings::Settings;
use eyre::Result;

mod login;
mod logout;
mod register;

#[derive(Subcommand, Debug)]
pub enum Cmd {
    Login(login::Cmd),
    Register(register::Cmd),
    Logout,
}

impl Cmd {
    pub(crate) async fn run(self, settings: &Settings) -> Result<()> {
        match self {
            Self::Login(cmd) => cmd.run(settings).await,
            Self::Register(cmd) => cmd.run(settings).await,
            Self::Logout => logout::run(settings),
        }
    }
}
