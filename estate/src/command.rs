use clap::Subcommand;
use estate_client::events::{AppEvent, EventReceiver, NoticeLevel};
use estate_client::settings::Settings;
use eyre::{Context, Result};
use std::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod account;
mod app;
mod info;
mod list;
mod rows;

#[derive(Subcommand)]
pub enum EstateCmd {
    /// Log in, register or log out
    #[command(subcommand)]
    Account(account::Cmd),

    /// Show paths, settings and the current login
    Info,

    /// Print the records of one resource
    List(list::Cmd),

    /// Open the interactive application
    App,
}

impl EstateCmd {
    #[tokio::main]
    pub async fn run(self) -> Result<()> {
        let settings = Settings::new()?;
        init_logging(&settings, matches!(self, Self::App))?;

        match self {
            Self::Account(cmd) => cmd.run(&settings).await,
            Self::Info => info::run(&settings),
            Self::List(cmd) => cmd.run(&settings).await,
            Self::App => app::run(&settings).await,
        }
    }
}

/// Stderr for one-shot commands. The full screen app logs to a file instead.
fn init_logging(settings: &Settings, to_file: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    if to_file {
        let file = fs_err::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&settings.log_path)
            .wrap_err("Failed to open log file")?;
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init();
    }

    Ok(())
}

/// Prints whatever the client wanted the user to see.
pub(crate) fn print_notices(events: &mut EventReceiver) {
    while let Ok(event) = events.try_recv() {
        if let AppEvent::Notice(notice) = event {
            match notice.level {
                NoticeLevel::Info => println!("{}", notice.message),
                NoticeLevel::Error => eprintln!("{}", notice.message),
            }
        }
    }
}
