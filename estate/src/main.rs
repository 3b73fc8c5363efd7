use clap::Parser;
use estate::command::EstateCmd;
use estate::VERSION;
use eyre::Result;

#[derive(Parser)]
#[command(
    author = "Sam Uherek",
    version = VERSION,
    about = "Terminal client for the estate property management service",
    )]
struct Estate {
    #[command(subcommand)]
    estate: EstateCmd,
}

impl Estate {
    fn run(self) -> Result<()> {
        self.estate.run()
    }
}

fn main() -> Result<()> {
    Estate::parse().run()
}
