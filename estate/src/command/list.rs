use super::print_notices;
use super::rows::Row;
use clap::Parser;
use estate_client::api_client::ApiClient;
use estate_client::controller::ListController;
use estate_client::events::{self, EventReceiver};
use estate_client::gateway::ListSource;
use estate_client::settings::Settings;
use estate_client::shell::Resource;
use eyre::{bail, Context, Result};

#[derive(Parser, Debug)]
pub struct Cmd {
    /// fees, repairs, complaints, parking, buildings, houses, users or registrations
    resource: Resource,

    #[arg(short, long)]
    search: Option<String>,

    /// Keep fetching until the last page
    #[arg(short, long)]
    all_pages: bool,

    /// Only the houses of this building
    #[arg(long)]
    building: Option<u64>,
}

impl Cmd {
    pub(crate) async fn run(self, settings: &Settings) -> Result<()> {
        let (notifier, mut events) = events::channel();
        let api = ApiClient::from_settings(settings, notifier.clone());

        if !api.store().is_logged_in() {
            bail!("You are not logged in, run `estate account login` first");
        }

        let size = u64::from(settings.page_size);
        match (self.resource, self.building) {
            (Resource::Houses, Some(building)) => {
                let source = api.houses().in_building(building);
                self.print(&api, ListController::new(source, size, notifier), &mut events)
                    .await
            }
            (Resource::Fees, _) => self.show(&api, api.fees(), size, &mut events).await,
            (Resource::Repairs, _) => self.show(&api, api.repairs(), size, &mut events).await,
            (Resource::Complaints, _) => {
                self.show(&api, api.complaints(), size, &mut events).await
            }
            (Resource::Parking, _) => self.show(&api, api.parking(), size, &mut events).await,
            (Resource::Buildings, _) => self.show(&api, api.buildings(), size, &mut events).await,
            (Resource::Houses, None) => self.show(&api, api.houses(), size, &mut events).await,
            (Resource::Users, _) => self.show(&api, api.users(), size, &mut events).await,
            (Resource::Registrations, _) => {
                self.show(&api, api.registrations(), size, &mut events).await
            }
        }
    }

    async fn show<S>(
        &self,
        api: &ApiClient,
        source: S,
        size: u64,
        events: &mut EventReceiver,
    ) -> Result<()>
    where
        S: ListSource,
        S::Record: Row,
    {
        let controller = ListController::new(source, size, api.notifier().clone());
        self.print(api, controller, events).await
    }

    async fn print<S>(
        &self,
        api: &ApiClient,
        mut controller: ListController<S>,
        events: &mut EventReceiver,
    ) -> Result<()>
    where
        S: ListSource,
        S::Record: Row,
    {
        let session = api.session();

        let loaded = controller.reload(&session).await;
        print_notices(events);
        loaded.wrap_err_with(|| format!("Failed to list {}", self.resource))?;

        if let Some(keyword) = &self.search {
            let searched = controller.search(&session, keyword).await;
            print_notices(events);
            searched.wrap_err("Search failed")?;
        }

        if self.all_pages {
            loop {
                let before = controller.current_page();
                let last = controller.records().len().saturating_sub(1);
                if !controller.more(&session, last).await || controller.current_page() == before {
                    break;
                }
            }
            print_notices(events);
        }

        println!("{}", <S::Record as Row>::HEADERS.join("\t"));
        for record in controller.records() {
            println!("{}", record.line());
        }

        if controller.records().is_empty() {
            println!("No {} found", self.resource);
        } else if controller.current_page() > 0 && !controller.is_last_page() {
            println!("-- more available, pass --all-pages to fetch everything --");
        }

        Ok(())
    }
}
