use estate_client::session::SessionStore;
use estate_client::settings::Settings;
use estate_client::shell::Shell;
use eyre::Result;

use crate::VERSION;

pub fn run(settings: &Settings) -> Result<()> {
    let env_config_dir = std::env::var("ESTATE_CONFIG_DIR");

    let vars = format!(
        "VARS:\nESTATE_CONFIG_DIR = {:?}",
        env_config_dir.unwrap_or("None".into())
    );
    println!("{vars}\n");

    let mut paths = String::from("PATHS:\n");
    paths.push_str(&format!("config_path: {:?}\n", Settings::config_path()));
    paths.push_str(&format!("session_path: {:?}\n", settings.session_path));
    paths.push_str(&format!("log_path: {:?}", settings.log_path));
    println!("{paths}\n");

    println!("SERVER:");
    println!("Address: {}", settings.server_address);
    println!("Page size: {}", settings.page_size);
    println!("Timeout: {}s\n", settings.timeout_secs);

    let store = SessionStore::new(&settings.session_path);
    println!("ACCOUNT:");
    if store.is_logged_in() {
        let profile = Shell::mount(store).profile();
        println!("Username: {}", profile.username);
        println!("Name: {}", profile.display_name);
        println!("Role: {}", profile.role);
        println!("House: {}", profile.house_number);
        println!("Logged in: {}", profile.login_time);
        println!("Expires: {}", profile.expires_at);
        if profile.expiry_warning {
            println!("Your session expires soon, log in again to renew it.");
        }
    } else {
        println!("Auth: Unauthenticated");
    }

    println!();
    println!("Version: {VERSION}");
    Ok(())
}
