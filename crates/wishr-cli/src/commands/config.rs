use clap::Subcommand;
use wishr_core::config::WishrConfig;
use wishr_core::store::Store;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Initialize ~/.wishr/ with a default config and an empty wishlist
    Init,
    /// Show current configuration
    Show,
}

pub fn run(action: ConfigAction) -> anyhow::Result<()> {
    match action {
        ConfigAction::Init => {
            let home = WishrConfig::init()?;
            let config = WishrConfig::load()?;
            let data_path = config.resolved_data_path()?;

            let store = wishr_db::open_store(&config)?;
            if !data_path.exists() {
                store.save(&[])?;
            }

            println!("Initialized wishr at {}", home.display());
            println!("  config:   {}", WishrConfig::config_path()?.display());
            println!("  wishlist: {} ({})", data_path.display(), config.backend);
            Ok(())
        }
        ConfigAction::Show => {
            let config = WishrConfig::load()?;
            let toml_str = toml::to_string_pretty(&config)?;
            println!("{toml_str}");
            println!("# wishlist: {}", config.resolved_data_path()?.display());
            Ok(())
        }
    }
}
