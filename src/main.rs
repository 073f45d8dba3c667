use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;

use tenantctl::api::{ConfigurationService, HttpConfigService};
use tenantctl::app::App;
use tenantctl::config::Config;
use tenantctl::logging;

#[derive(Parser)]
#[command(name = "tenantctl")]
#[command(about = "Terminal admin console for multi-tenant platform settings")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Tenant slug (overrides default_tenant from config)
    #[arg(short, long)]
    tenant: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and print the tenant configuration document
    Show {
        /// Print compact JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },

    /// Load the configuration files and report problems
    Validate,

    /// Print resolved config, draft and log locations
    Paths,
}

fn resolve_tenant(cli_tenant: Option<String>, config: &Config) -> Result<String> {
    match cli_tenant.or_else(|| config.default_tenant.clone()) {
        Some(tenant) if !tenant.trim().is_empty() => Ok(tenant),
        _ => bail!("no tenant specified: pass --tenant or set default_tenant in the config"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    let is_tui_mode = cli.command.is_none();
    let _logging = logging::init_logging(&config, is_tui_mode, cli.debug)?;

    match cli.command {
        None => {
            let tenant = resolve_tenant(cli.tenant, &config)?;
            let service: Arc<dyn ConfigurationService> =
                Arc::new(HttpConfigService::from_config(&config.api)?);
            tracing::info!(%tenant, base_url = %config.api.base_url, "starting settings console");
            App::new(config, tenant, service)?.run().await
        }
        Some(Commands::Show { compact }) => {
            let tenant = resolve_tenant(cli.tenant, &config)?;
            let service = HttpConfigService::from_config(&config.api)?;
            match service.fetch(&tenant).await? {
                Some(doc) => {
                    let json = if compact {
                        serde_json::to_string(&doc)?
                    } else {
                        serde_json::to_string_pretty(&doc)?
                    };
                    println!("{json}");
                }
                None => println!("tenant '{tenant}' has no configuration yet"),
            }
            Ok(())
        }
        Some(Commands::Validate) => {
            // Config::load already applied every layer; getting here means it parsed
            println!("configuration OK");
            println!("  api.base_url = {}", config.api.base_url);
            println!("  api.request_timeout_secs = {}", config.api.request_timeout_secs);
            Ok(())
        }
        Some(Commands::Paths) => {
            if let Some(user_config) = Config::user_config_path() {
                println!("config: {}", user_config.display());
            }
            println!("state:  {}", config.state_path().display());
            println!("drafts: {}", config.drafts_path().display());
            println!("logs:   {}", config.logs_path().display());
            Ok(())
        }
    }
}
