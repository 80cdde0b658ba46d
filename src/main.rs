use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

mod cli;

use cli::{Cli, Commands, OrderCommands, ProviderCommands};
use panelsync::config;
use panelsync::models::provider::NewProvider;
use panelsync::orders::OrderManager;
use panelsync::panel::Mode;
use panelsync::store::postgres::PgStore;
use panelsync::store::CatalogStore;
use panelsync::sync::SyncEngine;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = config::load()?;

    let pg = PgStore::connect(&config.database_url)
        .await
        .context("failed to connect to database")?;
    pg.migrate().await.context("failed to run migrations")?;

    let store: Arc<dyn CatalogStore> = Arc::new(pg);
    let mut engine = SyncEngine::new(store.clone());
    if config.force_mock {
        engine = engine.with_mode(Mode::Mock);
    }

    match cli.command {
        Commands::Provider { command } => match command {
            ProviderCommands::Add { name, url, key } => {
                let id = store
                    .insert_provider(&NewProvider {
                        name,
                        api_url: url,
                        api_key: key,
                    })
                    .await?;
                println!("{id}");
            }
            ProviderCommands::List => {
                let providers = store.list_providers().await?;
                let rows: Vec<_> = providers
                    .iter()
                    .map(|p| {
                        serde_json::json!({
                            "id": p.id,
                            "name": p.name,
                            "api_url": p.api_url,
                            "is_active": p.is_active,
                        })
                    })
                    .collect();
                print_json(&rows)?;
            }
            ProviderCommands::Update {
                id,
                name,
                url,
                key,
                disable,
            } => {
                let updated = store
                    .update_provider(
                        id,
                        &NewProvider {
                            name,
                            api_url: url,
                            api_key: key,
                        },
                        !disable,
                    )
                    .await?;
                anyhow::ensure!(updated, "provider {id} not found");
            }
            ProviderCommands::Remove { id } => {
                let removed = store.delete_provider(id).await?;
                anyhow::ensure!(removed, "provider {id} not found");
            }
        },

        Commands::Discover { provider_id } => {
            let report = engine.discover_and_group(provider_id).await?;
            print_json(&report)?;
        }

        Commands::Sync {
            provider_id,
            services,
            platform_overrides,
        } => {
            let overrides = parse_overrides(&platform_overrides)?;
            let report = engine
                .synchronize(provider_id, services.as_deref(), &overrides)
                .await?;
            print_json(&report)?;
        }

        Commands::Balance { provider_id } => {
            let balance = engine.balance(provider_id).await?;
            print_json(&balance)?;
        }

        Commands::TestConnection { url, key } => match engine.test_connection(&url, &key).await {
            Ok(services) => println!("ok: {} services", services.len()),
            Err(e) => {
                eprintln!("connection test failed: {e}");
                std::process::exit(1);
            }
        },

        Commands::Order { command } => match command {
            OrderCommands::Add {
                provider_id,
                service,
                link,
                quantity,
            } => {
                let manager = OrderManager::new(engine.client(provider_id).await?);
                let order_id = manager.create_order(&service, &link, quantity, &[]).await?;
                println!("{order_id}");
            }
            OrderCommands::Status {
                provider_id,
                order_ids,
            } => {
                let manager = OrderManager::new(engine.client(provider_id).await?);
                if let [only] = order_ids.as_slice() {
                    print_json(&manager.order_status(only).await?)?;
                } else {
                    print_json(&manager.multi_order_status(&order_ids).await?)?;
                }
            }
            OrderCommands::Refill {
                provider_id,
                order_id,
            } => {
                let manager = OrderManager::new(engine.client(provider_id).await?);
                print_json(&manager.refill_order(&order_id).await?)?;
            }
        },
    }

    Ok(())
}

/// Parse EXTERNAL_ID=PLATFORM_UUID override pairs from the command line.
fn parse_overrides(pairs: &[String]) -> anyhow::Result<HashMap<String, Uuid>> {
    let mut overrides = HashMap::new();
    for pair in pairs {
        let (external_id, platform_id) = pair
            .split_once('=')
            .with_context(|| format!("invalid override {pair:?}, expected ID=PLATFORM_UUID"))?;
        let platform_id: Uuid = platform_id
            .parse()
            .with_context(|| format!("invalid platform UUID in override {pair:?}"))?;
        overrides.insert(external_id.to_string(), platform_id);
    }
    Ok(overrides)
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
