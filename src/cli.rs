use clap::{Parser, Subcommand};
use uuid::Uuid;

/// Panelsync — SMM panel catalog synchronization engine
#[derive(Parser)]
#[command(name = "panelsync", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage registered panel providers
    Provider {
        #[command(subcommand)]
        command: ProviderCommands,
    },

    /// Fetch a provider's catalog, grouped by category
    Discover { provider_id: Uuid },

    /// Synchronize a provider's services into the local catalog
    Sync {
        provider_id: Uuid,
        /// Restrict to these external service ids
        #[arg(long, value_delimiter = ',')]
        services: Option<Vec<String>>,
        /// Per-service platform overrides, as EXTERNAL_ID=PLATFORM_UUID pairs
        #[arg(long = "platform", value_delimiter = ',')]
        platform_overrides: Vec<String>,
    },

    /// Show a provider's account balance
    Balance { provider_id: Uuid },

    /// Probe unsaved credentials by listing their services
    TestConnection {
        #[arg(long)]
        url: String,
        #[arg(long)]
        key: String,
    },

    /// Order lifecycle calls against a provider
    Order {
        #[command(subcommand)]
        command: OrderCommands,
    },
}

#[derive(Subcommand)]
pub enum ProviderCommands {
    /// Register a new provider
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        url: String,
        #[arg(long)]
        key: String,
    },
    /// List registered providers
    List,
    /// Update a provider's credentials or active flag
    Update {
        id: Uuid,
        #[arg(long)]
        name: String,
        #[arg(long)]
        url: String,
        #[arg(long)]
        key: String,
        #[arg(long)]
        disable: bool,
    },
    /// Remove a provider
    Remove { id: Uuid },
}

#[derive(Subcommand)]
pub enum OrderCommands {
    /// Place an order against a remote service
    Add {
        provider_id: Uuid,
        #[arg(long)]
        service: String,
        #[arg(long)]
        link: String,
        #[arg(long)]
        quantity: Option<u64>,
    },
    /// Query order status (one id, or several comma-separated)
    Status {
        provider_id: Uuid,
        #[arg(value_delimiter = ',')]
        order_ids: Vec<String>,
    },
    /// Request a refill for an order
    Refill {
        provider_id: Uuid,
        order_id: String,
    },
}
