//! Command line host for kerbi: search addresses, fetch schedules, check setup.
//!
//! Stands in for the smart-home integration that normally drives the service
//! on a fixed interval; useful for finding a property id and sanity-checking a
//! council's endpoints.

#![allow(clippy::print_stdout, reason = "command line tool output")]

use std::sync::Arc;

use anyhow::{Result, ensure};
use chrono::Local;
use clap::{Parser, Subcommand};
use reqwest::Client;

use kerbi_core::{
    model::{CouncilId, PropertyId},
    plugin::PluginRegistry,
    service::KerbiService,
};
use kerbi_provider_macedon_ranges as macedon_ranges;
use kerbi_provider_mount_alexander as mount_alexander;

#[derive(Parser)]
#[command(name = "kerbi", about = "Kerbside bin collection dates from council websites")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List supported councils
    Councils,
    /// Search for an address within a council
    Search {
        /// Council identifier (see `councils`)
        council: String,
        /// Free-text address query
        query: String,
    },
    /// Fetch the upcoming collection schedule for a property
    Schedule {
        /// Council identifier (see `councils`)
        council: String,
        /// Property identifier from `search`
        property_id: String,
    },
    /// Validate that a property yields a non-empty schedule
    Check {
        /// Council identifier (see `councils`)
        council: String,
        /// Property identifier from `search`
        property_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let client = Client::builder().user_agent("kerbi/0.1").build()?;

    let plugins = vec![
        macedon_ranges::plugin(client.clone()),
        mount_alexander::plugin(client.clone()),
    ];
    let registry = Arc::new(PluginRegistry::new(plugins));
    let service = KerbiService::new(registry);

    match cli.command {
        Command::Councils => {
            for (id, name) in service.councils() {
                println!("{:<16} {name}", id.0);
            }
        }
        Command::Search { council, query } => {
            let addresses = service.search_addresses(CouncilId(council), &query).await?;
            if addresses.is_empty() {
                println!("No matching addresses");
            }
            for address in addresses {
                println!("{:<12} {}", address.id.0, address.label);
            }
        }
        Command::Schedule {
            council,
            property_id,
        } => {
            let schedule = service
                .collection_schedule(CouncilId(council), &PropertyId(property_id))
                .await?;
            if schedule.is_empty() {
                println!("No collections found");
            }
            for (bin, collection) in schedule.iter() {
                println!("{:<10} {}  ({})", bin.key(), collection.date, collection.label);
            }
            let today = Local::now().date_naive();
            if let Some((bin, collection)) = schedule.next_collection(today) {
                println!("next out: {} on {}", bin.meta().name, collection.date);
            }
        }
        Command::Check {
            council,
            property_id,
        } => {
            let ok = service
                .check_connection(CouncilId(council), &PropertyId(property_id))
                .await;
            ensure!(ok, "connection check failed: no usable schedule came back");
            println!("ok");
        }
    }

    Ok(())
}
