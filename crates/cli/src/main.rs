//! Context broker CLI entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Parse arguments** — see [`args::Cli`].
//! 2. **Wire observability** — install a `tracing-subscriber` text or JSON
//!    layer writing to stderr.
//! 3. **Load configuration** — `BrokerConfig::from_env()`, then apply the
//!    `--url` / `--timeout-ms` overrides.
//! 4. **Dispatch** — build one `BrokerClient` and run a single command,
//!    printing results as JSON on stdout (see `execute`).

mod args;
mod logging;

use std::io::Write;

use anyhow::{Context, Result};
use broker::{BrokerClient, BrokerConfig, Transport};
use clap::Parser;
use model::{Attributes, ContextEntity, Page};
use serde::Serialize;
use tracing::{debug, info};

use crate::args::{Cli, Command, NamedAttribute};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_format);
    run(cli).await
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = BrokerConfig::from_env().context("loading broker configuration")?;
    if let Some(url) = cli.url {
        config.base_url = url;
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.request_timeout_ms = timeout_ms;
    }
    let client = BrokerClient::from_config(&config).context("building broker client")?;
    debug!(base_url = client.base_url(), "broker client ready");

    let mut stdout = std::io::stdout();
    execute(&client, cli.command, &mut stdout).await
}

/// Runs one command, writing its JSON or boolean result to `out`.
async fn execute<T: Transport>(
    client: &BrokerClient<T>,
    command: Command,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        Command::Exists { entity_type, id } => {
            writeln!(out, "{}", client.exists(&entity_type, &id).await)?;
        }
        Command::Get { entity_type, id } => {
            let mut entity = ContextEntity::new(&entity_type, &id);
            client
                .read(&mut entity)
                .await
                .with_context(|| format!("reading {entity}"))?;
            print_json(out, &entity)?;
        }
        Command::List {
            entity_type,
            page: Some(page),
        } => {
            let entities = client
                .list_page(&entity_type, Page::new(page), ContextEntity::new)
                .await
                .with_context(|| format!("listing {entity_type} page {page}"))?;
            print_json(out, &entities)?;
        }
        Command::List {
            entity_type,
            page: None,
        } => match client.list_all(&entity_type, ContextEntity::new).await {
            Ok(entities) => print_json(out, &entities)?,
            Err(partial) => {
                let (entities, source) = partial.into_parts();
                print_json(out, &entities)?;
                return Err(anyhow::Error::new(source).context(format!(
                    "listing {entity_type} stopped after {} entities",
                    entities.len()
                )));
            }
        },
        Command::Create {
            entity_type,
            id,
            attributes,
        } => {
            let entity = build_entity(&entity_type, &id, attributes);
            client
                .create(&entity)
                .await
                .with_context(|| format!("creating {entity}"))?;
            info!(%entity, "entity created");
        }
        Command::Update {
            entity_type,
            id,
            attributes,
        } => {
            let entity = build_entity(&entity_type, &id, attributes);
            client
                .update(&entity)
                .await
                .with_context(|| format!("updating {entity}"))?;
            info!(%entity, "entity updated");
        }
        Command::Delete { entity_type, id } => {
            let entity = ContextEntity::new(&entity_type, &id);
            client
                .delete(&entity)
                .await
                .with_context(|| format!("deleting {entity}"))?;
            info!(%entity, "entity deleted");
        }
    }
    Ok(())
}

fn build_entity(entity_type: &str, id: &str, attributes: Vec<NamedAttribute>) -> ContextEntity {
    let attributes: Attributes = attributes
        .into_iter()
        .map(|named| (named.name, named.attribute))
        .collect();
    ContextEntity::new(entity_type, id).with_attributes(attributes)
}

fn print_json<T: Serialize + ?Sized>(out: &mut impl Write, value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("serialising output")?;
    writeln!(out, "{text}")?;
    Ok(())
}
