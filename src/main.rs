//! Showcase CLI entry point.
//!
//! Builds a store from the config, loads the requested documents, models and
//! media through the file fetcher and prints the resulting state.

use anyhow::{Context, Result, bail};
use clap::Parser;
use futures::future::join_all;
use std::path::PathBuf;

use showcase::domain::{SettingKey, SettingValue};
use showcase::infra::app_config::{self, AppConfig};
use showcase::infra::fetch::FileFetcher;
use showcase::store::selectors;
use showcase::store::{Action, FetchOutcome, ResourceKind, ResourceLoader, Store};

#[derive(Parser, Debug)]
#[command(name = "showcase")]
#[command(version)]
#[command(about = "Load showcase documents, models and media into a state store", long_about = None)]
struct Args {
    /// Config file (defaults to SHOWCASE_CONFIG_PATH or ~/.showcase/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON state snapshot to hydrate from, overrides the configured one
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Directory relative urls are read from
    #[arg(long)]
    root: Option<PathBuf>,

    /// Document key to load (repeatable)
    #[arg(short, long = "document")]
    documents: Vec<String>,

    /// Model key to load (repeatable)
    #[arg(short, long = "model")]
    models: Vec<String>,

    /// Medium key to load (repeatable)
    #[arg(long = "medium")]
    media: Vec<String>,

    /// Document to show
    #[arg(long)]
    show: Option<String>,

    /// Setting as NAME=VALUE (repeatable)
    #[arg(long = "set", value_parser = parse_setting)]
    settings: Vec<(SettingKey, SettingValue)>,

    /// Print only the value at this dotted path
    #[arg(long)]
    get: Option<String>,
}

fn parse_setting(raw: &str) -> Result<(SettingKey, SettingValue), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got {raw}"))?;
    let key = name.trim().parse::<SettingKey>().map_err(|e| e.to_string())?;
    Ok((key, SettingValue::parse(value.trim())))
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => app_config::load_config_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => app_config::load_config(),
    };

    let store = hydrate(&config, &args)?;

    let document_keys = keys_for(&config, ResourceKind::Document, &args.documents);
    let model_keys = keys_for(&config, ResourceKind::Model, &args.models);
    let media_keys = keys_for(&config, ResourceKind::Medium, &args.media);

    let documents = ResourceLoader::documents();
    let models = match args.show.as_ref().or(document_keys.first()) {
        Some(document) => ResourceLoader::models_for_document(document.clone()),
        None => ResourceLoader::models(),
    };
    let media = ResourceLoader::media();

    let requests: Vec<(&ResourceLoader, &String)> = document_keys
        .iter()
        .map(|key| (&documents, key))
        .chain(model_keys.iter().map(|key| (&models, key)))
        .chain(media_keys.iter().map(|key| (&media, key)))
        .collect();

    for (loader, key) in &requests {
        loader.register_if_needed(&store, key);
    }
    if let Some(key) = &args.show {
        documents.register_if_needed(&store, key);
        store.dispatch(ResourceKind::Document.show(key.as_str()));
    }

    let root = args.root.clone().unwrap_or_else(|| config.content_root());
    let fetcher = FileFetcher::new(root);
    log::info!(
        "Loading {} resource(s) from {}",
        requests.len(),
        fetcher.root().display()
    );

    let outcomes = join_all(
        requests
            .iter()
            .map(|(loader, key)| loader.fetch_if_needed(&store, &fetcher, key)),
    )
    .await;

    let failed = outcomes
        .iter()
        .filter(|outcome| matches!(outcome, FetchOutcome::Failed(_)))
        .count();
    let discarded = outcomes
        .iter()
        .filter(|outcome| matches!(outcome, FetchOutcome::Discarded))
        .count();
    let loaded = outcomes.iter().filter(|outcome| outcome.is_loaded()).count();
    log::info!("Loaded {loaded}, failed {failed}, discarded {discarded}");

    let state = store.state();
    let output = match &args.get {
        Some(path) => match selectors::lookup(&state, path) {
            Some(value) => value,
            None => bail!("Nothing at {path}"),
        },
        None => serde_json::to_value(state.as_ref()).context("Failed to serialize state")?,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

/// Applies config, snapshot and command line settings to a fresh store.
fn hydrate(config: &AppConfig, args: &Args) -> Result<Store> {
    let store = Store::new();
    store.dispatch(Action::set_state(
        config.initial_snapshot().context("Invalid config")?,
    ));

    let snapshot = match &args.snapshot {
        Some(path) => Some(app_config::read_snapshot(path)?),
        None => config.load_snapshot()?,
    };
    if let Some(snapshot) = snapshot {
        store.dispatch(Action::set_state(snapshot));
    }

    for (key, value) in &args.settings {
        store.dispatch(Action::set_setting(*key, value.clone()));
    }
    Ok(store)
}

fn keys_for(config: &AppConfig, kind: ResourceKind, extra: &[String]) -> Vec<String> {
    let mut keys = config.source(kind).initial.clone();
    for key in extra {
        if !keys.contains(key) {
            keys.push(key.clone());
        }
    }
    keys
}
