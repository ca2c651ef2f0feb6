//! Launchdeck - Browse SpaceX launches from the terminal
//!
//! Fetches one or more pages of launches, optionally filters them to
//! successful launches in date order, optionally downloads mission patches,
//! and prints the result.

use std::collections::BTreeSet;
use std::process::ExitCode;
use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use clap::Parser;
use reqwest::Client;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use launchdeck::cli::{Cli, Config};
use launchdeck::data::{CompanyClient, CompanyInfo, HttpImageSource, LaunchClient};
use launchdeck::display::{format_launch_date, format_valuation, outcome_label, time_distance};
use launchdeck::presenter::latest_update;
use launchdeck::{ChannelPresenter, FetchOutcome, ImageCache, Launch, LaunchAggregator, LaunchError};

/// Sets up stderr logging, `warn` by default, overridable through `RUST_LOG`
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    let config = match Config::from_cli(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {err}");
            return ExitCode::from(2);
        }
    };

    match run(config).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Fetches, filters and prints launches
///
/// A page-fetch failure is reported once, as its user message. The run only
/// fails when nothing at all could be fetched.
async fn run(config: Config) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let http = Client::builder().timeout(config.request_timeout).build()?;

    let company = if config.show_company {
        CompanyClient::with_client(http.clone(), config.base_url.clone())
            .fetch_company_info()
            .await
    } else {
        None
    };

    let (presenter, mut updates) = ChannelPresenter::new();
    let presenter = Arc::new(presenter);
    let fetcher = Arc::new(LaunchClient::with_client(http.clone(), config.base_url.clone()));
    let aggregator = LaunchAggregator::new(fetcher).with_presenter(&presenter);

    let mut failure: Option<LaunchError> = None;
    for _ in 0..config.pages {
        match aggregator.fetch_next_page().await {
            Ok(FetchOutcome::Appended { count: 0, page }) => {
                info!(page, "no more launches");
                break;
            }
            Ok(_) => {}
            Err(err) => {
                eprintln!("{}", err.user_message());
                failure = Some(err);
                break;
            }
        }
    }

    if config.filter.is_some() {
        aggregator.set_filter(config.filter);
    }

    let launches = latest_update(&mut updates)
        .map(|update| update.launches)
        .unwrap_or_else(|| aggregator.current_projection());

    let cache = if config.fetch_images {
        let cache = ImageCache::new(Arc::new(HttpImageSource::with_client(http)));
        prefetch_patches(&cache, &launches).await;
        Some(cache)
    } else {
        None
    };

    if config.json {
        println!("{}", serde_json::to_string_pretty(&launches)?);
    } else {
        if let Some(company) = &company {
            print_company(company);
        }
        print_launches(&launches, cache.as_ref());
    }

    match failure {
        Some(_) if aggregator.launch_count() == 0 => Ok(ExitCode::FAILURE),
        _ => Ok(ExitCode::SUCCESS),
    }
}

/// Downloads every distinct patch image in `launches` concurrently
async fn prefetch_patches(cache: &ImageCache, launches: &[Launch]) {
    let urls: BTreeSet<&str> = launches
        .iter()
        .filter_map(|launch| launch.patch_image_url.as_deref())
        .collect();

    let results =
        futures::future::join_all(urls.iter().map(|url| cache.fetch_and_cache(url))).await;
    let failed = results.iter().filter(|r| r.is_err()).count();
    if failed > 0 {
        warn!(failed, total = urls.len(), "some patch images could not be fetched");
    }
}

fn print_company(company: &CompanyInfo) {
    println!(
        "{} was founded by {} in {}. It has {} employees, {} launch sites, and is valued at USD {}.",
        company.name,
        company.founder,
        company.founded,
        company.employees,
        company.launch_sites,
        format_valuation(company.valuation)
    );
    println!();
}

fn print_launches(launches: &[Launch], cache: Option<&ImageCache>) {
    if launches.is_empty() {
        println!("No launches to show.");
        return;
    }

    let now = Utc::now();
    for launch in launches {
        let distance = time_distance(launch.launch_date_unix, now);
        println!("Mission:    {}", launch.name);
        println!("Date/Time:  {}", format_launch_date(&launch.launch_date_utc));
        println!("Rocket:     {}", launch.rocket);
        println!("{:<11} {}", distance.label, distance.days);
        println!("Outcome:    {}", outcome_label(launch.success));
        if let Some(wiki) = &launch.wikipedia_url {
            println!("Wikipedia:  {wiki}");
        }
        if let (Some(cache), Some(url)) = (cache, launch.patch_image_url.as_deref()) {
            println!("Patch:      {}", patch_summary(cache.get(url)));
        }
        println!();
    }
}

fn patch_summary(image: Option<Bytes>) -> String {
    match image {
        Some(bytes) => format!("cached ({} bytes)", bytes.len()),
        None => "unavailable".to_string(),
    }
}
