use acsplot::{
    config::Config,
    fetch::{DataRepoClient, TtlCache},
    plot,
    series::SeriesRow,
};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use futures::{stream::FuturesUnordered, StreamExt};
use rayon::prelude::*;
use serde::Serialize;
use std::{collections::BTreeMap, fs, path::PathBuf};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

/// Envelope written around each plot spec.
#[derive(Serialize)]
struct Artifact<'a> {
    generated_at: DateTime<Utc>,
    geography: &'a str,
    plot: &'a str,
    spec: &'a plot::PlotSpec,
}

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();
    info!("startup");

    // ─── 2) load config + token ──────────────────────────────────────
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = Config::load(config_path.as_deref())?;
    let token = Config::token()?;
    let client = DataRepoClient::new(&config.data_repo, &config.data_prefix, &token)?;
    let cache: TtlCache<Vec<SeriesRow>> = TtlCache::new(config.cache_ttl());

    // ─── 3) fetch datasets concurrently, cache-aware ─────────────────
    let mut fetches = FuturesUnordered::new();
    for dataset in &config.datasets {
        if cache.get(dataset).is_none() {
            let client = &client;
            fetches.push(async move { (dataset.as_str(), client.fetch_rows(dataset).await) });
        }
    }

    while let Some((dataset, result)) = fetches.next().await {
        match result {
            Ok(rows) => {
                info!(dataset, rows = rows.len(), "fetched dataset");
                cache.insert(dataset, rows);
            }
            // A failed dataset only loses its own plots; keep going.
            Err(e) => error!(dataset, error = %e, "fetch failed; skipping dataset"),
        }
    }

    // ─── 4) group rows by geography ──────────────────────────────────
    let mut by_geography: BTreeMap<String, Vec<SeriesRow>> = BTreeMap::new();
    for dataset in &config.datasets {
        let Some(rows) = cache.get(dataset) else {
            continue;
        };
        for row in rows.iter() {
            by_geography
                .entry(row.geography.clone())
                .or_default()
                .push(row.clone());
        }
    }
    info!(geographies = by_geography.len(), "grouped series rows");

    // ─── 5) build every registered plot for every geography ──────────
    let jobs: Vec<(&String, &Vec<SeriesRow>, &str)> = by_geography
        .iter()
        .flat_map(|(geography, rows)| {
            plot::PLOTS.keys().map(move |name| (geography, rows, *name))
        })
        .collect();

    let specs: Vec<(&String, &str, plot::PlotSpec)> = jobs
        .into_par_iter()
        .filter_map(|(geography, rows, name)| {
            plot::build(name, geography, rows).map(|spec| (geography, name, spec))
        })
        .collect();

    // ─── 6) write artifacts ──────────────────────────────────────────
    let generated_at = Utc::now();
    let mut written = 0usize;
    for (geography, name, spec) in &specs {
        let geography = geography.as_str();
        let name: &str = name;
        let dir = config.out_dir.join(slugify(geography));
        fs::create_dir_all(&dir)
            .with_context(|| format!("creating output dir `{}`", dir.display()))?;

        let artifact = Artifact {
            generated_at,
            geography,
            plot: name,
            spec,
        };
        let path = dir.join(format!("{name}.json"));
        fs::write(&path, serde_json::to_vec_pretty(&artifact)?)
            .with_context(|| format!("writing `{}`", path.display()))?;
        written += 1;
    }

    info!(written, geographies = by_geography.len(), "all done");
    Ok(())
}

/// "West Greenville" → "west-greenville"
fn slugify(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
