//! Fixture-backed POI discovery demo.
//!
//! Runs discovery requests against two fixed providers loaded from JSON
//! fixtures, with simulated latency, and prints the per-provider answers,
//! the merged list and timing. `--json` prints the full results instead.
//! Repeat `--stop` to run several locations; a summary of integrity
//! violations and average provider times follows the reports.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use poi_search::{CachedProvider, Coordinates, Orchestrator, SearchRequest, Strategy};
use roadtrip::config::AppConfig;
use roadtrip::fixtures::{fixture_provider, load_pois};
use roadtrip::report::{render_summary, render_text, Summary};

/// Discover points of interest from a local and a catalog fixture.
#[derive(Debug, Parser)]
#[command(name = "roadtrip-poi-demo", version, about)]
struct Cli {
    /// Location name, e.g. "Lost Lake, Oregon"
    #[arg(long, requires_all = ["lat", "lon"], required_unless_present = "stop")]
    location: Option<String>,
    /// Origin latitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<f64>,
    /// Origin longitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    lon: Option<f64>,
    /// Extra stop as NAME@LAT,LON; repeatable
    #[arg(long, value_parser = parse_stop)]
    stop: Vec<Stop>,
    /// Only return POIs in this category
    #[arg(long)]
    category: Option<String>,
    /// Maximum number of merged results
    #[arg(long, default_value_t = 8)]
    max_results: usize,
    /// Provider strategy
    #[arg(long, value_enum, default_value_t = StrategyArg::Hybrid)]
    strategy: StrategyArg,
    /// JSON fixture served by the primary (local) provider
    #[arg(long, default_value = "demos/lost_lake_primary.json")]
    primary: PathBuf,
    /// JSON fixture served by the secondary (catalog) provider
    #[arg(long, default_value = "demos/lost_lake_secondary.json")]
    secondary: PathBuf,
    /// Confidence reported by the primary provider (overrides config)
    #[arg(long)]
    confidence: Option<f64>,
    /// Latency simulation seed (overrides config)
    #[arg(long, env = "ROADTRIP_DEMO_SEED")]
    seed: Option<u64>,
    /// Config file (defaults to ~/.config/roadtrip/config.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print the full result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    Hybrid,
    PrimaryFirst,
    SecondaryOnly,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Hybrid => Strategy::Hybrid,
            StrategyArg::PrimaryFirst => Strategy::PrimaryFirst,
            StrategyArg::SecondaryOnly => Strategy::SecondaryOnly,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Stop {
    name: String,
    origin: Coordinates,
}

fn parse_stop(raw: &str) -> Result<Stop, String> {
    let (name, coords) = raw
        .rsplit_once('@')
        .ok_or_else(|| format!("expected NAME@LAT,LON, got {raw:?}"))?;
    let (lat, lon) = coords
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON after '@', got {coords:?}"))?;
    let lat: f64 = lat.trim().parse().map_err(|e| format!("latitude {lat:?}: {e}"))?;
    let lon: f64 = lon.trim().parse().map_err(|e| format!("longitude {lon:?}: {e}"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err("stop name must not be empty".into());
    }
    Ok(Stop {
        name: name.to_string(),
        origin: Coordinates::new(lat, lon),
    })
}

impl Cli {
    /// `--location` first (when given), then every `--stop` in order.
    fn stops(&self) -> Vec<Stop> {
        let single = match (&self.location, self.lat, self.lon) {
            (Some(name), Some(lat), Some(lon)) => Some(Stop {
                name: name.clone(),
                origin: Coordinates::new(lat, lon),
            }),
            _ => None,
        };
        single.into_iter().chain(self.stop.iter().cloned()).collect()
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<AppConfig> {
    let config = match path {
        Some(path) => AppConfig::from_file(path)?,
        None => {
            let default_path = AppConfig::default_config_path();
            if default_path.exists() {
                AppConfig::from_file(&default_path)?
            } else {
                AppConfig::default()
            }
        }
    };
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so `--json` output stays machine-readable.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("roadtrip=info,poi_search=info")
            }),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    let seed = cli.seed.or(config.demo.seed);
    let confidence = cli.confidence.unwrap_or(config.demo.primary_confidence);
    if !(0.0..=1.0).contains(&confidence) {
        anyhow::bail!("--confidence must be within [0, 1], got {confidence}");
    }

    let primary_pois = load_pois(&cli.primary)?;
    let secondary_pois = load_pois(&cli.secondary)?;
    tracing::debug!(
        primary = primary_pois.len(),
        secondary = secondary_pois.len(),
        "fixtures loaded"
    );

    let primary = fixture_provider(
        "local-fixture",
        primary_pois,
        Some(config.demo.primary_latency.simulator(seed)),
        Some(confidence),
    );
    // Offset the catalog seed so the two providers draw different delays.
    let secondary = fixture_provider(
        "catalog-fixture",
        secondary_pois,
        Some(
            config
                .demo
                .secondary_latency
                .simulator(seed.map(|s| s.wrapping_add(1))),
        ),
        None,
    );

    let orchestrator = Orchestrator::new(
        CachedProvider::new(primary, &config.discovery.cache),
        CachedProvider::new(secondary, &config.discovery.cache),
        config.discovery.clone(),
    )?;

    let mut results = Vec::new();
    for stop in cli.stops() {
        let mut request = SearchRequest::new(stop.name.as_str(), stop.origin, cli.max_results)
            .with_strategy(cli.strategy.into());
        if let Some(category) = &cli.category {
            request = request.with_category(category.as_str());
        }
        results.push(orchestrator.search(&request).await?);
    }

    if cli.json {
        match results.as_slice() {
            [single] => println!("{}", serde_json::to_string_pretty(single)?),
            many => println!("{}", serde_json::to_string_pretty(many)?),
        }
        return Ok(());
    }

    for (i, result) in results.iter().enumerate() {
        if i > 0 {
            println!("{}", "-".repeat(60));
        }
        print!("{}", render_text(result));
    }
    if results.len() > 1 {
        println!();
        print!(
            "{}",
            render_summary(
                &Summary::from_results(&results),
                config.discovery.primary_timeout_ms,
                config.discovery.secondary_timeout_ms,
            )
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_stop_with_negative_longitude() {
        let stop = parse_stop("Seattle, Washington@47.6062,-122.3321").expect("stop");
        assert_eq!(stop.name, "Seattle, Washington");
        assert_eq!(stop.origin, Coordinates::new(47.6062, -122.3321));
    }

    #[test]
    fn rejects_malformed_stops() {
        assert!(parse_stop("Lost Lake").is_err());
        assert!(parse_stop("Lost Lake@45.4979").is_err());
        assert!(parse_stop("@45.4979,-121.8209").is_err());
        assert!(parse_stop("Lost Lake@north,-121.8209").is_err());
    }

    #[test]
    fn location_runs_before_stops() {
        let cli = Cli::parse_from([
            "roadtrip-poi-demo",
            "--location",
            "Lost Lake, Oregon",
            "--lat",
            "45.4979",
            "--lon",
            "-121.8209",
            "--stop",
            "Seattle, Washington@47.6062,-122.3321",
        ]);
        let names: Vec<String> = cli.stops().into_iter().map(|s| s.name).collect();
        assert_eq!(names, ["Lost Lake, Oregon", "Seattle, Washington"]);
    }

    #[test]
    fn stops_alone_are_enough() {
        let cli = Cli::try_parse_from([
            "roadtrip-poi-demo",
            "--stop",
            "Lost Lake, Oregon@45.4979,-121.8209",
        ])
        .expect("parse");
        assert_eq!(cli.stops().len(), 1);
    }

    #[test]
    fn missing_location_and_stops_is_rejected() {
        assert!(Cli::try_parse_from(["roadtrip-poi-demo"]).is_err());
    }
}
