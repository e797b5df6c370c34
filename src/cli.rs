use crate::{config::Config, gateways};
use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use futures::future::join_all;
use std::{fs, path::PathBuf, process::ExitCode};
use vpgeo_application::prelude::*;
use vpgeo_boundary as json;
use vpgeo_core::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "vpgeo", version, about = "Queued, cached and rate-limited geocoding")]
struct Cli {
    /// Configuration file [default: vpgeo.toml]
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory of the lookup cache
    #[arg(long, global = true, value_name = "DIR")]
    cache_dir: Option<PathBuf>,

    /// Print results as JSON lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Find places by name or address
    Search {
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Find the address at a coordinate
    #[command(allow_negative_numbers = true)]
    Reverse { lat: f64, lon: f64 },
    /// Resolve a raw lookup key (lookup URL, "lat,lon" or text)
    Lookup { key: String },
    /// Resolve all keys of a file (one per line) at once
    Batch { file: PathBuf },
    /// Inspect or reset the lookup cache
    #[command(subcommand)]
    Cache(CacheCommand),
}

#[derive(Subcommand, Debug)]
enum CacheCommand {
    /// List all cached lookups
    List,
    /// Remove all cached lookups
    Clear,
}

type Outcome = (String, Result<GeocodeResult, GeocodeError>);

pub async fn run() -> Result<ExitCode> {
    let args = Cli::parse();
    let mut cfg = Config::try_load_from_file_or_default(args.config.as_ref())?;
    if let Some(dir) = args.cache_dir {
        cfg.cache.dir = dir;
    }
    let cache = GeocodeCache::load(gateways::cache_store(&cfg.cache)?);
    let service = GeocodeService::new(
        gateways::provider_chain(&cfg)?,
        cache,
        gateways::queue_policy(&cfg.queue),
    );

    let outcomes: Vec<Outcome> = match args.command {
        Command::Search { text } => {
            let text = text.join(" ");
            let res = service.search(&text).await;
            vec![(text, res)]
        }
        Command::Reverse { lat, lon } => {
            let res = service.reverse(lat, lon).await;
            vec![(format!("{lat},{lon}"), res)]
        }
        Command::Lookup { key } => {
            let res = service.lookup(key.as_str()).await;
            vec![(key, res)]
        }
        Command::Batch { file } => {
            let content = fs::read_to_string(&file)
                .with_context(|| format!("Unable to read {}", file.display()))?;
            let keys = read_keys(&content);
            log::info!("Resolving {} lookups", keys.len());
            let results = join_all(keys.iter().map(|key| service.lookup(key.as_str()))).await;
            keys.into_iter().zip(results).collect()
        }
        Command::Cache(CacheCommand::List) => {
            print_cache(&service, args.json)?;
            return Ok(ExitCode::SUCCESS);
        }
        Command::Cache(CacheCommand::Clear) => {
            let count = service.cache_len();
            service
                .clear_cache()
                .context("Unable to clear the lookup cache")?;
            println!("Removed {count} cached lookups");
            return Ok(ExitCode::SUCCESS);
        }
    };
    report(outcomes, args.json)
}

/// Non-blank lines except `#` comments.
fn read_keys(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(ToOwned::to_owned)
        .collect()
}

fn report(outcomes: Vec<Outcome>, as_json: bool) -> Result<ExitCode> {
    let mut failed = 0;
    for (key, res) in outcomes {
        match res {
            Ok(result) => {
                if as_json {
                    let lookup = json::Lookup {
                        key,
                        result: result.into(),
                    };
                    println!("{}", serde_json::to_string(&lookup)?);
                } else {
                    println!("{}", format_result(&key, &result));
                }
            }
            Err(err) => {
                failed += 1;
                eprintln!("{key}: {err}");
            }
        }
    }
    if failed > 0 {
        log::warn!("{failed} lookup(s) failed");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn print_cache(service: &GeocodeService, as_json: bool) -> Result<()> {
    let entries = service.cache_entries();
    if as_json {
        let snapshot: json::CacheSnapshot = entries
            .into_iter()
            .map(|(key, res)| (key, res.into()))
            .collect();
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }
    for (key, res) in &entries {
        println!("{key}\t{}", summary(res));
    }
    Ok(())
}

fn format_result(key: &str, res: &GeocodeResult) -> String {
    match res {
        GeocodeResult::Places(places) if !places.is_empty() => {
            let mut out = format!("{key}:");
            for p in places {
                out.push_str(&format!("\n  {}, {}  {}", p.lat, p.lon, p.display_name));
            }
            out
        }
        GeocodeResult::Reverse(Some(addr)) => format!("{key}: {}", addr.display_name),
        _ => format!("{key}: not found"),
    }
}

fn summary(res: &GeocodeResult) -> String {
    match res {
        GeocodeResult::Places(places) if places.len() == 1 => places[0].display_name.clone(),
        GeocodeResult::Places(places) if !places.is_empty() => {
            format!("{} places", places.len())
        }
        GeocodeResult::Reverse(Some(addr)) => addr.display_name.clone(),
        _ => "not found".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use vpgeo_entities::builders::*;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_negative_coordinates() {
        let cli = Cli::try_parse_from(["vpgeo", "reverse", "-33.8568", "151.2153"]).unwrap();
        let Command::Reverse { lat, lon } = cli.command else {
            panic!("unexpected command");
        };
        assert_eq!(lat, -33.8568);
        assert_eq!(lon, 151.2153);
    }

    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["vpgeo", "search", "Tokyo", "Tower", "--json", "--cache-dir", "x"])
                .unwrap();
        assert!(cli.json);
        assert_eq!(cli.cache_dir, Some(PathBuf::from("x")));
        let Command::Search { text } = cli.command else {
            panic!("unexpected command");
        };
        assert_eq!(text, vec!["Tokyo", "Tower"]);
    }

    #[test]
    fn require_search_text() {
        assert!(Cli::try_parse_from(["vpgeo", "search"]).is_err());
    }

    #[test]
    fn read_batch_keys() {
        let keys = read_keys("Tokyo Tower\n\n  # hotels\n  Kiyomizu-dera, Kyoto \n35.0,135.75\n");
        assert_eq!(keys, vec!["Tokyo Tower", "Kiyomizu-dera, Kyoto", "35.0,135.75"]);
    }

    #[test]
    fn format_found_and_missing_results() {
        let res = GeocodeResult::Places(vec![Place::build()
            .lat_lon(35.6585805, 139.7454329)
            .display_name("Tokyo Tower, Minato, Japan")
            .finish()]);
        assert_eq!(
            format_result("Tokyo Tower", &res),
            "Tokyo Tower:\n  35.6585805, 139.7454329  Tokyo Tower, Minato, Japan"
        );
        assert_eq!(summary(&res), "Tokyo Tower, Minato, Japan");
        let res = GeocodeResult::Places(vec![]);
        assert_eq!(format_result("Atlantis", &res), "Atlantis: not found");
        assert_eq!(summary(&GeocodeResult::Reverse(None)), "not found");
    }

    #[test]
    fn format_reverse_result() {
        let res = GeocodeResult::Reverse(Some(
            ReverseAddress::build()
                .display_name("Kiyomizu-dera, Kyoto, Japan")
                .finish(),
        ));
        assert_eq!(
            format_result("34.9949,135.785", &res),
            "34.9949,135.785: Kiyomizu-dera, Kyoto, Japan"
        );
    }

    #[test]
    fn report_failed_lookups() {
        let outcomes = vec![
            ("Atlantis".to_string(), Ok(GeocodeResult::Places(vec![]))),
            ("".to_string(), Err(GeocodeError::from(QueryError::Empty))),
        ];
        assert_eq!(report(outcomes, false).unwrap(), ExitCode::FAILURE);
        let outcomes = vec![("Atlantis".to_string(), Ok(GeocodeResult::Places(vec![])))];
        assert_eq!(report(outcomes, true).unwrap(), ExitCode::SUCCESS);
    }
}
