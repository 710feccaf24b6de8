use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

use alert_board::{export_layer, parse_kind, AlertBoard, PointFilter};
use geo_cluster::{cluster_with, collect_points, ClusterOptions, PointRecord, RadiusScale};
use hazard_core::{FilterState, LevelFilter, ZoneFilter};
use hazard_feed::{AlertGate, CancelFlag, FeedConfig, IngestionError, IPMA_WARNINGS_URL};

#[derive(Debug, Parser)]
#[command(name = "alert-board")]
#[command(about = "Official weather warnings and issue clusters for Portugal")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch, filter and rank official warnings
    Alerts {
        /// Warnings endpoint. Falls back to HAZARD_FEED_URL, then IPMA.
        #[arg(long)]
        url: Option<String>,

        /// Zone: all, norte, centro, sul, ilhas, desconhecida
        #[arg(long, default_value = "all")]
        zone: ZoneFilter,

        /// Level: all, red, orange, yellow
        #[arg(long, default_value = "all")]
        level: LevelFilter,

        /// Free-text search over title and area
        #[arg(long, default_value = "")]
        query: String,

        /// Extra "show more" pages to reveal
        #[arg(long, default_value_t = 0)]
        more: usize,

        /// Print the visible alerts as JSON
        #[arg(long)]
        json: bool,
    },

    /// Cluster a JSON file of point records
    Clusters {
        /// Path to a JSON array of {id, title, latitude, longitude, status?, type?, category?}
        file: PathBuf,

        /// Grid precision in decimal places
        #[arg(long, default_value_t = 2)]
        precision: u32,

        /// Clusters to keep
        #[arg(long, default_value_t = 5)]
        top: usize,

        /// Only these kinds: open, in_progress, resolved, need, offer
        #[arg(long = "kind")]
        kinds: Vec<String>,

        /// Only issues of this category, e.g. road_damage
        #[arg(long)]
        category: Option<String>,

        /// Write the rendered map layer as GeoJSON
        #[arg(long)]
        geojson: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match args.command {
        Command::Alerts {
            url,
            zone,
            level,
            query,
            more,
            json,
        } => {
            let config = match url {
                Some(url) => FeedConfig::new(url),
                None => match FeedConfig::from_env() {
                    Ok(config) => config,
                    Err(IngestionError::ConfigMissing(_)) => FeedConfig::new(IPMA_WARNINGS_URL),
                    Err(e) => return Err(e.into()),
                },
            };
            run_alerts(config, FilterState::new(zone, level, query), more, json).await
        }
        Command::Clusters {
            file,
            precision,
            top,
            kinds,
            category,
            geojson,
        } => {
            let options = ClusterOptions {
                precision,
                top_n: top,
            };
            run_clusters(file, options, kinds, category, geojson).await
        }
    }
}

async fn run_alerts(
    config: FeedConfig,
    filter: FilterState,
    more: usize,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    info!(endpoint = %config.endpoint, "fetching warnings");
    let gate = AlertGate::new(config)?;
    let mut board = AlertBoard::new(CancelFlag::new());
    board.refresh(&gate).await;
    board.set_filter(filter);
    for _ in 0..more {
        board.show_more();
    }

    if json {
        println!("{}", serde_json::to_string_pretty(board.visible())?);
        return Ok(());
    }

    println!("Alertas Ativos: {}", board.count_label());
    if let Some(message) = board.status_message() {
        println!("{}", message);
        return Ok(());
    }
    for alert in board.visible() {
        println!(
            "[{}] {} - {} ({})",
            alert.level.badge_label(),
            alert.title,
            alert.area_display(),
            alert.zone().badge()
        );
        if let Some(range) = alert.date_range() {
            println!("    {}", range);
        }
    }
    if let Some(shown) = board.shown_label() {
        println!("{}", shown);
    }
    Ok(())
}

async fn run_clusters(
    file: PathBuf,
    options: ClusterOptions,
    kinds: Vec<String>,
    category: Option<String>,
    geojson: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let by_kind = if kinds.is_empty() {
        PointFilter::All
    } else {
        let parsed = kinds
            .iter()
            .map(|k| parse_kind(k).ok_or_else(|| format!("unknown point kind: {}", k)))
            .collect::<Result<Vec<_>, _>>()?;
        PointFilter::only(parsed)
    };
    let filter = match category {
        Some(category) => by_kind.and(PointFilter::category(category)),
        None => by_kind,
    };

    let text = tokio::fs::read_to_string(&file).await?;
    let records: Vec<PointRecord> = serde_json::from_str(&text)?;
    let points = filter.apply(collect_points(&records));
    let clusters = cluster_with(&points, options);

    let scale = RadiusScale::default();
    println!("{} points, {} clusters", points.len(), clusters.len());
    for c in &clusters {
        println!(
            "{:>9.5} {:>9.5}  weight {:>5.1}  radius {:>6.0} m  {}",
            c.centroid.lat,
            c.centroid.lng,
            c.weight,
            scale.radius(c.count),
            c.label()
        );
    }

    if let Some(out) = geojson {
        let layer = export_layer(records, filter, options).await?;
        tokio::fs::write(&out, serde_json::to_string_pretty(&layer)?).await?;
        info!(path = %out.display(), "wrote map layer");
    }
    Ok(())
}
