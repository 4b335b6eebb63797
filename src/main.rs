use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Write};
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::mpsc;
use std::time::Duration;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;
use trackdash::config::{DashboardConfig, RenderOptions};
use trackdash::data::Dataset;
use trackdash::parser::{parse_region, parse_year, parse_year_range};
use trackdash::playback::{Playback, Ticker};
use trackdash::render::{ChartSlot, ChartSurface, JsonSurface, PngSurface};
use trackdash::snapshot::SnapshotTable;
use trackdash::views::{self, GenreQuery, RaceFrame, View};

#[derive(Parser, Debug)]
#[command(name = "trackdash")]
#[command(about = "Aggregate a music track dataset into dashboard charts", long_about = None)]
struct Args {
    /// JSON config file overriding the view defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format: JSON on stdout or PNG files in --out
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Directory PNG files are written to
    #[arg(long, default_value = ".")]
    out: PathBuf,

    /// Log debug messages
    #[arg(short, long)]
    verbose: bool,

    /// Dataset file (.json array of tracks, or .csv)
    dataset: PathBuf,

    #[command(subcommand)]
    view: ViewCommand,
}

#[derive(Subcommand, Debug)]
enum ViewCommand {
    /// Headline figures and the popularity trend
    Overview,
    /// Genre ranking as radar, heatmap and treemap
    Genres {
        /// Region name or "all"
        #[arg(long, default_value = "all")]
        region: String,
        /// Year or "all"
        #[arg(long, default_value = "all")]
        year: String,
    },
    /// Track counts per country
    Geo,
    /// Yearly audio feature trends
    Evolution {
        /// Year range, e.g. 1980-2022
        #[arg(long)]
        years: Option<String>,
    },
    /// Leading genres and track shares per region
    Regions,
    /// Yearly genre popularity race
    Race {
        /// Year range, e.g. 1980-2022
        #[arg(long)]
        years: Option<String>,
        /// Frame to show, or to start playback from
        #[arg(long)]
        year: Option<i32>,
        /// Play the frames one after the other
        #[arg(long)]
        play: bool,
        /// Delay between frames in milliseconds
        #[arg(long)]
        interval_ms: Option<u64>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Png,
}

struct Output {
    format: OutputFormat,
    dir: PathBuf,
    render: RenderOptions,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    };
    let dataset = Dataset::load(&args.dataset)?;

    let output = Output {
        format: args.format,
        dir: args.out,
        render: config.render.clone(),
    };

    match args.view {
        ViewCommand::Overview => emit(&views::overview(&dataset, &config.overview), &output),
        ViewCommand::Genres { region, year } => {
            let query = GenreQuery {
                region: parse_region(&region),
                year: parse_year(&year)?,
            };
            emit(&views::genre_profile(&dataset, &query, &config.genres), &output)
        }
        ViewCommand::Geo => emit(&views::geography(&dataset, &config.geography), &output),
        ViewCommand::Evolution { years } => {
            let mut evolution = config.evolution.clone();
            if let Some(years) = years {
                evolution.years = parse_year_range(&years)?;
            }
            emit(&views::evolution(&dataset, &evolution), &output)
        }
        ViewCommand::Regions => emit(&views::regional(&dataset, &config.regions), &output),
        ViewCommand::Race {
            years,
            year,
            play,
            interval_ms,
        } => {
            let mut race = config.race.clone();
            if let Some(years) = years {
                race.years = parse_year_range(&years)?;
            }
            if let Some(ms) = interval_ms {
                race.interval_ms = ms;
            }
            let table = views::race(&dataset, &race);
            if play {
                play_race(&table, year, Duration::from_millis(race.interval_ms), &output)
            } else {
                let frame = RaceFrame::at(&table, year.unwrap_or(race.years.start));
                emit(&frame, &output)
            }
        }
    }
}

/// Print the view as JSON, or write one PNG per chart
fn emit<V: View>(view: &V, output: &Output) -> Result<()> {
    match output.format {
        OutputFormat::Json => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            serde_json::to_writer_pretty(&mut handle, view).context("Failed to serialise view")?;
            writeln!(handle).context("Failed to write to stdout")?;
            handle.flush().context("Failed to flush stdout")?;
        }
        OutputFormat::Png => {
            ensure_dir(&output.dir)?;
            for (name, chart) in view.charts() {
                let path = output.dir.join(format!("{}_{}.png", view.name(), name));
                let mut slot = ChartSlot::new(PngSurface::new(
                    path,
                    output.render.width,
                    output.render.height,
                ));
                slot.replace(chart)?;
                if let Some(path) = slot.detach() {
                    info!("Wrote {}", path.display());
                }
            }
        }
    }
    Ok(())
}

fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))
}

fn play_race(
    table: &SnapshotTable,
    start: Option<i32>,
    interval: Duration,
    output: &Output,
) -> Result<()> {
    let mut playback = Playback::new(table.range());
    if let Some(year) = start {
        playback.seek(year);
    }
    playback.play();

    match output.format {
        OutputFormat::Json => {
            let mut slot = ChartSlot::new(JsonSurface::new(io::stdout()));
            drive(table, playback, interval, &mut slot)
        }
        OutputFormat::Png => {
            ensure_dir(&output.dir)?;
            let mut slot = ChartSlot::new(PngSurface::new(
                output.dir.join("race_frame.png"),
                output.render.width,
                output.render.height,
            ));
            drive(table, playback, interval, &mut slot)?;
            if let Some(path) = slot.detach() {
                info!("Wrote {}", path.display());
            }
            Ok(())
        }
    }
}

/// Show the current frame, then one frame per tick until playback ends
fn drive<S: ChartSurface>(
    table: &SnapshotTable,
    mut playback: Playback,
    interval: Duration,
    slot: &mut ChartSlot<S>,
) -> Result<()> {
    slot.replace(&table.frame_chart(playback.cursor()))?;

    let (tx, rx) = mpsc::channel();
    let mut ticker = Ticker::new();
    ticker.start(interval, move || match playback.tick() {
        Some(year) if tx.send(year).is_ok() => ControlFlow::Continue(()),
        _ => ControlFlow::Break(()),
    });

    for year in rx {
        debug!("Race frame {}", year);
        slot.replace(&table.frame_chart(year))?;
    }
    ticker.stop();
    Ok(())
}
