//! tabs-hist-export - command line front end.
//!
//! `export` is the trigger; `options`, `log` and `data` are the options
//! surface the extension would otherwise show.

use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use tabs_hist_export::driver::DEFAULT_PORT;
use tabs_hist_export::export::OPTIONS_VISIT_REMINDER;
use tabs_hist_export::storage::{
    self, EXPORT_DATA_KEY, HAS_VISITED_OPTIONS_KEY, LOGS_KEY, OPTIONS_KEY,
};
use tabs_hist_export::{
    Delivery, DirectorySink, Driver, Exporter, JsonFileStore, RunOptions, RunOutcome,
};

/// Export the back/forward history of every open Firefox tab as JSON
#[derive(Parser, Debug)]
#[command(name = "tabs-hist-export")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port the companion extension connects to
    #[arg(long, global = true, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Seconds to wait for the extension to connect
    #[arg(long, global = true, default_value_t = 120)]
    connect_timeout: u64,

    /// Settings file (defaults to the user config directory)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Directory the export file is written to (defaults to Downloads)
    #[arg(long, global = true)]
    download_dir: Option<PathBuf>,

    /// Keep the export in the settings file instead of writing a file
    #[arg(long, global = true)]
    no_download: bool,

    /// Enable debug output
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one export over the connected browser's tabs
    Export,

    /// Show or edit the run options
    Options {
        #[command(subcommand)]
        action: Option<OptionsAction>,
    },

    /// Print the log of the last run (recorded when `debug` is on)
    Log,

    /// Print or save the data of the last export
    Data {
        /// Write to this file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum OptionsAction {
    /// Print the current options
    Show,
    /// Set one option, e.g. `set pageLoadTime 2000`
    Set {
        /// Option name (debug, prettyJson, currentWinOnly, earlyBreak, dryRun, pageLoadTime, loadTimeout)
        key: String,
        /// New value
        value: String,
    },
    /// Restore the defaults
    Reset,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let settings = match args.settings.clone() {
        Some(path) => path,
        None => default_settings_path()?,
    };
    let store = JsonFileStore::new(settings);

    match args.command {
        Command::Export => {
            export(
                store,
                args.port,
                Duration::from_secs(args.connect_timeout),
                sink(args.download_dir, args.no_download),
            )
            .await
        }
        Command::Options { action } => options(&store, action).await,
        Command::Log => {
            let log: Vec<String> = storage::load(&store, LOGS_KEY, Vec::new()).await?.value;
            for line in log {
                println!("{line}");
            }
            Ok(())
        }
        Command::Data { output } => data(&store, output).await,
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "tabs_hist_export=debug"
    } else {
        "tabs_hist_export=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn default_settings_path() -> anyhow::Result<PathBuf> {
    let Some(dir) = dirs::config_dir() else {
        bail!("cannot determine the config directory, pass --settings");
    };
    Ok(dir.join("tabs-hist-export").join("settings.json"))
}

fn sink(download_dir: Option<PathBuf>, no_download: bool) -> DirectorySink {
    match (no_download, download_dir) {
        (true, _) => DirectorySink::unavailable(),
        (false, Some(dir)) => DirectorySink::new(dir),
        (false, None) => DirectorySink::downloads(),
    }
}

async fn export(
    store: JsonFileStore,
    port: u16,
    connect_timeout: Duration,
    sink: DirectorySink,
) -> anyhow::Result<()> {
    let driver = Driver::builder()
        .ip(IpAddr::V4(Ipv4Addr::LOCALHOST))
        .port(port)
        .connect_timeout(connect_timeout)
        .build()
        .await
        .with_context(|| format!("cannot listen on port {port}"))?;
    eprintln!("Waiting for the extension on {}", driver.ws_url());

    let browser = driver.connect().await?;
    let status = browser
        .status()
        .await
        .context("extension connected but does not answer commands")?;
    debug!(%status, "Extension status");

    let exporter = Exporter::new(browser.clone(), store, browser.clone(), sink);

    // Run failures were already shown as notifications and logged.
    match exporter.run().await {
        Ok(RunOutcome::Skipped) => eprintln!("{OPTIONS_VISIT_REMINDER}"),
        Ok(RunOutcome::Exported(report)) => match report.delivery {
            Delivery::Written(path) => {
                info!(tabs = report.dataset.len(), "Export finished");
                println!("{}", path.display());
            }
            Delivery::Unavailable => {
                info!(tabs = report.dataset.len(), "Export stored");
                eprintln!("Export stored in settings, use `tabs-hist-export data` to retrieve it");
            }
        },
        Err(e) => error!(error = %e, "Export failed"),
    }

    browser.close();
    Ok(())
}

async fn options(store: &JsonFileStore, action: Option<OptionsAction>) -> anyhow::Result<()> {
    storage::save(store, HAS_VISITED_OPTIONS_KEY, &true).await?;

    let mut options = storage::load(store, OPTIONS_KEY, RunOptions::default())
        .await?
        .value;

    match action.unwrap_or(OptionsAction::Show) {
        OptionsAction::Show => {}
        OptionsAction::Set { key, value } => options.set(&key, &value)?,
        OptionsAction::Reset => options = RunOptions::default(),
    }

    storage::save(store, OPTIONS_KEY, &options).await?;
    println!("{options}");
    Ok(())
}

async fn data(store: &JsonFileStore, output: Option<PathBuf>) -> anyhow::Result<()> {
    let loaded = storage::load(store, EXPORT_DATA_KEY, String::new()).await?;
    if !loaded.found {
        bail!("no export data stored yet, run `tabs-hist-export export` first");
    }

    match output {
        Some(path) => {
            tokio::fs::write(&path, &loaded.value)
                .await
                .with_context(|| format!("cannot write {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => println!("{}", loaded.value),
    }
    Ok(())
}
