use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser};

use branch_diff::branch::comparator::OrderingStrategy;
use branch_diff::branch::engine::DiffConfig;
use branch_diff::branch::fetchers::RdbFetcher;
use branch_diff::branch::report::CategorySelection;
use branch_diff::compare::{self, CompareOptions};
use branch_diff::config::{self, Settings};
use branch_diff::logging;
use branch_diff::output::{self, OutputTarget};

#[derive(Parser, Debug)]
#[command(name = "branch-diff")]
#[command(
    version,
    about = "Compare binary packages of the sisyphus and p11 branches"
)]
struct Cli {
    /// Architecture (x86_64, aarch64, i586, noarch, x86_64-i586); all when omitted
    arch: Option<String>,

    /// Report packages present only in sisyphus
    #[arg(long)]
    sisyphus_only: bool,

    /// Report packages present only in p11
    #[arg(long)]
    p11_only: bool,

    /// Report packages older in sisyphus than in p11
    #[arg(long)]
    sisyphus_outdated: bool,

    /// Report packages older in p11 than in sisyphus
    #[arg(long)]
    p11_outdated: bool,

    /// Emit full package records instead of names
    #[arg(short, long)]
    detailed: bool,

    /// Compare release ordinals (alt1 < alt2) instead of versions
    #[arg(short = 'r', long)]
    use_release: bool,

    /// Report file, `-` for stdout
    #[arg(short, long, value_name = "FILE", default_value = "out.json")]
    output: PathBuf,

    /// Also dump the fetched package sets
    #[arg(long, value_name = "FILE")]
    raw_output: Option<PathBuf>,

    /// JSON settings file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the repository database API URL
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Also log to a file (defaults to the data directory)
    #[arg(long, value_name = "FILE", num_args = 0..=1)]
    log_file: Option<Option<PathBuf>>,
}

impl Cli {
    /// Enabled categories; none selected means all of them
    fn categories(&self) -> CategorySelection {
        let selection = CategorySelection {
            sisyphus_only: self.sisyphus_only,
            p11_only: self.p11_only,
            sisyphus_outdated: self.sisyphus_outdated,
            p11_outdated: self.p11_outdated,
        };
        if selection.is_empty() {
            CategorySelection::all()
        } else {
            selection
        }
    }

    fn compare_options(&self) -> CompareOptions {
        CompareOptions {
            architecture: self.arch.clone().filter(|arch| !arch.is_empty()),
            diff: DiffConfig {
                categories: self.categories(),
                detailed: self.detailed,
                strategy: if self.use_release {
                    OrderingStrategy::Release
                } else {
                    OrderingStrategy::Version
                },
            },
        }
    }

    fn settings(&self) -> anyhow::Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        if let Some(api_url) = &self.api_url {
            settings.api_url = api_url.clone();
        }
        Ok(settings)
    }

    fn log_file(&self) -> Option<PathBuf> {
        self.log_file
            .clone()
            .map(|path| path.unwrap_or_else(config::log_path))
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _guard = logging::init(cli.verbose, cli.log_file().as_deref())?;

    let settings = cli.settings()?;
    let options = cli.compare_options();
    tracing::info!(
        "Comparing {} and {} ({}, strategy: {})",
        settings.branches.sisyphus,
        settings.branches.p11,
        options.architecture.as_deref().unwrap_or("all architectures"),
        options.diff.strategy.as_str()
    );
    tracing::debug!(
        "Enabled categories: {}",
        options
            .diff
            .categories
            .enabled()
            .map(|category| category.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let fetcher = RdbFetcher::new(&settings).context("Failed to create HTTP client")?;

    let outcome = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(compare::run(&fetcher, &settings, &options));

    if let Some(raw_output) = &cli.raw_output {
        output::write_raw(
            &outcome.snapshot,
            &settings,
            &OutputTarget::from_arg(raw_output),
        )?;
    }

    output::write_report(&outcome.report, &OutputTarget::from_arg(&cli.output))?;

    Ok(())
}
