//! CLI command definitions, routing, and tracing setup.

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use brandpitch_brand::{BrandResolver, normalize_domain};
use brandpitch_core::{Catalog, Pipeline, ProgressReporter, journey};
use brandpitch_shared::{
    AppConfig, BrandPitchError, BrandProfile, ContentRecord, IndustryDetermination, init_config,
    load_config,
};
use clap::{Parser, Subcommand};
use color_eyre::Section;
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// BrandPitch: turn a brand domain into a multi-channel marketing pitch.
#[derive(Parser)]
#[command(
    name = "brandpitch",
    version,
    about = "Look up a brand, pick its industry journey, and generate copy for every channel.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Look up brand facts for a domain.
    Lookup {
        /// Domain or URL, e.g. uniqlo.com.
        domain: String,
    },

    /// Classify a brand into a catalog industry.
    Classify {
        /// Brand name.
        #[arg(long)]
        name: String,

        /// Brand description.
        #[arg(long)]
        description: String,
    },

    /// Run the full pipeline and print the content record.
    Generate {
        /// Domain or URL. Optional when --name and --description are given.
        #[arg(required_unless_present_all = ["name", "description"])]
        domain: Option<String>,

        /// Brand name, skipping the provider lookup.
        #[arg(long, requires = "description")]
        name: Option<String>,

        /// Brand description, skipping the provider lookup.
        #[arg(long, requires = "name")]
        description: Option<String>,

        /// Catalog industry, skipping classification.
        #[arg(long)]
        industry: Option<String>,

        /// Write the record to this file instead of stdout.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Inspect the industry catalog.
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Catalog subcommands.
#[derive(Subcommand)]
pub(crate) enum CatalogAction {
    /// List every industry with its use case and channels.
    List,
    /// Show one template and its expanded channel plan.
    Show {
        /// Exact industry name.
        name: String,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr so stdout carries
/// only JSON output.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "brandpitch=info",
        1 => "brandpitch=debug",
        _ => "brandpitch=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Lookup { domain } => cmd_lookup(&domain).await,
        Command::Classify { name, description } => cmd_classify(&name, &description).await,
        Command::Generate {
            domain,
            name,
            description,
            industry,
            out,
        } => {
            let manual = name.zip(description);
            cmd_generate(domain.as_deref(), manual, industry.as_deref(), out).await
        }
        Command::Catalog { action } => match action {
            CatalogAction::List => cmd_catalog_list(),
            CatalogAction::Show { name } => cmd_catalog_show(&name),
        },
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

/// Race `fut` against Ctrl-C. Dropping the pipeline future aborts its
/// in-flight request.
async fn cancellable<T>(fut: impl Future<Output = brandpitch_shared::Result<T>>) -> Result<T> {
    tokio::select! {
        result = fut => result.map_err(with_hint),
        _ = tokio::signal::ctrl_c() => Err(eyre!("cancelled")),
    }
}

/// Recovery suggestion for an error, following its taxonomy class.
fn hint_for(err: &BrandPitchError) -> &'static str {
    if err.offers_manual_entry() {
        "retry, or enter the brand by hand: brandpitch generate --name <NAME> --description <TEXT>"
    } else if err.is_recoverable() {
        "retry the command"
    } else {
        "check ~/.brandpitch/brandpitch.toml and your API key environment variables"
    }
}

fn with_hint(err: BrandPitchError) -> color_eyre::Report {
    let hint = hint_for(&err);
    color_eyre::Report::new(err).suggestion(hint)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_lookup(domain: &str) -> Result<()> {
    let config = load_config()?;
    let resolver = BrandResolver::from_config(&config.brandfetch).map_err(with_hint)?;

    let reporter = CliProgress::new();
    reporter.phase("Looking up brand");
    let result = cancellable(resolver.resolve(domain)).await;
    reporter.finish();

    print_json(&result?)
}

async fn cmd_classify(name: &str, description: &str) -> Result<()> {
    let config = load_config()?;
    let pipeline = Pipeline::from_config(&config).map_err(with_hint)?;

    let reporter = CliProgress::new();
    reporter.phase("Classifying industry");
    let result = cancellable(pipeline.classify_industry(name, description)).await;
    reporter.finish();

    print_json(&result?)
}

async fn cmd_generate(
    domain: Option<&str>,
    manual: Option<(String, String)>,
    industry: Option<&str>,
    out: Option<PathBuf>,
) -> Result<()> {
    let config: AppConfig = load_config()?;
    let pipeline = Pipeline::from_config(&config).map_err(with_hint)?;

    if let Some(industry) = industry {
        if pipeline.catalog().get(industry).is_none() {
            return Err(eyre!("unknown industry '{industry}'"))
                .suggestion("run `brandpitch catalog list` for valid names");
        }
    }

    let reporter = CliProgress::new();

    let result = match (manual, domain) {
        (Some((name, description)), domain) => {
            let mut brand = BrandProfile::manual(name, description);
            if let Some(domain) = domain {
                brand.domain = normalize_domain(domain);
            }
            info!(brand = %brand.name, "using manually entered brand");
            cancellable(pipeline.run_for_brand(brand, industry, &reporter)).await
        }
        (None, Some(domain)) => {
            let resolver = BrandResolver::from_config(&config.brandfetch).map_err(with_hint)?;
            let pipeline = pipeline.with_resolver(resolver);
            match industry {
                None => cancellable(pipeline.run(domain, &reporter)).await,
                Some(industry) => {
                    reporter.phase("Looking up brand");
                    match cancellable(pipeline.lookup_brand(domain)).await {
                        Ok(brand) => {
                            reporter.brand_resolved(&brand);
                            cancellable(pipeline.run_for_brand(brand, Some(industry), &reporter))
                                .await
                        }
                        Err(e) => Err(e),
                    }
                }
            }
        }
        (None, None) => Err(eyre!("a domain or --name/--description is required")),
    };
    reporter.finish();
    let record = result?;

    match out {
        Some(path) => {
            let json = serde_json::to_string_pretty(&record)?;
            std::fs::write(&path, json)
                .map_err(|e| eyre!("failed to write {}: {e}", path.display()))?;
            print_summary(&record);
            println!("  Record: {}", path.display());
            println!();
        }
        None => print_json(&record)?,
    }

    Ok(())
}

fn print_summary(record: &ContentRecord) {
    let channels: Vec<&str> = record
        .plan
        .channel_order
        .iter()
        .map(|key| key.label())
        .collect();

    println!();
    println!("  Pitch generated!");
    println!("  Run:      {}", record.run_id);
    println!("  Brand:    {}", record.brand.name);
    println!("  Industry: {}", record.industry);
    println!("  Journey:  {}", channels.join(" → "));
}

fn cmd_catalog_list() -> Result<()> {
    let config = load_config()?;
    let catalog = Catalog::from_config(&config.catalog)?;

    println!("Catalog v{} ({} industries)", catalog.version, catalog.len());
    for template in catalog.templates() {
        let labels: Vec<&str> = template.steps.iter().map(|(label, _)| label).collect();
        println!();
        println!("  {}", template.name);
        println!("    Use case: {}", template.use_case);
        println!("    Journey:  {}", labels.join(" → "));
    }
    Ok(())
}

fn cmd_catalog_show(name: &str) -> Result<()> {
    let config = load_config()?;
    let catalog = Catalog::from_config(&config.catalog)?;

    let template = catalog
        .get(name)
        .ok_or_else(|| eyre!("unknown industry '{name}'"))
        .suggestion("names are case-sensitive; run `brandpitch catalog list`")?;

    print_json(&serde_json::json!({
        "template": template,
        "plan": journey::expand(name, &catalog),
    }))
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner on stderr.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(Duration::from_millis(80));
        Self { spinner }
    }

    fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn brand_resolved(&self, brand: &BrandProfile) {
        self.spinner
            .println(format!("  Brand:    {} ({})", brand.name, brand.domain));
    }

    fn classified(&self, determination: &IndustryDetermination) {
        self.spinner.println(format!(
            "  Industry: {} / {} ({:.2})",
            determination.industry, determination.use_case, determination.confidence
        ));
    }

    fn done(&self, _record: &ContentRecord) {
        self.spinner.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> std::result::Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("brandpitch").chain(args.iter().copied()))
    }

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn generate_with_domain() {
        let cli = parse(&["generate", "uniqlo.com", "--out", "pitch.json"]).unwrap();
        match cli.command {
            Command::Generate {
                domain, name, out, ..
            } => {
                assert_eq!(domain.as_deref(), Some("uniqlo.com"));
                assert!(name.is_none());
                assert_eq!(out, Some(PathBuf::from("pitch.json")));
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn generate_with_manual_brand_needs_no_domain() {
        let cli = parse(&[
            "generate",
            "--name",
            "Riverside Bistro",
            "--description",
            "Neighbourhood restaurant",
            "--industry",
            "Quick Service Restaurants",
        ])
        .unwrap();
        match cli.command {
            Command::Generate {
                domain,
                name,
                description,
                industry,
                ..
            } => {
                assert!(domain.is_none());
                assert_eq!(name.as_deref(), Some("Riverside Bistro"));
                assert_eq!(description.as_deref(), Some("Neighbourhood restaurant"));
                assert_eq!(industry.as_deref(), Some("Quick Service Restaurants"));
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn generate_requires_domain_or_manual_brand() {
        assert!(parse(&["generate"]).is_err());
        assert!(parse(&["generate", "--name", "Acme"]).is_err());
    }

    #[test]
    fn classify_requires_both_fields() {
        assert!(parse(&["classify", "--name", "Acme"]).is_err());
        assert!(parse(&["classify", "--name", "Acme", "--description", "Widgets"]).is_ok());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = parse(&["catalog", "list", "-vv", "--log-format", "json"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.log_format, LogFormat::Json);
    }

    #[test]
    fn hints_follow_error_class() {
        assert!(hint_for(&BrandPitchError::not_found("nope.example")).contains("--name"));
        assert!(hint_for(&BrandPitchError::Classification("bad json".into())).contains("--name"));
        assert_eq!(
            hint_for(&BrandPitchError::Generation("timeout".into())),
            "retry the command"
        );
        assert!(hint_for(&BrandPitchError::config("API key not found")).contains("brandpitch.toml"));
        assert!(hint_for(&BrandPitchError::Auth("HTTP 401".into())).contains("API key"));
    }
}
