// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{ArgAction, Parser, Subcommand};
use estados_revision::{
    Config, MongoRecordClient, OfficeRegistry, OfficeReview, ReportMode, ReportWriter,
    ReviewOptions, SourceConfig, Validator,
    documents::MatchMode,
    pipeline::{needs_database, review_offices},
    utils::logging::{format_error, format_info, format_step, format_success, format_warning},
};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "estados_revision")]
#[command(version = "0.1.0")]
#[command(about = "Cross-references court case records against daily notice PDFs", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Review one office, or every office, and write the revision reports
    Run {
        #[arg(short, long, value_name = "NAME")]
        office: Option<String>,

        /// Run date used for the report name (YYYY-MM-DD, default today)
        #[arg(short, long, value_name = "DATE")]
        date: Option<String>,

        #[arg(short, long, value_enum)]
        mode: Option<ReportMode>,

        /// Lower-case and collapse whitespace before matching
        #[arg(long)]
        normalized: bool,

        /// Also write a JSON copy of the results
        #[arg(long)]
        json: bool,
    },

    /// List configured and discovered offices
    List,

    /// Validate office folders and count notice PDFs
    Check {
        #[arg(short, long, value_name = "NAME")]
        office: Option<String>,
    },

    /// List the revision reports of an office
    History {
        #[arg(short, long, value_name = "NAME")]
        office: String,
    },

    /// Print a revision report
    Show {
        #[arg(short, long, value_name = "NAME")]
        office: String,

        #[arg(short, long, value_name = "DATE")]
        date: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    estados_revision::utils::logging::init_logger(cli.color, cli.verbose);

    info!("Revisión de estados");
    info!("Loading configuration from: {}", cli.config.display());

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::load_defaults().context("Failed to load default configuration")?
    };

    match cli.command {
        Commands::Run {
            office,
            date,
            mode,
            normalized,
            json,
        } => {
            let mut options = ReviewOptions::from_config(&config);
            options.colored = cli.color;
            if let Some(mode) = mode {
                options.report_mode = mode;
            }
            if normalized {
                options.match_mode = MatchMode::Normalized;
            }
            options.write_json |= json;

            cmd_run(&config, options, office.as_deref(), date.as_deref()).await?;
        }
        Commands::List => {
            cmd_list(&config)?;
        }
        Commands::Check { office } => {
            cmd_check(&config, office.as_deref())?;
        }
        Commands::History { office } => {
            cmd_history(&config, &office)?;
        }
        Commands::Show { office, date } => {
            cmd_show(&config, &office, date.as_deref())?;
        }
    }

    Ok(())
}

fn resolve_date(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        Some(value) => Ok(Validator::parse_run_date(value)?),
        None => Ok(Local::now().date_naive()),
    }
}

async fn cmd_run(
    config: &Config,
    options: ReviewOptions,
    office: Option<&str>,
    date: Option<&str>,
) -> Result<()> {
    let start_time = Instant::now();
    let run_date = resolve_date(date)?;

    let registry = OfficeRegistry::from_config(config).context("Failed to load offices")?;
    let offices = registry.select(office)?;

    let client = if needs_database(&offices) {
        Some(
            MongoRecordClient::connect(&config.database)
                .await
                .context("Failed to connect to MongoDB")?,
        )
    } else {
        None
    };

    let outcome = review_offices(&offices, &options, client.as_ref(), run_date).await;

    if let Some(client) = client {
        client.close().await;
    }

    println!();
    for summary in &outcome.summaries {
        let line = format!(
            "{}: {}/{} encontrados ({:.1}%)",
            summary.office,
            summary.records_found,
            summary.total_records,
            summary.found_rate()
        );
        println!("{}", format_success(&line));

        match &summary.report_path {
            Some(path) => println!("  {}", format_info(&path.display().to_string())),
            None => println!("  {}", format_warning("sin resultados para escribir")),
        }
        if !summary.unreadable_files.is_empty() {
            let line = format!("no legibles: {}", summary.unreadable_files.join(", "));
            println!("  {}", format_warning(&line));
        }
    }
    for (name, err) in &outcome.failures {
        println!("{}", format_error(&format!("{}: {}", name, err)));
    }

    info!(
        "Run finished in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );

    if !outcome.is_success() {
        anyhow::bail!("{} of {} offices failed", outcome.failures.len(), offices.len());
    }

    Ok(())
}

fn cmd_list(config: &Config) -> Result<()> {
    let registry = OfficeRegistry::from_config(config).context("Failed to load offices")?;

    if registry.is_empty() {
        println!("{}", format_warning("No offices configured"));
        return Ok(());
    }

    println!("\nOffices ({})\n", registry.offices().len());
    for office in registry.offices() {
        let source = match office.source() {
            SourceConfig::Mongodb { collection } => format!(
                "mongodb:{}",
                collection.unwrap_or_else(|| office.name.clone())
            ),
            SourceConfig::Spreadsheet { path, sheet } => format!(
                "spreadsheet:{}#{}",
                path.display(),
                sheet.unwrap_or_else(|| office.name.clone())
            ),
        };
        println!("  {:<16} {}", office.name, source);
        println!("  {:<16} pdf: {}", "", office.pdf_dir.display());
        println!("  {:<16} revision: {}", "", office.revision_dir.display());
    }

    Ok(())
}

fn cmd_check(config: &Config, office: Option<&str>) -> Result<()> {
    let registry = OfficeRegistry::from_config(config).context("Failed to load offices")?;
    let offices = registry.select(office)?;
    let options = ReviewOptions::from_config(config);

    let mut failed = 0;
    for (idx, office) in offices.iter().enumerate() {
        println!("{}", format_step(idx + 1, offices.len(), &office.name));

        match OfficeReview::new((*office).clone(), options.clone()).validate_structure() {
            Ok(files) => {
                let line = format!("{} pdf files in {}", files.len(), office.pdf_dir.display());
                println!("  {}", format_success(&line));
            }
            Err(e) => {
                failed += 1;
                println!("  {}", format_error(&e.to_string()));
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} offices have an invalid structure", failed, offices.len());
    }

    Ok(())
}

fn cmd_history(config: &Config, office: &str) -> Result<()> {
    let registry = OfficeRegistry::from_config(config).context("Failed to load offices")?;
    let office = registry.get(office)?;

    let reports = ReportWriter::new(&office.revision_dir, ReportMode::default())
        .list()
        .context("Failed to list reports")?;

    if reports.is_empty() {
        println!("{}", format_info(&format!("No reports for {}", office.name)));
        return Ok(());
    }

    println!("\nReports for {} ({})\n", office.name, reports.len());
    for report in reports {
        println!("  {}", report);
    }

    Ok(())
}

fn cmd_show(config: &Config, office: &str, date: Option<&str>) -> Result<()> {
    let run_date = resolve_date(date)?;
    let registry = OfficeRegistry::from_config(config).context("Failed to load offices")?;
    let office = registry.get(office)?;

    let writer = ReportWriter::new(&office.revision_dir, ReportMode::default());
    match writer.read(run_date).context("Failed to read report")? {
        Some(content) => print!("{}", content),
        None => anyhow::bail!(
            "No report for {} on {} ({})",
            office.name,
            run_date,
            writer.report_path(run_date).display()
        ),
    }

    Ok(())
}
