//! Command-line front end: rank catalog use-cases against a notes file.
//!
//! ```text
//! engagement-journey [--domain <NAME>]... [--summarize] [NOTES_FILE]
//! ```
//!
//! Notes are read from stdin when no file is given. `--summarize` also asks
//! the configured AI provider for a short summary of the notes.

use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tokio::io::AsyncReadExt;
use tracing::{error, info};

use engagement_journey::adapters::ai::provider_from_config;
use engagement_journey::adapters::catalog::{StaticUseCaseLibrary, YamlUseCaseLibrary};
use engagement_journey::config::AppConfig;
use engagement_journey::domain::catalog::{CandidatePool, UseCase};
use engagement_journey::domain::recommendation::{
    Recommendation, RecommendationEngine, RecommendationLimits,
};
use engagement_journey::ports::{RequestMetadata, UseCaseLibrary};
use engagement_journey::telemetry::init_tracing;

#[derive(Debug, Parser)]
#[command(name = "engagement-journey")]
#[command(about = "Rank catalog use-cases against engagement notes")]
#[command(long_about = None)]
struct Args {
    /// Prioritized domain (repeatable, ranked in the order given)
    #[arg(short, long)]
    domain: Vec<String>,

    /// Also summarize the notes with the configured AI provider
    #[arg(short, long)]
    summarize: bool,

    /// Notes file (stdin when omitted)
    notes_file: Option<PathBuf>,
}

/// Ranks the catalog after collapsing repeated use-case ids.
fn rank(
    library: Vec<UseCase>,
    notes: &str,
    domains: &[String],
    limits: RecommendationLimits,
) -> Vec<Recommendation> {
    let pool = CandidatePool::merge(library, Vec::new());
    RecommendationEngine::new(limits).recommend(notes, domains, pool.items())
}

async fn read_notes(path: Option<&Path>) -> std::io::Result<String> {
    match path {
        Some(path) => tokio::fs::read_to_string(path).await,
        None => {
            let mut text = String::new();
            tokio::io::stdin().read_to_string(&mut text).await?;
            Ok(text)
        }
    }
}

async fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    config.validate()?;
    init_tracing(&config.logging);

    let library = match &config.catalog.library_path {
        Some(path) => YamlUseCaseLibrary::new(path).list().await?,
        None => StaticUseCaseLibrary::built_in()?.list().await?,
    };
    let notes = read_notes(args.notes_file.as_deref()).await?;
    info!(use_cases = library.len(), domains = ?args.domain, "Ranking catalog");

    let recommendations = rank(library, &notes, &args.domain, config.recommendation.limits());

    if recommendations.is_empty() {
        println!("No recommendations: the notes contain no significant terms.");
    }
    for (position, rec) in recommendations.iter().enumerate() {
        println!(
            "{:>2}. [{}] {} ({}) score {}",
            position + 1,
            rec.domain,
            rec.use_case_title,
            rec.use_case_id,
            rec.score
        );
        println!("    {}", rec.explanation);
    }

    if args.summarize {
        let provider = provider_from_config(&config.ai)?;
        let provider_info = provider.provider_info();
        info!(provider = %provider_info.name, model = %provider_info.model, "Summarizing notes");
        let summary = provider
            .summarize(&notes, RequestMetadata::new("cli_summarize"))
            .await?;
        println!("\nSummary: {}", summary.summary);
        for point in &summary.key_points {
            println!("  - {}", point);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "engagement-journey failed");
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engagement_journey::adapters::catalog::parse_library;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("engagement-journey").chain(args.iter().copied()))
    }

    #[test]
    fn collects_repeated_domains_and_file() {
        let args = parse(&["--domain", "Finance", "notes.txt", "-d", "Sales", "--summarize"]).unwrap();
        assert_eq!(args.domain, vec!["Finance", "Sales"]);
        assert!(args.summarize);
        assert_eq!(args.notes_file, Some(PathBuf::from("notes.txt")));
    }

    #[test]
    fn help_is_reported_as_display_help() {
        let err = parse(&["--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse(&["--domain"]).is_err());
        assert!(parse(&["--verbose"]).is_err());
        assert!(parse(&["a.txt", "b.txt"]).is_err());
    }

    #[test]
    fn repeated_catalog_ids_rank_once() {
        let library = parse_library(
            r#"
use_cases:
  - id: fin-1
    title: Invoice automation
    domain: Finance
  - id: fin-1
    title: Invoice automation duplicate
    domain: Finance
  - id: fin-2
    title: Budget forecasting
    domain: Finance
"#,
        )
        .unwrap();

        let ranked = rank(library, "invoice automation", &[], RecommendationLimits::default());

        let ids: Vec<&str> = ranked.iter().map(|r| r.use_case_id.as_str()).collect();
        assert_eq!(ids, vec!["fin-1", "fin-2"]);
        assert_eq!(ranked[0].use_case_title, "Invoice automation");
    }
}
