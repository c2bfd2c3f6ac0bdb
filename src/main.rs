use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::{collections::HashMap, io, path::PathBuf};
use travel_emissions::sdk::{
    airports::{
        disambiguate::parse_preset, Disambiguator, FirstCandidate, PresetChoices,
        PromptDisambiguator, RefuseAmbiguity,
    },
    config::RunConfig,
    pipeline,
    util::log::init_logging,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum AmbiguityPolicy {
    /// Ask on the terminal
    Prompt,
    /// Take the lowest reference row
    First,
    /// Stop the run
    Fail,
}

/// Resolve travel-log airports and total the CO2 of the flights
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Travel log CSV with Origination and Destination columns [env: TRAVEL_FILE]
    #[arg(short, long)]
    travel: Option<PathBuf>,

    /// Airport reference CSV [env: AIRPORT_CODES_FILE, default: airport_codes.csv]
    #[arg(short, long)]
    reference: Option<PathBuf>,

    /// Working airport CSV, created if absent
    /// [env: WORKING_AIRPORTS_FILE, default: modified_air_codes.csv]
    #[arg(short, long)]
    working: Option<PathBuf>,

    /// Write a JSON report here [env: EMISSIONS_REPORT_FILE]
    #[arg(long)]
    report: Option<PathBuf>,

    /// What to do when a code matches several reference airports
    #[arg(long, value_enum, default_value_t = AmbiguityPolicy::Prompt)]
    ambiguity: AmbiguityPolicy,

    /// Fixed decision for an ambiguous code, as CODE=ROW (repeatable)
    #[arg(long = "choose", value_name = "CODE=ROW", value_parser = parse_preset)]
    choices: Vec<(String, usize)>,

    /// Do not rewrite the working file
    #[arg(long)]
    dry_run: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn into_config(self) -> (RunConfig, Box<dyn Disambiguator>) {
        let mut config = RunConfig::from_env();
        if let Some(path) = self.travel {
            config.travel_path = Some(path);
        }
        if let Some(path) = self.reference {
            config.reference_path = path;
        }
        if let Some(path) = self.working {
            config.working_path = path;
        }
        if let Some(path) = self.report {
            config.report_path = Some(path);
        }
        config.dry_run = self.dry_run;

        let fallback: Box<dyn Disambiguator> = match self.ambiguity {
            AmbiguityPolicy::Prompt => Box::new(PromptDisambiguator::new(
                io::stdin().lock(),
                io::stderr(),
            )),
            AmbiguityPolicy::First => Box::new(FirstCandidate),
            AmbiguityPolicy::Fail => Box::new(RefuseAmbiguity),
        };
        let choices: HashMap<String, usize> = self.choices.into_iter().collect();
        let disambiguator: Box<dyn Disambiguator> =
            Box::new(PresetChoices::new(choices, fallback));
        (config, disambiguator)
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- 1. Argument Parsing with Clap ---
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // --- 2. Configuration and Ambiguity Policy ---
    let (config, mut disambiguator) = cli.into_config();
    log::debug!("Run configuration: {:?}", config);

    // --- 3. Reconcile and Compute Emissions ---
    let outcome = pipeline::run(&config, disambiguator.as_mut()).with_context(|| {
        format!(
            "Emissions run against {} failed",
            config.working_path.display()
        )
    })?;

    // --- 4. Output Results ---
    let report = &outcome.report;
    println!(
        "Flights counted: {} of {}",
        report.flights.len(),
        report.flights_in_log
    );
    println!(
        "Total CO2: {:.2} kg ({:.3} t)",
        report.total_kg_co2, report.total_tons_co2
    );
    println!(
        "Working airports: {} ({} added)",
        outcome.working_len,
        outcome.added.len()
    );
    if !report.unresolved_identifiers.is_empty() {
        println!(
            "Could not resolve: {}",
            report.unresolved_identifiers.join(", ")
        );
    }

    Ok(())
}
