//! Energy Scenario Simulator
//!
//! Evaluate nuclear and energy-mix policy scenarios from the command line.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rusqlite::Connection;
use tracing_subscriber::EnvFilter;

use energy_scenario::calculator::{self, ModelProfile};
use energy_scenario::models::{
    AgeGroup, EnergyMix, InputOverrides, OpinionChange, Support, SurveyResponse,
};
use energy_scenario::presets::ScenarioPreset;
use energy_scenario::{chart, db, reference, survey};

const CHART_WIDTH: usize = 40;
const NO_RESPONSES: &str =
    "No responses in database. Run 'survey load-sample' or 'survey record' first.";

#[derive(Parser)]
#[command(name = "energy-scenario")]
#[command(about = "Energy and nuclear policy scenario simulator")]
struct Cli {
    /// Path to the SQLite survey database
    #[arg(short, long, env = "ENERGY_SCENARIO_DB", default_value = "survey.db", global = true)]
    database: PathBuf,

    /// Log filter used when RUST_LOG is not set (e.g. "debug")
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a scenario from a preset plus any overrides
    Simulate {
        /// Starting preset (custom, green-city, rapid-growth, drought-region)
        #[arg(short, long, default_value = "custom")]
        preset: ScenarioPreset,

        /// Government R&D funding in $B (0-100)
        #[arg(long)]
        funding: Option<f64>,

        /// Oversight strictness (0-10)
        #[arg(long)]
        regulation: Option<f64>,

        /// Number of reactors (0-200)
        #[arg(long)]
        reactors: Option<f64>,

        /// Green energy investment in % (0-100)
        #[arg(long)]
        green_pct: Option<f64>,

        /// Water withdrawal in % (0-100)
        #[arg(long)]
        water_pct: Option<f64>,

        /// Population growth rate in %/year (0.0-5.0)
        #[arg(long)]
        pop_growth: Option<f64>,

        /// Energy mix, e.g. "nuclear=40,solar=20,wind=25" (hydro takes the rest)
        #[arg(short, long)]
        mix: Option<EnergyMix>,

        /// Coefficient set: standard or normalized
        #[arg(long, default_value = "standard")]
        profile: ModelProfile,

        /// Clamp out-of-range inputs instead of rejecting them
        #[arg(long)]
        clamp: bool,

        /// Include the supply/demand energy flow
        #[arg(short, long)]
        flow: bool,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Evaluate every preset side by side
    Compare {
        #[arg(long, default_value = "standard")]
        profile: ModelProfile,

        #[arg(long)]
        json: bool,
    },

    /// List the built-in presets
    Presets,

    /// Show reference facts and per-source figures
    Facts,

    /// Manage stored survey responses
    Survey {
        #[command(subcommand)]
        action: SurveyCommand,
    },
}

#[derive(Subcommand)]
enum SurveyCommand {
    /// Initialize empty database with schema
    Init,

    /// Replace stored responses with the fixed-seed sample dataset
    LoadSample {
        #[arg(short, long, default_value_t = survey::SAMPLE_SIZE)]
        count: usize,

        #[arg(short, long, default_value_t = survey::SAMPLE_SEED)]
        seed: u64,
    },

    /// Record one response
    Record {
        /// 18-29, 30-49 or 50+
        #[arg(long)]
        age: AgeGroup,

        /// Yes, No or Unsure
        #[arg(long)]
        support: Support,

        /// more-favorable, no-change or more-skeptical
        #[arg(long)]
        change: OpinionChange,
    },

    /// Show the first stored responses
    Show {
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Bar chart of support answers
    Tally,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match cli.command {
        Commands::Simulate {
            preset,
            funding,
            regulation,
            reactors,
            green_pct,
            water_pct,
            pop_growth,
            mix,
            profile,
            clamp,
            flow,
            json,
        } => {
            let inputs = preset
                .inputs()
                .with_overrides(InputOverrides {
                    funding,
                    regulation,
                    reactors,
                    green_pct,
                    water_pct,
                    pop_growth,
                    mix,
                })
                .bounded(clamp)?;

            let summary = calculator::summarize(preset.name(), inputs, profile.constants(), flow);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{}", summary);
            }
        }

        Commands::Compare { profile, json } => {
            let constants = profile.constants();
            let summaries: Vec<_> = ScenarioPreset::ALL
                .iter()
                .map(|p| calculator::summarize(p.name(), p.inputs(), constants, true))
                .collect();

            if json {
                println!("{}", serde_json::to_string_pretty(&summaries)?);
                return Ok(());
            }

            println!(
                "{:<16} {:>10} {:>8} {:>10} {:>10} {:>10}",
                "Scenario", "CO2 (Mt)", "Risk", "Output", "Demand", "Biodiv %"
            );
            println!("{}", "-".repeat(69));
            for s in &summaries {
                let o = &s.outputs;
                println!(
                    "{:<16} {:>10.1} {:>8.1} {:>10.1} {:>10.0} {:>10.1}",
                    s.scenario,
                    o.co2_avoided,
                    o.risk_index,
                    o.energy_output,
                    o.projected_demand,
                    o.biodiversity_impact
                );
            }
            println!();

            let groups: Vec<(String, Vec<f64>)> = summaries
                .iter()
                .map(|s| {
                    (
                        s.scenario.clone(),
                        vec![s.outputs.co2_avoided, s.outputs.energy_output],
                    )
                })
                .collect();
            let series = ["CO2 Avoided (Mt)", "Energy Output (TWh)"];
            print!("{}", chart::grouped_bars(&groups, &series, CHART_WIDTH));
        }

        Commands::Presets => {
            println!(
                "{:<16} {:>8} {:>10} {:>9} {:>7} {:>7} {:>7}",
                "Preset", "Funding", "Regulation", "Reactors", "Green%", "Water%", "Growth"
            );
            println!("{}", "-".repeat(71));
            for preset in ScenarioPreset::ALL {
                let i = preset.inputs();
                println!(
                    "{:<16} {:>8} {:>10} {:>9} {:>7} {:>7} {:>7.1}",
                    preset.name(),
                    i.funding,
                    i.regulation,
                    i.reactors,
                    i.green_pct,
                    i.water_pct,
                    i.pop_growth
                );
            }
        }

        Commands::Facts => {
            println!("Nuclear facts:");
            for fact in reference::FACTS {
                println!("  {:<38} {:<22} ({})", fact.label, fact.value, fact.source);
            }
            println!();

            println!("{:<10} {:>18} {:>22}", "Source", "Capacity factor %", "CO2 g/kWh");
            println!("{}", "-".repeat(52));
            for m in reference::SOURCE_METRICS {
                println!("{:<10} {:>18.1} {:>22.0}", m.source, m.capacity_factor, m.co2_intensity);
            }
            println!();

            let groups: Vec<(String, Vec<f64>)> = reference::SOURCE_METRICS
                .iter()
                .map(|m| (m.source.to_string(), vec![m.capacity_factor, m.co2_intensity]))
                .collect();
            let series = ["Capacity factor (%)", "CO2 intensity (g/kWh)"];
            print!("{}", chart::grouped_bars(&groups, &series, CHART_WIDTH));
        }

        Commands::Survey { action } => run_survey(&cli.database, action)?,
    }

    Ok(())
}

fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_survey(database: &Path, action: SurveyCommand) -> Result<()> {
    let mut conn = Connection::open(database)
        .with_context(|| format!("Failed to open {}", database.display()))?;
    db::init_schema(&conn)?;

    match action {
        SurveyCommand::Init => {
            println!("Database initialized at: {}", database.display());
        }

        SurveyCommand::LoadSample { count, seed } => {
            let sample = survey::generate_sample(count, seed)?;
            db::clear_responses(&conn)?;
            db::insert_responses(&mut conn, &sample)?;

            println!("Loaded {} sample responses (seed {})", sample.len(), seed);
            for (answer, n) in survey::tally(&sample) {
                println!("  {:<7} {}", answer, n);
            }
        }

        SurveyCommand::Record { age, support, change } => {
            db::insert_response(
                &conn,
                &SurveyResponse {
                    age_group: age,
                    support,
                    change,
                },
            )?;
            println!("Recorded response ({} total)", db::count_responses(&conn)?);
        }

        SurveyCommand::Show { limit } => {
            let rows = db::list_responses(&conn, limit)?;
            if rows.is_empty() {
                println!("{}", NO_RESPONSES);
            } else {
                println!("{:<8} {:<8} {:<16}", "Age", "Support", "Change");
                println!("{}", "-".repeat(34));
                for r in rows {
                    println!("{:<8} {:<8} {:<16}", r.age_group, r.support, r.change);
                }
            }
        }

        SurveyCommand::Tally => {
            let counts = db::count_by_support(&conn)?;
            if counts.is_empty() {
                println!("{}", NO_RESPONSES);
            } else {
                let rows: Vec<(String, f64)> =
                    counts.into_iter().map(|(label, n)| (label, n as f64)).collect();
                print!("{}", chart::bars(&rows, CHART_WIDTH));
            }
        }
    }

    Ok(())
}
