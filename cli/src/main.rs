//! wardbook: patient visit and clinical note records from the command line.
//!
//! Every invocation logs in, runs one command through the role-gated
//! session, and logs out.
//!
//! Usage:
//!   wardbook -u alice -p secret count-visits 2024-05-18
//!   wardbook -u alice -p secret retrieve-patient P1 --out output/P1.txt
//!   wardbook -u bob -p secret generate-statistics --days 30

use std::path::PathBuf;

use chrono::Local;
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use wardbook_audit::CsvUsageLog;
use wardbook_contracts::{
    action::Action,
    error::{WardError, WardResult},
    record::Demographics,
};
use wardbook_core::{AppConfig, Session};
use wardbook_policy::{CredentialStore, RoleTable};
use wardbook_records::RecordStore;
use wardbook_stats::{render_chart, VisitStatistics};

// ── CLI definition ────────────────────────────────────────────────────────────

/// Hospital patient visit and clinical note record manager.
#[derive(Parser)]
#[command(
    name = "wardbook",
    about = "Hospital patient visit and clinical note record manager",
    long_about = "Loads patient visits and clinical notes from CSV, checks the user's role\n\
                  before every action, and records each action in the usage log."
)]
struct Cli {
    /// Configuration file. Defaults are used when it does not exist.
    #[arg(long, default_value = "wardbook.toml")]
    config: PathBuf,

    #[arg(short, long)]
    username: String,

    #[arg(short, long)]
    password: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Count visits on a date (YYYY-MM-DD, MM/DD/YYYY, YYYY/MM/DD or MM-DD-YYYY).
    CountVisits { date: String },
    /// Record a new visit, creating the patient if needed.
    AddVisit(AddVisitArgs),
    /// Remove a patient and all of their rows from the patient file.
    RemovePatient { patient_id: String },
    /// Show a patient's visits and notes.
    RetrievePatient {
        patient_id: String,
        /// Write the record to this file instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Show a patient's notes for the visits on a date.
    ViewNote { patient_id: String, date: String },
    /// Tally visits and render the statistics chart.
    GenerateStatistics {
        /// Only count visit dates within this many trailing days.
        #[arg(long)]
        days: Option<u32>,
        /// Print the tallies as JSON instead of rendering the chart.
        #[arg(long)]
        json: bool,
    },
    /// List the actions available to the logged-in role.
    Permissions,
}

#[derive(Args)]
struct AddVisitArgs {
    patient_id: String,
    #[arg(long)]
    date: String,
    #[arg(long)]
    department: String,
    #[arg(long)]
    gender: String,
    #[arg(long)]
    race: String,
    #[arg(long)]
    age: u32,
    #[arg(long)]
    ethnicity: String,
    #[arg(long)]
    insurance: String,
    #[arg(long)]
    zip_code: String,
    #[arg(long)]
    complaint: String,
}

impl AddVisitArgs {
    fn demographics(&self) -> Demographics {
        Demographics {
            gender: self.gender.clone(),
            race: self.race.clone(),
            age: self.age,
            ethnicity: self.ethnicity.clone(),
            insurance: self.insurance.clone(),
            zip_code: self.zip_code.clone(),
            chief_complaint: self.complaint.clone(),
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("wardbook: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> WardResult<()> {
    let config = AppConfig::from_file_or_default(&cli.config)?;
    config.ensure_dirs()?;

    let policy = match &config.policy_file {
        Some(path) => RoleTable::from_file(path)?,
        None => RoleTable::builtin()?,
    };
    let credentials = CredentialStore::load(&config.credentials_path())?;
    let usage_log = CsvUsageLog::new(config.usage_log_path());

    let session = Session::login(
        &credentials,
        &cli.username,
        &cli.password,
        Box::new(policy),
        Box::new(usage_log),
    )?;

    let mut store = RecordStore::load(config.patient_path(), config.notes_path())?
        .with_note_matching(config.note_matching);
    info!(patients = store.len(), "records loaded");

    let outcome = dispatch(&session, &mut store, &config, cli.command);
    session.finish(outcome)
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn dispatch(
    session: &Session,
    store: &mut RecordStore,
    config: &AppConfig,
    command: Command,
) -> WardResult<()> {
    match command {
        Command::CountVisits { date } => {
            let n = session.perform(Action::CountVisits, || Ok(store.count_visits_on(&date)))?;
            println!("Total visits on {}: {}", date, n);
        }

        Command::AddVisit(args) => {
            let id = session.perform(Action::AddPatient, || {
                store.add_visit(&args.patient_id, &args.date, &args.department, args.demographics())
            })?;
            println!("Added visit {} for patient {}", id, args.patient_id);
        }

        Command::RemovePatient { patient_id } => {
            let removed = session.perform(Action::RemovePatient, || store.remove_patient(&patient_id))?;
            if removed {
                println!("Removed patient {}", patient_id);
            } else {
                println!("Patient {} not found", patient_id);
            }
        }

        Command::RetrievePatient { patient_id, out: Some(path) } => {
            let found = session.perform(Action::RetrievePatient, || store.export_patient(&patient_id, &path))?;
            if found {
                println!("Patient {} written to {}", patient_id, path.display());
            } else {
                println!("Patient {} not found", patient_id);
            }
        }

        Command::RetrievePatient { patient_id, out: None } => {
            let record = session.perform(Action::RetrievePatient, || Ok(store.retrieve_patient(&patient_id)))?;
            match record {
                Some(text) => println!("Patient ID: {}\n{}", patient_id, text),
                None => println!("Patient {} not found", patient_id),
            }
        }

        Command::ViewNote { patient_id, date } => {
            let notes = session.perform(Action::ViewNote, || Ok(store.view_note(&patient_id, &date)))?;
            match notes {
                Some(text) => println!("{}", text),
                None => println!("No notes for patient {} on {}", patient_id, date),
            }
        }

        Command::GenerateStatistics { days, json } => {
            let chart_path = config.chart_path();
            let stats = session.perform(Action::GenerateStatistics, || {
                let mut stats = VisitStatistics::from_store(store);
                if let Some(days) = days {
                    stats.retain_last_days(days, Local::now().naive_local());
                }
                if !json {
                    render_chart(&stats, &chart_path)?;
                }
                Ok(stats)
            })?;

            if json {
                let text = serde_json::to_string_pretty(&stats).map_err(|e| WardError::WriteFailed {
                    path: "<stdout>".to_string(),
                    reason: e.to_string(),
                })?;
                println!("{}", text);
            } else {
                println!("Statistics chart written to {}", chart_path.display());
                for (complaint, count) in stats.top_complaints(5) {
                    println!("  {:<30} {}", complaint, count);
                }
            }
        }

        Command::Permissions => {
            println!("{} ({})", session.username(), session.role());
            for action in session.allowed_actions() {
                println!("  {}", action);
            }
        }
    }
    Ok(())
}
