//! Courtside CLI - Command-line tool for College Hoops 2K8 roster archives.
//!
//! This is the main entry point for the Courtside command-line application.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use courtside::dump::{read_team_table, write_conference_table, write_team_table, KnownStrings};
use courtside::prelude::*;

/// Courtside - College Hoops 2K8 roster editor
#[derive(Parser)]
#[command(name = "courtside")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the USERDATA roster file
    #[arg(short, long, global = true, env = "COURTSIDE_INPUT", default_value = "USERDATA")]
    input: PathBuf,

    /// Record format: base (no conferences) or extended [default: extended].
    /// Overrides the format in a --layout file when given.
    #[arg(long, global = true)]
    format: Option<RosterFormat>,

    /// JSON file with layout constants replacing the built-in ones
    #[arg(long, global = true, env = "COURTSIDE_LAYOUT")]
    layout: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List decoded teams
    Teams,

    /// List decoded conferences
    Conferences,

    /// Dump teams and conferences to JSON and CSV
    Dump {
        /// JSON output with pointer metadata
        #[arg(long, default_value = "roster_dump.json")]
        json_out: PathBuf,

        /// Team table output
        #[arg(long, default_value = "teams.csv")]
        teams_csv: PathBuf,

        /// Conference table output
        #[arg(long, default_value = "conferences.csv")]
        conferences_csv: PathBuf,
    },

    /// Scan for UTF-16 strings not reached by any decoded pointer
    Scan {
        /// JSON output
        #[arg(long, default_value = "roster_strings.json")]
        json_out: PathBuf,

        /// CSV output
        #[arg(long, default_value = "roster_strings.csv")]
        csv_out: PathBuf,

        /// Minimum string length to include
        #[arg(long, default_value_t = 2)]
        min_length: usize,

        /// Maximum string length to include
        #[arg(long, default_value_t = 64)]
        max_length: usize,
    },

    /// Edit one field of one team and save
    Set {
        /// Team index
        #[arg(short, long)]
        team: usize,

        /// Field name (team_name, team_abbr, team_name_2, nickname, mascot, conference)
        #[arg(short, long)]
        field: Field,

        /// New text, or conference name
        #[arg(short, long)]
        value: String,

        /// Write the result here instead of over the input
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Apply an edited team table and save
    Import {
        /// Team table CSV, as written by `dump`
        #[arg(long)]
        teams_csv: PathBuf,

        /// Write the result here instead of over the input
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let layout = load_layout(cli.layout.as_deref(), cli.format)?;

    match cli.command {
        Commands::Teams => cmd_teams(&cli.input, layout)?,
        Commands::Conferences => cmd_conferences(&cli.input, layout)?,
        Commands::Dump {
            json_out,
            teams_csv,
            conferences_csv,
        } => cmd_dump(&cli.input, layout, &json_out, &teams_csv, &conferences_csv)?,
        Commands::Scan {
            json_out,
            csv_out,
            min_length,
            max_length,
        } => {
            let options = ScanOptions {
                min_len: min_length,
                max_len: max_length,
            };
            cmd_scan(&cli.input, layout, &json_out, &csv_out, options)?;
        }
        Commands::Set {
            team,
            field,
            value,
            output,
        } => cmd_set(&cli.input, layout, team, field, value, output.as_deref())?,
        Commands::Import { teams_csv, output } => {
            cmd_import(&cli.input, layout, &teams_csv, output.as_deref())?;
        }
    }

    Ok(())
}

fn load_layout(path: Option<&Path>, format: Option<RosterFormat>) -> Result<RosterLayout> {
    let mut layout = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read layout file {}", path.display()))?;
            let layout: RosterLayout = serde_json::from_str(&text)
                .with_context(|| format!("Failed to parse layout file {}", path.display()))?;
            tracing::info!("Using layout from {}", path.display());
            layout
        }
        None => RosterLayout::college_hoops_2k8(RosterFormat::Extended),
    };

    if let Some(format) = format {
        layout.format = format;
    }
    Ok(layout)
}

fn open_roster(input: &Path, layout: RosterLayout) -> Result<RosterFile> {
    RosterFile::open(input, layout)
        .with_context(|| format!("Failed to open roster {}", input.display()))
}

fn cmd_teams(input: &Path, layout: RosterLayout) -> Result<()> {
    let roster = open_roster(input, layout)?;
    let rows = roster.teams().context("Failed to decode teams")?;

    for (index, row) in rows.iter().enumerate() {
        let texts: Vec<&str> = row.text_fields().map(|(_, text)| text).collect();
        match &row.conference {
            Some(conference) => println!("{:>4}  {}  [{}]", index, texts.join(" | "), conference),
            None => println!("{:>4}  {}", index, texts.join(" | ")),
        }
    }

    println!("\nTotal: {} teams", rows.len());

    Ok(())
}

fn cmd_conferences(input: &Path, layout: RosterLayout) -> Result<()> {
    let roster = open_roster(input, layout)?;
    let conferences = roster.conferences().context("Failed to decode conferences")?;

    for conference in &conferences {
        println!(
            "{:>4}  {:#010x}  {}",
            conference.index, conference.offset, conference.name.text
        );
    }

    println!("\nTotal: {} conferences", conferences.len());

    Ok(())
}

fn cmd_dump(
    input: &Path,
    layout: RosterLayout,
    json_out: &Path,
    teams_csv: &Path,
    conferences_csv: &Path,
) -> Result<()> {
    let roster = open_roster(input, layout)?;
    let dump = RosterDump::build(&roster).context("Failed to decode roster")?;

    dump.write_json(BufWriter::new(create(json_out)?))
        .context("Failed to write JSON dump")?;

    let rows = roster.teams().context("Failed to decode teams")?;
    write_team_table(BufWriter::new(create(teams_csv)?), roster.layout(), &rows)
        .context("Failed to write team table")?;

    let conferences = roster.conferences().context("Failed to decode conferences")?;
    write_conference_table(BufWriter::new(create(conferences_csv)?), &conferences)
        .context("Failed to write conference table")?;

    println!(
        "Wrote {} with {} teams and {} conferences.",
        json_out.display(),
        dump.teams.len(),
        dump.conferences.len()
    );
    println!("Wrote {} and {}.", teams_csv.display(), conferences_csv.display());

    Ok(())
}

fn cmd_scan(
    input: &Path,
    layout: RosterLayout,
    json_out: &Path,
    csv_out: &Path,
    options: ScanOptions,
) -> Result<()> {
    let roster = open_roster(input, layout)?;
    let dump = RosterDump::build(&roster).context("Failed to decode roster")?;
    let known = KnownStrings::from(&dump);

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));

    let start = Instant::now();
    let scan = courtside::dump::scan_strings(roster.data(), &known, options, |done, total| {
        pb.set_message(format!("Scanning {:#x}/{:#x}", done, total));
    });
    pb.finish_with_message(format!("Found {} strings", scan.strings.len()));

    scan.write_json(BufWriter::new(create(json_out)?))
        .context("Failed to write scan JSON")?;
    scan.write_csv(BufWriter::new(create(csv_out)?))
        .context("Failed to write scan CSV")?;

    println!(
        "Scanned {} bytes in {:?} ({} known strings skipped)",
        scan.file_length,
        start.elapsed(),
        known.len()
    );
    println!("Wrote {} and {}.", json_out.display(), csv_out.display());

    Ok(())
}

fn cmd_set(
    input: &Path,
    layout: RosterLayout,
    team: usize,
    field: Field,
    value: String,
    output: Option<&Path>,
) -> Result<()> {
    let mut roster = open_roster(input, layout)?;
    if field == Field::Conference && !roster.layout().has_conferences() {
        anyhow::bail!("The base format has no conference column");
    }

    let original = roster.teams().context("Failed to decode teams")?;
    let mut edited = original.clone();
    let row = edited
        .get_mut(team)
        .with_context(|| format!("No team {} (roster has {})", team, original.len()))?;
    row.set(field, value);

    save(&mut roster, output.unwrap_or(input), &original, &edited)
}

fn cmd_import(
    input: &Path,
    layout: RosterLayout,
    teams_csv: &Path,
    output: Option<&Path>,
) -> Result<()> {
    let mut roster = open_roster(input, layout)?;
    let original = roster.teams().context("Failed to decode teams")?;

    let file = File::open(teams_csv)
        .with_context(|| format!("Failed to open {}", teams_csv.display()))?;
    let mut edited = read_team_table(file)
        .with_context(|| format!("Failed to parse {}", teams_csv.display()))?;

    // A table exported in one format can be imported into the other.
    if !roster.layout().has_conferences() {
        for row in &mut edited {
            row.conference = None;
        }
    } else {
        for (row, before) in edited.iter_mut().zip(&original) {
            if row.conference.is_none() {
                row.conference.clone_from(&before.conference);
            }
        }
    }

    save(&mut roster, output.unwrap_or(input), &original, &edited)
}

fn save(roster: &mut RosterFile, path: &Path, original: &[TeamRow], edited: &[TeamRow]) -> Result<()> {
    let start = Instant::now();
    let report = roster
        .save(path, original, edited)
        .with_context(|| format!("Failed to save {}", path.display()))?;

    if report.is_empty() {
        println!("No changes");
        return Ok(());
    }

    for patch in &report.patches {
        let how = match patch.action {
            PatchAction::Interned { target } => format!("interned at {target:#x}"),
            PatchAction::InPlace { address } => format!("overwritten in place at {address:#x}"),
            PatchAction::Relocated { start, end } => format!("relocated to {start:#x}..{end:#x}"),
            PatchAction::Repointed { conference, target } => {
                format!("re-pointed to conference {conference} at {target:#x}")
            }
        };
        println!(
            "  team {} {}: {:?} -> {:?} ({})",
            patch.row, patch.field, patch.old, patch.new, how
        );
    }

    println!(
        "Saved {} in {:?}: {} interned, {} in place, {} relocated, {} re-pointed",
        path.display(),
        start.elapsed(),
        report.interned(),
        report.in_place(),
        report.relocated(),
        report.repointed()
    );

    Ok(())
}

fn create(path: &Path) -> Result<File> {
    File::create(path).with_context(|| format!("Failed to create {}", path.display()))
}
