//! rwyfix CLI - rename runways inside MSFS navigation BGL files.
//!
//! The decoding and patching core lives in `rwyfix-bgl`; this binary ingests
//! the change list, groups changes per file, arranges backups, and reports
//! outcomes.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use rwyfix_bgl::codec::{self, StartType};
use rwyfix_bgl::{
    display_of, patch, Airport, BglFile, Field, FieldValue, IlsVor, Procedure, Waypoint,
};
use rwyfix_common::ByteSource;

/// rwyfix - runway renaming for MSFS navigation BGL files
#[derive(Parser)]
#[command(name = "rwyfix")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply runway renames from a change list
    Rename {
        /// Change list file, one `path;airport;old;new` row per line
        #[arg(short, long, default_value = "runways.csv")]
        changes: PathBuf,

        /// Simulator root directory that `<msfs>` in paths expands to
        #[arg(short, long, env = "MSFS_ROOT")]
        root: PathBuf,

        /// Backup directory for files about to be modified
        #[arg(short, long, default_value = "backup")]
        backup: PathBuf,

        /// Disable backups
        #[arg(long)]
        no_backup: bool,

        /// Decode, match and validate without writing any bytes
        #[arg(short = 'n', long)]
        dry_run: bool,
    },

    /// Decode a BGL file and print its record tree
    Show {
        /// Path to the BGL file
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Rename {
            changes,
            root,
            backup,
            no_backup,
            dry_run,
        } => {
            let backup = (!no_backup).then_some(backup);
            cmd_rename(&changes, &root, backup.as_deref(), dry_run)?;
        }
        Commands::Show { file } => {
            cmd_show(&file)?;
        }
    }

    Ok(())
}

/// One row of the change list.
struct RunwayChange {
    file: PathBuf,
    airport: String,
    old_number: String,
    old_designator: String,
    new_number: String,
    new_designator: String,
}

impl RunwayChange {
    fn old_token(&self) -> String {
        format!("{}{}", self.old_number, self.old_designator)
    }

    fn new_token(&self) -> String {
        format!("{}{}", self.new_number, self.new_designator)
    }
}

/// Split a runway token like `09L` or `ne` into number and designator parts,
/// validating both through the core codecs before any file is opened.
fn split_runway_token(token: &str) -> Result<(String, String)> {
    let token = token.trim();
    let (number, designator) = match token.chars().last() {
        Some(c) if token.len() > 1 && "LRCWAB".contains(c) => {
            (&token[..token.len() - 1], &token[token.len() - 1..])
        }
        _ => (token, ""),
    };
    codec::runway_number_to_int(number)
        .with_context(|| format!("invalid runway token {token:?}"))?;
    codec::runway_designator_to_int(designator)
        .with_context(|| format!("invalid runway token {token:?}"))?;
    Ok((number.to_string(), designator.to_string()))
}

fn load_changes(path: &Path, root: &Path) -> Result<Vec<RunwayChange>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read change list {}", path.display()))?;

    let mut changes = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(';').collect();
        if fields.len() != 4 {
            bail!("malformed row {} in {}: {line:?}", index + 1, path.display());
        }
        let (old_number, old_designator) =
            split_runway_token(fields[2]).with_context(|| format!("row {}", index + 1))?;
        let (new_number, new_designator) =
            split_runway_token(fields[3]).with_context(|| format!("row {}", index + 1))?;

        let file = PathBuf::from(
            fields[0]
                .trim()
                .replace("<msfs>", &root.display().to_string()),
        );
        changes.push(RunwayChange {
            file,
            airport: fields[1].trim().to_string(),
            old_number,
            old_designator,
            new_number,
            new_designator,
        });
    }
    Ok(changes)
}

/// Group changes per BGL file, preserving first-appearance order.
fn group_by_file(changes: Vec<RunwayChange>) -> Vec<(PathBuf, Vec<RunwayChange>)> {
    let mut groups: Vec<(PathBuf, Vec<RunwayChange>)> = Vec::new();
    for change in changes {
        match groups.iter_mut().find(|(file, _)| *file == change.file) {
            Some((_, list)) => list.push(change),
            None => groups.push((change.file.clone(), vec![change])),
        }
    }
    groups
}

fn cmd_rename(
    changes_path: &Path,
    root: &Path,
    backup: Option<&Path>,
    dry_run: bool,
) -> Result<()> {
    if dry_run {
        println!("!! DRY RUN - no bytes will be written !!");
    }
    if let Some(dir) = backup {
        if dir.starts_with(root) {
            bail!("backup directory must not be inside the root directory");
        }
    }

    let changes = load_changes(changes_path, root)?;

    for (file, file_changes) in group_by_file(changes) {
        println!("{}", file.display());
        if !file.exists() {
            eprintln!("WARN: file not found: {}", file.display());
            continue;
        }
        if !dry_run {
            if let Some(dir) = backup {
                backup_file(&file, root, dir)?;
            }
        }

        let mut bgl_file = BglFile::open(&file, !dry_run)
            .with_context(|| format!("failed to decode {}", file.display()))?;
        for issue in &bgl_file.bgl().issues {
            eprintln!("WARN: {issue}");
        }

        let (bgl, src) = bgl_file.parts_mut();
        for change in &file_changes {
            let Some(airport) = bgl.airport(&change.airport) else {
                eprintln!("WARN: airport {} not in {}", change.airport, file.display());
                continue;
            };
            apply_change(src, airport, change, !dry_run)?;
        }
    }
    Ok(())
}

/// Copy a file under the root into the backup directory, preserving its
/// root-relative path. Existing backups are never overwritten.
fn backup_file(file: &Path, root: &Path, backup_dir: &Path) -> Result<()> {
    let Ok(relative) = file.strip_prefix(root) else {
        // Files outside the root are patched without a backup.
        return Ok(());
    };
    let target = backup_dir.join(relative);
    if target.exists() {
        return Ok(());
    }
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(file, &target).with_context(|| format!("failed to back up {}", file.display()))?;
    Ok(())
}

fn field_pair_matches(
    number: &Option<Field>,
    designator: &Option<Field>,
    change: &RunwayChange,
) -> bool {
    display_of(number) == change.old_number && display_of(designator) == change.old_designator
}

fn patch_pair(
    src: &mut ByteSource<File>,
    number: &Option<Field>,
    designator: &Option<Field>,
    change: &RunwayChange,
    commit: bool,
) -> Result<()> {
    if let Some(field) = number {
        patch(src, field, &change.new_number, commit)?;
    }
    if let Some(field) = designator {
        patch(src, field, &change.new_designator, commit)?;
    }
    Ok(())
}

/// Apply one change request to one airport, patching every matching runway
/// end, runway-typed start, and runway-typed taxiway path.
fn apply_change(
    src: &mut ByteSource<File>,
    airport: &Airport,
    change: &RunwayChange,
    commit: bool,
) -> Result<()> {
    let mut runways = 0;
    let mut starts = 0;
    let mut taxiways = 0;

    for runway in &airport.runways {
        if field_pair_matches(&runway.primary_number, &runway.primary_designator, change) {
            patch_pair(
                src,
                &runway.primary_number,
                &runway.primary_designator,
                change,
                commit,
            )?;
            runways += 1;
        }
        if field_pair_matches(&runway.secondary_number, &runway.secondary_designator, change) {
            patch_pair(
                src,
                &runway.secondary_number,
                &runway.secondary_designator,
                change,
                commit,
            )?;
            runways += 1;
        }
    }

    let runway_start = FieldValue::UInt(u64::from(StartType::Runway as u8));
    for start in &airport.starts {
        let is_runway_start = start
            .start_type
            .as_ref()
            .is_some_and(|f| f.value == runway_start);
        if is_runway_start && field_pair_matches(&start.number, &start.designator, change) {
            patch_pair(src, &start.number, &start.designator, change, commit)?;
            starts += 1;
        }
    }

    // Only runway-typed taxiway paths are surfaced by the decoder.
    for path in &airport.taxiway_paths {
        if field_pair_matches(&path.number, &path.designator, change) {
            patch_pair(src, &path.number, &path.designator, change, commit)?;
            taxiways += 1;
        }
    }

    let mut msg = format!(
        "Update {} [{}] -> [{}]\t-- ",
        display_of(&airport.ident),
        change.old_token(),
        change.new_token()
    );
    if runways == 0 && starts == 0 && taxiways == 0 {
        msg += &format!("runway [{}] not found!", change.old_token());
    } else {
        msg += &format!("runways={runways} starts={starts} taxiways={taxiways}");
    }
    println!("{msg}");
    Ok(())
}

fn cmd_show(path: &Path) -> Result<()> {
    let file = BglFile::open(path, false)
        .with_context(|| format!("failed to decode {}", path.display()))?;
    let bgl = file.bgl();

    for issue in &bgl.issues {
        eprintln!("WARN: {issue}");
    }

    for airport in &bgl.airports {
        println!("Airport: {airport}");
        print_field(1, "Ident", &airport.ident);
        print_field(1, "Name", &airport.name);
        print_field(1, "Magvar", &airport.magvar);
        for runway in &airport.runways {
            println!("\tRunway: {runway}");
            print_field(2, "Primary Number", &runway.primary_number);
            print_field(2, "Primary Designator", &runway.primary_designator);
            print_field(2, "Secondary Number", &runway.secondary_number);
            print_field(2, "Secondary Designator", &runway.secondary_designator);
            print_field(2, "Heading", &runway.heading);
            print_field(2, "Primary ILS", &runway.primary_ils);
            print_field(2, "Secondary ILS", &runway.secondary_ils);
        }
        for departure in &airport.departures {
            print_procedure("Departure", departure);
        }
        for arrival in &airport.arrivals {
            print_procedure("Arrival", arrival);
        }
        for start in &airport.starts {
            println!("\tStart: {start}");
            print_field(2, "Runway Number", &start.number);
            print_field(2, "Runway Designator", &start.designator);
            print_field(2, "Start Type", &start.start_type);
        }
        for taxiway_path in &airport.taxiway_paths {
            println!("\tTaxiway Path: {taxiway_path}");
            print_field(2, "Taxiway Type", &taxiway_path.path_type);
            print_field(2, "Runway Number", &taxiway_path.number);
            print_field(2, "Runway Designator", &taxiway_path.designator);
        }
    }

    for navaid in &bgl.ils_vors {
        print_navaid(navaid);
    }

    for waypoint in &bgl.waypoints {
        print_waypoint(waypoint);
    }

    Ok(())
}

fn print_procedure(label: &str, procedure: &Procedure) {
    println!("\t{label}: {procedure}");
    print_field(2, "Name", &procedure.name);
    for transition in &procedure.runway_transitions {
        println!("\t\tRunway Transition: {transition}");
        print_field(3, "Number", &transition.number);
        print_field(3, "Designator", &transition.designator);
    }
}

fn print_navaid(navaid: &IlsVor) {
    println!("IlsVor: {navaid}");
    print_field(1, "Ident", &navaid.ident);
    print_field(1, "Name", &navaid.name);
    print_field(1, "Type", &navaid.navaid_type);
    print_field(1, "Region/Airport", &navaid.region_airport);
    print_field(1, "Magvar", &navaid.magvar);
    print_field(1, "Latitude", &navaid.latitude);
    print_field(1, "Longitude", &navaid.longitude);
    if let Some(localizer) = &navaid.localizer {
        println!("\tLocalizer:");
        print_field(2, "Runway Number", &localizer.runway_number);
        print_field(2, "Runway Designator", &localizer.runway_designator);
        print_field(2, "Heading", &localizer.heading);
        print_field(2, "Width", &localizer.width);
    }
    if let Some(dme) = &navaid.dme {
        println!("\tDME:");
        print_field(2, "Latitude", &dme.latitude);
        print_field(2, "Longitude", &dme.longitude);
        print_field(2, "Elevation", &dme.elevation);
        print_field(2, "Range", &dme.range);
    }
    if let Some(glideslope) = &navaid.glideslope {
        println!("\tGlideslope:");
        print_field(2, "Latitude", &glideslope.latitude);
        print_field(2, "Longitude", &glideslope.longitude);
        print_field(2, "Elevation", &glideslope.elevation);
        print_field(2, "Range", &glideslope.range);
        print_field(2, "Pitch", &glideslope.pitch);
    }
}

fn print_waypoint(waypoint: &Waypoint) {
    println!("Waypoint: {waypoint}");
    print_field(1, "Ident", &waypoint.ident);
    print_field(1, "Latitude", &waypoint.latitude);
    print_field(1, "Longitude", &waypoint.longitude);
}

fn print_field(indent: usize, name: &str, field: &Option<Field>) {
    let value = field
        .as_ref()
        .map(|f| f.to_string())
        .unwrap_or_else(|| "None".to_string());
    println!("{}{name}: {value}", "\t".repeat(indent));
}
