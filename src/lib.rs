pub mod assemble;
pub mod cli;
pub mod data;
pub mod error;
pub mod export;
pub mod extract;
pub mod io_utils;
pub mod mapper;
pub mod normalize;
pub mod pipeline;
pub mod profile;
pub mod schema;
pub mod segment;
pub mod sheet;
pub mod table;
pub mod units;

use std::{
    env,
    path::{Path, PathBuf},
    sync::OnceLock,
};

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use clap::Parser;
use log::{LevelFilter, debug, info};

use crate::{
    cli::{Cli, Commands, ConvertArgs, ExportFormat, ProfilesArgs},
    extract::RawTable,
    pipeline::{Document, Parsed},
    profile::UnitProfile,
    schema::CanonicalTable,
    sheet::Workbook,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("ddr_normalize", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Convert(args) => handle_convert(&args),
        Commands::Profiles(args) => handle_profiles(&args),
    }
}

fn resolve_profile(args: &ConvertArgs) -> Result<UnitProfile> {
    if let Some(path) = &args.profile_file {
        let profile = UnitProfile::load(path)?;
        info!("Loaded profile '{}' from {path:?}", profile.name);
        return Ok(profile);
    }
    let name = args
        .unit
        .as_deref()
        .ok_or_else(|| anyhow!("Either --unit or --profile-file is required"))?;
    units::builtin(name).ok_or_else(|| {
        anyhow!(
            "Unknown unit '{name}'. Known units: {}",
            units::BUILTIN_UNITS.join(", ")
        )
    })
}

fn load_document(path: &Path, encoding_label: Option<&str>) -> Result<Document> {
    if io_utils::is_workbook(path) {
        let workbook =
            Workbook::open(path).with_context(|| format!("Opening workbook {path:?}"))?;
        return Ok(Document::Workbook(workbook));
    }
    let encoding = io_utils::resolve_encoding(encoding_label)?;
    let text = io_utils::read_text(path, encoding)?;
    debug!("Read {} byte(s) of text from {path:?}", text.len());
    Ok(Document::text(path.display().to_string(), text))
}

/// Normalizes every document with one profile; several tables are merged
/// with the profile's merge order, raw rows stay in input order.
pub fn convert_documents(
    documents: &[Document],
    profile: &UnitProfile,
    report_date: Option<NaiveDate>,
) -> Result<Parsed> {
    let mut parsed = Vec::with_capacity(documents.len());
    for document in documents {
        let one = pipeline::parse_document(document, profile, report_date).with_context(|| {
            format!("Normalizing {} with unit {}", document.origin(), profile.name)
        })?;
        parsed.push(one);
    }
    if parsed.len() == 1 {
        return Ok(parsed.remove(0));
    }
    let (raws, tables): (Vec<_>, Vec<_>) = parsed.into_iter().map(|p| (p.raw, p.table)).unzip();
    Ok(Parsed {
        raw: RawTable::concat(raws),
        table: assemble::merge(tables, &profile.merge_sort),
    })
}

/// `-o` naming an existing directory gets a file named after the report date.
fn resolve_destination(
    output: Option<&Path>,
    table: &CanonicalTable,
    format: ExportFormat,
) -> Result<Option<PathBuf>> {
    match output {
        Some(dir) if dir.is_dir() => {
            let name = export::default_file_name(table, format)
                .ok_or_else(|| anyhow!("Cannot name output in {dir:?}: table has no rows"))?;
            Ok(Some(dir.join(name)))
        }
        other => Ok(other.map(Path::to_path_buf)),
    }
}

fn handle_convert(args: &ConvertArgs) -> Result<()> {
    let profile = resolve_profile(args)?;
    info!(
        "Converting {} input(s) with unit '{}' ({})",
        args.inputs.len(),
        profile.name,
        profile.input_kind()
    );
    let documents = args
        .inputs
        .iter()
        .map(|path| load_document(path, args.input_encoding.as_deref()))
        .collect::<Result<Vec<_>>>()?;
    let Parsed { raw, table } = convert_documents(&documents, &profile, args.report_date)?;

    if let (Some(path), Some(format)) = (args.raw.as_deref(), args.raw_format()) {
        let destination = resolve_destination(Some(path), &table, format)?;
        export::export(&raw, format, destination.as_deref())
            .context("Writing extracted fields")?;
    }
    if args.writes_table() {
        let format = args.resolved_format();
        let destination = resolve_destination(args.output.as_deref(), &table, format)?;
        export::export(&table, format, destination.as_deref())?;
    }
    if args.clipboard {
        print!("{}", export::clipboard_block(&table)?);
    }
    if args.preview {
        table::print_preview(&table);
    }
    Ok(())
}

fn handle_profiles(args: &ProfilesArgs) -> Result<()> {
    if let Some(name) = &args.export {
        let profile = units::builtin(name).ok_or_else(|| {
            anyhow!(
                "Unknown unit '{name}'. Known units: {}",
                units::BUILTIN_UNITS.join(", ")
            )
        })?;
        match args.output.as_deref() {
            Some(path) if !io_utils::is_dash(path) => {
                profile.save(path)?;
                info!("Profile '{name}' written to {path:?}");
            }
            _ => print!("{}", profile.to_yaml()?),
        }
        return Ok(());
    }

    let headers = ["Unit", "Input", "Region", "Zones", "Description"]
        .iter()
        .map(|h| h.to_string())
        .collect::<Vec<_>>();
    let rows = units::all()
        .iter()
        .map(|profile| {
            vec![
                profile.name.clone(),
                profile.input_kind().to_string(),
                profile.columns.region.describe(),
                profile_zones(profile),
                profile.description.clone(),
            ]
        })
        .collect::<Vec<_>>();
    print!("{}", table::render_table(&headers, &rows));
    Ok(())
}

fn profile_zones(profile: &UnitProfile) -> String {
    let zones: Vec<&str> = profile
        .partitions
        .iter()
        .filter_map(|p| p.zone.as_deref())
        .collect();
    if zones.is_empty() {
        profile.columns.zone.describe()
    } else {
        zones.join(", ")
    }
}
