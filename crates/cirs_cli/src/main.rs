use std::io::Read;
use std::path::PathBuf;

use cirs_core::{
    Converter, ConverterConfig, JulianDate, NutationTablePaths, PoleOffset, PoleOffsetSource,
    TransformWarning, VectorBatch,
};
use cirs_time::{UtcTime, tt_to_utc, utc_to_tt};
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cirs", about = "CIRS <-> GCRS vector rotation")]
struct Cli {
    /// Log at debug level (RUST_LOG still applies otherwise)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct EpochArgs {
    /// First part of the TT Julian Date
    #[arg(
        long,
        required_unless_present = "utc",
        conflicts_with = "utc",
        allow_negative_numbers = true
    )]
    jd1: Option<f64>,
    /// Second part of the TT Julian Date
    #[arg(long, default_value = "0.0", allow_negative_numbers = true)]
    jd2: f64,
    /// Epoch as a UTC timestamp (YYYY-MM-DDThh:mm:ssZ) instead of a TT JD
    #[arg(long)]
    utc: Option<String>,
    /// NAIF leap-second kernel extending the built-in table
    #[arg(long)]
    lsk: Option<PathBuf>,
    /// IERS tab5.3a.txt and tab5.3b.txt; selects IAU 2000A nutation
    #[arg(long, num_args = 2, value_names = ["PSI", "EPS"])]
    nutation_tables: Option<Vec<PathBuf>>,
}

#[derive(Args)]
struct OffsetArgs {
    /// Celestial pole offset dX in radians
    #[arg(long, requires = "dy", allow_negative_numbers = true)]
    dx: Option<f64>,
    /// Celestial pole offset dY in radians
    #[arg(long, requires = "dx", allow_negative_numbers = true)]
    dy: Option<f64>,
    /// IERS finals2000A file for dX/dY lookup
    #[arg(long)]
    eop: Option<PathBuf>,
    /// Rotate without celestial pole offsets
    #[arg(long, conflicts_with_all = ["dx", "dy", "eop"])]
    zero_offsets: bool,
    /// Treat dates beyond the leap-second table as errors
    #[arg(long)]
    strict: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the rotation matrix, row-major
    Matrix {
        #[command(flatten)]
        epoch: EpochArgs,
        #[command(flatten)]
        offsets: OffsetArgs,
        /// Print GCRS -> CIRS instead of CIRS -> GCRS
        #[arg(long)]
        inverse: bool,
        /// Also print X, Y and s
        #[arg(long)]
        xys: bool,
    },
    /// Rotate whitespace-separated vectors (3 or 6 columns per line)
    Transform {
        #[command(flatten)]
        epoch: EpochArgs,
        #[command(flatten)]
        offsets: OffsetArgs,
        /// Rotate GCRS -> CIRS instead
        #[arg(long)]
        inverse: bool,
        /// Input file; stdin when omitted
        input: Option<PathBuf>,
    },
    /// Print the UTC date of a TT epoch
    Utc {
        #[command(flatten)]
        epoch: EpochArgs,
    },
}

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

fn nutation_tables(epoch: &EpochArgs) -> Option<NutationTablePaths> {
    match epoch.nutation_tables.as_deref() {
        Some([psi, eps]) => Some(NutationTablePaths {
            longitude: psi.clone(),
            obliquity: eps.clone(),
        }),
        _ => None,
    }
}

fn load_converter(epoch: &EpochArgs, offsets: Option<&OffsetArgs>) -> Converter {
    let config = ConverterConfig {
        lsk_path: epoch.lsk.clone(),
        eop_path: offsets.and_then(|o| o.eop.clone()),
        dubious_dates_are_errors: offsets.is_some_and(|o| o.strict),
        nutation_tables: nutation_tables(epoch),
    };
    Converter::new(config).unwrap_or_else(|e| {
        eprintln!("Failed to load tables: {e}");
        std::process::exit(1);
    })
}

fn resolve_epoch(epoch: &EpochArgs, converter: &Converter) -> JulianDate {
    if let Some(text) = &epoch.utc {
        let utc = text.parse::<UtcTime>().unwrap_or_else(|e| {
            eprintln!("{e}");
            std::process::exit(1);
        });
        let tt = utc
            .to_julian(converter.leap_seconds())
            .and_then(|jd| utc_to_tt(jd, converter.leap_seconds()))
            .unwrap_or_else(|e| {
                eprintln!("Cannot convert {text} to TT: {e}");
                std::process::exit(1);
            });
        if tt.quality.is_dubious() {
            eprintln!("warning: {text} is beyond the leap-second table; TT may be off");
        }
        return tt.value;
    }
    match epoch.jd1 {
        Some(jd1) => JulianDate::new(jd1, epoch.jd2),
        None => {
            eprintln!("Either --jd1 or --utc is required");
            std::process::exit(2);
        }
    }
}

/// Explicit offsets win. Without them the offsets are looked up, which
/// fails with a missing-source error unless `--eop` was given.
fn offset_source(offsets: &OffsetArgs) -> PoleOffsetSource {
    match (offsets.dx, offsets.dy) {
        (Some(dx), Some(dy)) => PoleOffsetSource::Explicit(PoleOffset::new(dx, dy)),
        _ if offsets.zero_offsets => {
            log::debug!("--zero-offsets given; dX = dY = 0");
            PoleOffsetSource::Explicit(PoleOffset::ZERO)
        }
        _ => PoleOffsetSource::LookupFromEop,
    }
}

fn report(warnings: &[TransformWarning]) {
    for w in warnings {
        eprintln!("warning: {w}");
    }
}

/// Parse whitespace-separated rows of 3 or 6 numbers. Blank lines and
/// lines starting with `#` are skipped.
fn parse_vectors(text: &str) -> Result<VectorBatch, String> {
    let mut dim = None;
    let mut data = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let row = line
            .split_whitespace()
            .map(|v| v.parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("line {}: {e}", lineno + 1))?;
        match dim {
            None => dim = Some(row.len()),
            Some(d) if d != row.len() => {
                return Err(format!(
                    "line {}: expected {d} columns, found {}",
                    lineno + 1,
                    row.len()
                ));
            }
            Some(_) => {}
        }
        data.extend(row);
    }
    VectorBatch::from_flat(dim.unwrap_or(3), data).map_err(|e| e.to_string())
}

fn read_input(path: Option<&PathBuf>) -> String {
    let result = match path {
        Some(p) => std::fs::read_to_string(p),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).map(|_| buf)
        }
    };
    result.unwrap_or_else(|e| {
        eprintln!("Failed to read input: {e}");
        std::process::exit(1);
    })
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Matrix {
            epoch,
            offsets,
            inverse,
            xys,
        } => {
            let converter = load_converter(&epoch, Some(&offsets));
            let tt = resolve_epoch(&epoch, &converter);
            let outcome = converter
                .rotation(tt, offset_source(&offsets))
                .unwrap_or_else(|e| {
                    eprintln!("{e}");
                    std::process::exit(1);
                });
            report(&outcome.warnings);
            let rot = outcome.rotation;
            if xys {
                println!("X = {:+.16e}", rot.cip.x);
                println!("Y = {:+.16e}", rot.cip.y);
                println!("s = {:+.16e}", rot.cip.s);
            }
            if inverse {
                println!("{}", rot.gcrs_to_cirs());
            } else {
                println!("{}", rot.cirs_to_gcrs());
            }
        }

        Commands::Transform {
            epoch,
            offsets,
            inverse,
            input,
        } => {
            let batch = parse_vectors(&read_input(input.as_ref())).unwrap_or_else(|e| {
                eprintln!("Invalid input: {e}");
                std::process::exit(1);
            });
            let converter = load_converter(&epoch, Some(&offsets));
            let tt = resolve_epoch(&epoch, &converter);
            let source = offset_source(&offsets);
            let result = if inverse {
                converter.gcrs_to_cirs(tt, source, &batch)
            } else {
                converter.cirs_to_gcrs(tt, source, &batch)
            };
            let outcome = result.unwrap_or_else(|e| {
                eprintln!("{e}");
                std::process::exit(1);
            });
            report(&outcome.warnings);
            for v in outcome.vectors.iter() {
                let line: Vec<String> = v.iter().map(|x| format!("{x:+.15e}")).collect();
                println!("{}", line.join(" "));
            }
        }

        Commands::Utc { epoch } => {
            let converter = load_converter(&epoch, None);
            let tt = resolve_epoch(&epoch, &converter);
            let utc = tt_to_utc(tt, converter.leap_seconds()).unwrap_or_else(|e| {
                eprintln!("{e}");
                std::process::exit(1);
            });
            let calendar = UtcTime::from_julian(utc.value, converter.leap_seconds())
                .unwrap_or_else(|e| {
                eprintln!("{e}");
                std::process::exit(1);
            });
            if utc.quality.is_dubious() {
                println!("{calendar} (dubious)");
            } else {
                println!("{calendar}");
            }
        }
    }
}
