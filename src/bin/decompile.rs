//! geodat-decompile: expand a geosite/geoip dat file into per-country text lists.

use clap::{ArgAction, Parser};
use geodat::cli::{init_logger, normalize_args};
use geodat::converter::{decompile, read_dat, Ips, Sites};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "geodat-decompile")]
#[command(author = "Kaitu.io")]
#[command(version)]
#[command(about = "Decompile a dat file into a directory of per-country lists", long_about = None)]
struct Cli {
    /// Input dat file (plain or gzip-compressed)
    #[arg(long, default_value = "geosite.dat")]
    dat: PathBuf,

    /// Output directory for per-country list files
    #[arg(long, default_value = "sites")]
    dir: PathBuf,

    /// Read a geoip dat file instead of a geosite one
    #[arg(
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true"
    )]
    ip: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse_from(normalize_args(std::env::args_os()));
    init_logger(cli.verbose);

    if let Err(e) = run(&cli) {
        log::error!("failed to convert. error={}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> geodat::Result<()> {
    let data = read_dat(&cli.dat)?;

    let written = if cli.ip {
        decompile::<Ips>(&data, &cli.dir)?
    } else {
        decompile::<Sites>(&data, &cli.dir)?
    };

    log::info!(
        "{} --> {} ({} files)",
        cli.dat.display(),
        cli.dir.display(),
        written
    );
    Ok(())
}
