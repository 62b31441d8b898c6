//! geodat-compile: build a geosite/geoip dat file from per-country text lists.

use clap::{ArgAction, Parser};
use geodat::cli::{init_logger, normalize_args};
use geodat::converter::{compile_dir, write_checksum, write_dat, Ips, Sites};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "geodat-compile")]
#[command(author = "Kaitu.io")]
#[command(version)]
#[command(about = "Compile a directory of per-country lists into a dat file", long_about = None)]
struct Cli {
    /// Output dat file
    #[arg(long, default_value = "geosite.dat")]
    dat: PathBuf,

    /// Directory of per-country list files
    #[arg(long, default_value = "sites")]
    dir: PathBuf,

    /// Treat the lists as IP CIDRs (geoip) instead of domains (geosite)
    #[arg(
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true"
    )]
    ip: bool,

    /// Also write <dat>.sha256sum
    #[arg(long)]
    checksum: bool,

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
    let data = if cli.ip {
        compile_dir::<Ips>(&cli.dir)?
    } else {
        compile_dir::<Sites>(&cli.dir)?
    };

    write_dat(&cli.dat, &data)?;
    if cli.checksum {
        let sum_path = write_checksum(&cli.dat, &data)?;
        log::debug!("checksum written to {}", sum_path.display());
    }

    log::info!("{} --> {}", cli.dir.display(), cli.dat.display());
    Ok(())
}
