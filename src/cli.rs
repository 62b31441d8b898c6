//! Shared command-line plumbing for the compile and decompile tools.

use std::ffi::OsString;

/// Flags historically spelled with a single dash (`-dat`, `-dir`, `-ip`).
const LEGACY_FLAGS: &[&str] = &["dat", "dir", "ip"];

/// Rewrite single-dash long flags into the `--flag` form clap expects.
///
/// Both `-dat file` and `-dat=file` are accepted. Anything else, including
/// single-letter short flags such as `-v`, is passed through unchanged.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .enumerate()
        .map(|(idx, arg)| {
            if idx == 0 {
                return arg;
            }
            match arg.to_str() {
                Some(s) if is_legacy_flag(s) => OsString::from(format!("-{}", s)),
                _ => arg,
            }
        })
        .collect()
}

fn is_legacy_flag(arg: &str) -> bool {
    let Some(rest) = arg.strip_prefix('-') else {
        return false;
    };
    if rest.starts_with('-') {
        return false;
    }
    let name = rest.split_once('=').map_or(rest, |(name, _)| name);
    LEGACY_FLAGS.contains(&name)
}

/// Initialize `env_logger`, honoring `RUST_LOG` when set.
pub fn init_logger(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_target(false)
        .init();
}
