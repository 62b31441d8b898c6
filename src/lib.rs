//! geodat - compile per-country rule lists into geosite/geoip dat files.
//!
//! A dat file is a single protobuf list consumed by V2Ray-style routers: a
//! `GeoSiteList` of domain rules or a `GeoIpList` of CIDRs, each grouped by
//! country code. The text form is a directory holding one file per country
//! code with one rule per line.
//!
//! # Quick Start
//!
//! ```no_run
//! use geodat::converter::{compile_dir, decompile, write_dat, Sites};
//! use std::path::Path;
//!
//! // sites/cn, sites/us, ... -> geosite.dat
//! let data = compile_dir::<Sites>(Path::new("sites"))?;
//! write_dat(Path::new("geosite.dat"), &data)?;
//!
//! // geosite.dat -> out/cn, out/us, ...
//! decompile::<Sites>(&data, Path::new("out"))?;
//! # Ok::<(), geodat::Error>(())
//! ```
//!
//! # Text Forms
//!
//! - **Site lists (input)**: every non-empty line is a domain-suffix rule.
//! - **Site lists (output)**: `<type>:<value>[:@attr1,@attr2]` where type is
//!   one of `domain`, `full`, `keyword`, `regexp`.
//! - **IP lists**: `address[/prefix]`; a bare address is a single host, and
//!   networks are stored masked to their prefix.
//!
//! Country codes are uppercased in dat files and lowercased as file names.

mod error;

pub mod cli;
pub mod converter;
pub mod rule;
pub mod schema;

// Re-export core types
pub use error::{CidrRuleError, Error, Result};

// Re-export the list kinds
pub use converter::{GeoKind, Ips, Sites};
