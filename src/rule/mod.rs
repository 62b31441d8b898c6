//! Text forms of individual rules.
//!
//! Domain rules render as `<type>:<value>[:@attr,...]`; CIDR rules parse from
//! and render as `address/prefix`.

mod cidr;
mod domain;

pub use cidr::{format_cidr, parse_cidr};
pub use domain::format_domain;
