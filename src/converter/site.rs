//! Site lists: one domain rule per line.

use std::io::BufRead;
use std::path::Path;

use super::GeoKind;
use crate::error::IoContext;
use crate::rule::format_domain;
use crate::schema::{Domain, GeoSite, GeoSiteList};
use crate::Result;

/// Site lists (`geosite.dat`).
///
/// Every non-empty input line becomes a domain-suffix rule carrying the raw
/// line as its value. Attribute syntax is not parsed on input; decoded rules
/// render with their type tag and attribute keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sites;

impl GeoKind for Sites {
    type List = GeoSiteList;
    type Entry = GeoSite;

    const NAME: &'static str = "geosite";

    fn read_entry<R: BufRead>(country_code: String, path: &Path, reader: R) -> Result<GeoSite> {
        let mut domain = Vec::new();

        for line in reader.lines() {
            let line = line.io_context("read", path)?;
            if line.is_empty() {
                continue;
            }
            domain.push(Domain::suffix(line));
        }

        log::debug!("{}: {} domains", country_code, domain.len());
        Ok(GeoSite {
            country_code,
            domain,
        })
    }

    fn into_list(entries: Vec<GeoSite>) -> GeoSiteList {
        GeoSiteList { entry: entries }
    }

    fn render(list: &GeoSiteList) -> Result<Vec<(String, Vec<String>)>> {
        list.entry
            .iter()
            .map(|site| {
                let mut lines = Vec::with_capacity(site.domain.len());
                for domain in &site.domain {
                    if let Some(line) = format_domain(&site.country_code, domain)? {
                        lines.push(line);
                    }
                }
                Ok((site.country_code.clone(), lines))
            })
            .collect()
    }
}
