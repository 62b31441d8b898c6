//! IP lists: one CIDR per line.

use std::io::BufRead;
use std::path::Path;

use super::GeoKind;
use crate::error::IoContext;
use crate::rule::{format_cidr, parse_cidr};
use crate::schema::{Cidr, GeoIp, GeoIpList};
use crate::{Error, Result};

/// IP lists (`geoip.dat`).
///
/// Every line is `address[/prefix]`; a line without a prefix gets `/32`.
/// Networks are stored masked to their prefix. Any line that does not parse,
/// blank lines included, fails the whole list.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ips;

impl GeoKind for Ips {
    type List = GeoIpList;
    type Entry = GeoIp;

    const NAME: &'static str = "geoip";

    fn read_entry<R: BufRead>(country_code: String, path: &Path, reader: R) -> Result<GeoIp> {
        let mut cidr = Vec::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line.io_context("read", path)?;

            let net = parse_cidr(&line).map_err(|source| Error::InvalidCidr {
                path: path.to_path_buf(),
                line: idx + 1,
                source,
            })?;
            log::trace!("{}: {} -> {}", country_code, line, net);
            cidr.push(Cidr::from_net(net));
        }

        log::debug!("{}: {} cidrs", country_code, cidr.len());
        Ok(GeoIp { country_code, cidr })
    }

    fn into_list(entries: Vec<GeoIp>) -> GeoIpList {
        GeoIpList { entry: entries }
    }

    fn render(list: &GeoIpList) -> Result<Vec<(String, Vec<String>)>> {
        list.entry
            .iter()
            .map(|geoip| {
                let lines = geoip
                    .cidr
                    .iter()
                    .map(|cidr| format_cidr(&geoip.country_code, cidr))
                    .collect::<Result<Vec<_>>>()?;
                Ok((geoip.country_code.clone(), lines))
            })
            .collect()
    }
}
