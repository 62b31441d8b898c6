//! IP CIDR rule text form.

use ipnet::IpNet;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use crate::error::CidrRuleError;
use crate::schema::Cidr;
use crate::{Error, Result};

/// Parse one line of an IP list into its canonical network.
///
/// A line without a `/` gets `/32` appended, whatever its address family.
/// Host bits below the prefix are cleared, so `10.1.2.3/8` yields
/// `10.0.0.0/8`. The line is taken verbatim: blank lines and surrounding
/// whitespace are errors.
///
/// # Examples
/// ```
/// use geodat::rule::parse_cidr;
///
/// assert_eq!(parse_cidr("10.0.0.5").unwrap().to_string(), "10.0.0.5/32");
/// assert_eq!(parse_cidr("10.1.2.3/8").unwrap().to_string(), "10.0.0.0/8");
/// assert!(parse_cidr("not-an-ip").is_err());
/// ```
pub fn parse_cidr(line: &str) -> std::result::Result<IpNet, CidrRuleError> {
    let cidr = if line.contains('/') {
        line.to_string()
    } else {
        format!("{}/32", line)
    };

    cidr.parse::<IpNet>()
        .map(|net| net.trunc())
        .map_err(|_| CidrRuleError::InvalidCidr(cidr))
}

/// Render a stored CIDR as `address/prefix`.
///
/// The address is written as stored; it is not masked again.
pub fn format_cidr(country_code: &str, cidr: &Cidr) -> Result<String> {
    let addr = match cidr.ip.len() {
        4 => {
            let mut octets = [0u8; 4];
            octets.copy_from_slice(&cidr.ip);
            IpAddr::V4(Ipv4Addr::from(octets))
        }
        16 => {
            let mut octets = [0u8; 16];
            octets.copy_from_slice(&cidr.ip);
            IpAddr::V6(Ipv6Addr::from(octets))
        }
        len => {
            return Err(Error::malformed(
                country_code,
                format!("IP address of {} bytes", len),
            ))
        }
    };

    let net = u8::try_from(cidr.prefix)
        .ok()
        .and_then(|prefix| IpNet::new(addr, prefix).ok())
        .ok_or_else(|| {
            Error::malformed(
                country_code,
                format!("prefix /{} out of range for {}", cidr.prefix, addr),
            )
        })?;

    Ok(net.to_string())
}
