//! Domain rule text form.

use crate::schema::domain::Type;
use crate::schema::Domain;
use crate::{Error, Result};

impl Type {
    /// Tag written in front of the value in text lists.
    pub fn tag(self) -> &'static str {
        match self {
            Type::Domain => "domain",
            Type::Regex => "regexp",
            Type::Plain => "keyword",
            Type::Full => "full",
        }
    }
}

/// Render a domain rule as one text line (without the newline).
///
/// Attributes are appended as `:@key1,@key2`; only keys are written. Rules
/// with an empty value render as `None` and are left out of the output.
///
/// # Examples
/// ```
/// use geodat::rule::format_domain;
/// use geodat::schema::{domain::Attribute, Domain};
///
/// let mut rule = Domain::suffix("example.com");
/// assert_eq!(
///     format_domain("CN", &rule).unwrap().as_deref(),
///     Some("domain:example.com")
/// );
///
/// rule.attribute.push(Attribute::new("ads"));
/// assert_eq!(
///     format_domain("CN", &rule).unwrap().as_deref(),
///     Some("domain:example.com:@ads")
/// );
/// ```
pub fn format_domain(country_code: &str, domain: &Domain) -> Result<Option<String>> {
    if domain.value.is_empty() {
        return Ok(None);
    }

    let kind = Type::try_from(domain.r#type).map_err(|_| {
        Error::malformed(
            country_code,
            format!("unknown domain type {} for {}", domain.r#type, domain.value),
        )
    })?;

    let mut line = format!("{}:{}", kind.tag(), domain.value);
    if !domain.attribute.is_empty() {
        let keys: Vec<&str> = domain.attribute.iter().map(|a| a.key.as_str()).collect();
        line.push_str(":@");
        line.push_str(&keys.join(",@"));
    }

    Ok(Some(line))
}
