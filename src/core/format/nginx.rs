use crate::core::errors::{Error, Result};
use crate::core::format::{Formatter, RenderData};
use crate::core::ip_range::IpRange;

/*-------------------------------------------------------------------------------------------------
  Nginx Formatter
-------------------------------------------------------------------------------------------------*/

/// An nginx access-control block built from the selected ranges:
///
/// ```text
/// allow 52.94.76.0/22; # AWS AMAZON/us-west-2,EC2/us-west-2
///
/// allow 2600:1f00::/24; # AWS AMAZON/us-east-1
///
/// deny all;
/// ```
///
/// Ranges are deduplicated first, so a prefix shared by several services emits a single
/// `allow` line naming every contributor. IPv4 prefixes come first, then IPv6, each block
/// sorted lexicographically.
pub struct NginxFormatter;

impl Formatter for NginxFormatter {
    fn code(&self) -> &'static str {
        "nginx"
    }

    fn render(&self, data: &RenderData) -> Result<String> {
        if !matches!(data, RenderData::Ranges(_)) {
            return Err(Error::InvalidInput("nginx"));
        }

        let groups = data.deduplicate()?;

        let (mut ipv4, mut ipv6): (Vec<_>, Vec<_>) = groups
            .iter()
            .partition(|(_, members)| members[0].ipv4_prefix().is_some());
        ipv4.sort_by(|a, b| a.0.cmp(&b.0));
        ipv6.sort_by(|a, b| a.0.cmp(&b.0));

        let mut config = String::new();
        for (prefix, members) in &ipv4 {
            config.push_str(&allow_line(prefix, members));
        }
        config.push('\n');

        for (prefix, members) in &ipv6 {
            config.push_str(&allow_line(prefix, members));
        }
        config.push('\n');

        config.push_str("deny all;\n");
        Ok(config)
    }
}

fn allow_line(prefix: &str, members: &[IpRange]) -> String {
    let sources = members
        .iter()
        .map(|range| format!("{}/{}", range.service(), range.region()))
        .collect::<Vec<String>>()
        .join(",");

    format!("allow {prefix}; # AWS {sources}\n")
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
