use crate::core::errors::{Error, Result};
use crate::core::format::{Formatter, RenderData};
use crate::core::ip_range::IpRange;
use lazy_static::lazy_static;
use std::collections::{BTreeMap, BTreeSet};

/*-------------------------------------------------------------------------------------------------
  Service Port Table
-------------------------------------------------------------------------------------------------*/

lazy_static! {
    // Destination ports a client needs open to reach each AWS service. Services reached over
    // plain HTTPS list 443 only; the ones that also serve HTTP or a dedicated protocol list
    // every port.
    static ref SERVICE_PORTS: BTreeMap<&'static str, &'static [u16]> = BTreeMap::from([
        ("AMAZON", &[443u16, 80] as &[u16]),
        ("AMAZON_APPFLOW", &[443]),
        ("AMAZON_CONNECT", &[443]),
        ("API_GATEWAY", &[443]),
        ("CLOUDFRONT", &[443, 80]),
        ("CODEBUILD", &[443]),
        ("DYNAMODB", &[443]),
        ("EC2", &[443]),
        ("EC2_INSTANCE_CONNECT", &[22]),
        ("GLOBALACCELERATOR", &[443]),
        ("KINESIS_VIDEO_STREAMS", &[443]),
        ("ROUTE53", &[53, 443]),
        ("ROUTE53_HEALTHCHECKS", &[443, 80]),
        ("ROUTE53_RESOLVER", &[53]),
        ("S3", &[443, 80]),
        ("WORKSPACES_GATEWAYS", &[443]),
    ]);
}

/*-------------------------------------------------------------------------------------------------
  Iptables Formatter
-------------------------------------------------------------------------------------------------*/

/// Outbound-allow iptables rules for the selected ranges:
///
/// ```text
/// # AWS S3/us-east-1
/// iptables -A OUTPUT -d 54.231.0.0/16 -p tcp --dport 80 -j ACCEPT
/// iptables -A OUTPUT -d 54.231.0.0/16 -p tcp --dport 443 -j ACCEPT
/// ```
///
/// Ranges are deduplicated first; each distinct IPv4 prefix (lexicographic order) gets the
/// union of the destination ports implied by its contributing services, one rule per port. A
/// service missing from the port table aborts the render rather than guessing.
///
/// IPv6 prefixes are grouped but no rules are emitted for them.
// TODO: emit ip6tables rules once the IPv6 rule shape is settled.
pub struct IptablesFormatter;

impl Formatter for IptablesFormatter {
    fn code(&self) -> &'static str {
        "iptables"
    }

    fn render(&self, data: &RenderData) -> Result<String> {
        if !matches!(data, RenderData::Ranges(_)) {
            return Err(Error::InvalidInput("iptables"));
        }

        let groups = data.deduplicate()?;

        let mut ipv4: Vec<&(String, Vec<IpRange>)> = groups
            .iter()
            .filter(|(_, members)| members[0].ipv4_prefix().is_some())
            .collect();
        ipv4.sort_by(|a, b| a.0.cmp(&b.0));

        let mut rules = String::new();
        for (prefix, members) in ipv4 {
            let mut ports: BTreeSet<u16> = BTreeSet::new();
            for range in members {
                let service_ports = SERVICE_PORTS
                    .get(range.service())
                    .ok_or_else(|| Error::UnknownService(range.service().to_string()))?;
                ports.extend(service_ports.iter().copied());
            }

            let sources = members
                .iter()
                .map(|range| format!("{}/{}", range.service(), range.region()))
                .collect::<Vec<String>>()
                .join(", ");
            rules.push_str(&format!("# AWS {sources}\n"));

            for port in ports {
                rules.push_str(&format!(
                    "iptables -A OUTPUT -d {prefix} -p tcp --dport {port} -j ACCEPT\n"
                ));
            }
        }

        Ok(rules)
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
