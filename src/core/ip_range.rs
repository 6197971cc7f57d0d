use ipnetwork::{IpNetwork, Ipv4Network, Ipv6Network};
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::rc::Rc;

/*-------------------------------------------------------------------------------------------------
  IP Range
-------------------------------------------------------------------------------------------------*/

/// One entry from the AWS IP Ranges document: a single IPv4 or IPv6 CIDR block and the region,
/// service, and network border group it is published under. Immutable once constructed.
///
/// The document publishes one entry per (prefix, service) pair, so the same CIDR block can
/// appear in several [IpRange] records; the rule-generating formatters regroup them by prefix.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IpRange {
    pub(crate) prefix: IpNetwork,
    pub(crate) region: Rc<str>,
    pub(crate) service: Rc<str>,
    pub(crate) network_border_group: Rc<str>,
}

impl IpRange {
    /// Record field names, in the order the document publishes them. Used as table and CSV
    /// headers and as the serialized field order.
    pub const FIELD_NAMES: [&'static str; 5] = [
        "ip_prefix",
        "ipv6_prefix",
        "region",
        "service",
        "network_border_group",
    ];

    /*-------------------------------------------------------------------------
      Getters
    -------------------------------------------------------------------------*/

    /// The IPv4 or IPv6 CIDR block for this range.
    pub fn prefix(&self) -> IpNetwork {
        self.prefix
    }

    /// The IPv4 prefix, when this is an IPv4 range.
    pub fn ipv4_prefix(&self) -> Option<Ipv4Network> {
        match self.prefix {
            IpNetwork::V4(ipv4_network) => Some(ipv4_network),
            IpNetwork::V6(_) => None,
        }
    }

    /// The IPv6 prefix, when this is an IPv6 range.
    pub fn ipv6_prefix(&self) -> Option<Ipv6Network> {
        match self.prefix {
            IpNetwork::V4(_) => None,
            IpNetwork::V6(ipv6_network) => Some(ipv6_network),
        }
    }

    /// AWS region the range is published under.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// AWS service that uses the range.
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Network border group the range is published under.
    pub fn network_border_group(&self) -> &str {
        &self.network_border_group
    }

    /// CIDR string for this range; the value prefix-pattern matching and dedup grouping
    /// operate on.
    pub fn prefix_string(&self) -> String {
        self.prefix.to_string()
    }

    /*-------------------------------------------------------------------------
      Tabular Form
    -------------------------------------------------------------------------*/

    /// Field values in [IpRange::FIELD_NAMES] order; the absent prefix column is empty.
    pub(crate) fn field_values(&self) -> [String; 5] {
        let (ipv4, ipv6) = match self.prefix {
            IpNetwork::V4(ipv4_network) => (ipv4_network.to_string(), String::new()),
            IpNetwork::V6(ipv6_network) => (String::new(), ipv6_network.to_string()),
        };

        [
            ipv4,
            ipv6,
            self.region.to_string(),
            self.service.to_string(),
            self.network_border_group.to_string(),
        ]
    }
}

/*--------------------------------------------------------------------------------------
  Serialization
--------------------------------------------------------------------------------------*/

/// Serializes as the original record shape: `ip_prefix`/`ipv6_prefix` (exactly one of them
/// null), `region`, `service`, `network_border_group`, in declaration order.
impl Serialize for IpRange {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut record = serializer.serialize_struct("IpRange", 5)?;
        record.serialize_field("ip_prefix", &self.ipv4_prefix().map(|p| p.to_string()))?;
        record.serialize_field("ipv6_prefix", &self.ipv6_prefix().map(|p| p.to_string()))?;
        record.serialize_field("region", self.region())?;
        record.serialize_field("service", self.service())?;
        record.serialize_field("network_border_group", self.network_border_group())?;
        record.end()
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
