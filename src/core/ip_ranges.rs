use crate::core::errors::Result;
use crate::core::ip_range::IpRange;
use crate::core::json;
use crate::core::query::Query;
use crate::core::query_results::QueryResult;
use crate::core::utils;
use chrono::{DateTime, Utc};
use ipnetwork::IpNetwork;
use std::collections::BTreeSet;
use std::rc::Rc;

/*-------------------------------------------------------------------------------------------------
  IP Ranges
-------------------------------------------------------------------------------------------------*/

/// The complete parsed AWS IP Ranges snapshot: sync metadata, the IPv4 and IPv6 range records
/// in document order, and the distinct region / service / network border group values collected
/// while parsing. Built once per run and read-only thereafter; use [IpRanges::query] to select
/// subsets.
#[derive(Clone, Debug, Default)]
pub struct IpRanges {
    pub(crate) sync_token: String,
    pub(crate) create_date: DateTime<Utc>,

    pub(crate) regions: BTreeSet<Rc<str>>,
    pub(crate) services: BTreeSet<Rc<str>>,
    pub(crate) network_border_groups: BTreeSet<Rc<str>>,

    pub(crate) ipv4_ranges: Vec<IpRange>,
    pub(crate) ipv6_ranges: Vec<IpRange>,
}

/*--------------------------------------------------------------------------------------
  IP Ranges Implementation
--------------------------------------------------------------------------------------*/

impl IpRanges {
    /*-------------------------------------------------------------------------
      Getters
    -------------------------------------------------------------------------*/

    /// Publication time of the current set of AWS IP Ranges in Unix epoch time format.
    pub fn sync_token(&self) -> &str {
        &self.sync_token
    }

    /// Publication time of the current set of AWS IP Ranges in UTC `DateTime` format.
    pub fn create_date(&self) -> &DateTime<Utc> {
        &self.create_date
    }

    /// AWS regions represented in the current set of AWS IP Ranges.
    pub fn regions(&self) -> &BTreeSet<Rc<str>> {
        &self.regions
    }

    /// AWS services represented in the current set of AWS IP Ranges.
    pub fn services(&self) -> &BTreeSet<Rc<str>> {
        &self.services
    }

    /// Network border groups represented in the current set of AWS IP Ranges.
    pub fn network_border_groups(&self) -> &BTreeSet<Rc<str>> {
        &self.network_border_groups
    }

    /// IPv4 range records in document order.
    pub fn ipv4_ranges(&self) -> &[IpRange] {
        &self.ipv4_ranges
    }

    /// IPv6 range records in document order.
    pub fn ipv6_ranges(&self) -> &[IpRange] {
        &self.ipv6_ranges
    }

    /*-------------------------------------------------------------------------
      Query
    -------------------------------------------------------------------------*/

    /// Select the ranges matching a [Query]. The same predicate runs independently over the
    /// IPv4 and IPv6 sequences; document order is preserved (stable filter, not a sort).
    ///
    /// Each call re-scans the full snapshot - O(n) over the registry size. The document holds
    /// a few thousand entries, so callers issuing many queries (for example a cross product of
    /// regions and services) simply pay the scan each time.
    pub fn query(&self, query: &Query) -> QueryResult {
        QueryResult {
            ipv4: self
                .ipv4_ranges
                .iter()
                .filter(|range| query.matches(range))
                .cloned()
                .collect(),
            ipv6: self
                .ipv6_ranges
                .iter()
                .filter(|range| query.matches(range))
                .cloned()
                .collect(),
        }
    }

    /*-------------------------------------------------------------------------
      IP Ranges from JSON
    -------------------------------------------------------------------------*/

    /// Build an [IpRanges] snapshot from the raw `ip-ranges.json` document, collecting the
    /// distinct region / service / network border group sets along the way (case preserved as
    /// published).
    pub fn from_json(json: &str) -> Result<IpRanges> {
        let json_ip_ranges = json::parse(json)?;

        let mut ip_ranges = IpRanges {
            sync_token: json_ip_ranges.sync_token.to_string(),
            create_date: json_ip_ranges.create_date,
            ..Default::default()
        };

        ip_ranges.regions = json_ip_ranges
            .prefixes
            .iter()
            .map(|prefix| prefix.region)
            .chain(
                json_ip_ranges
                    .ipv6_prefixes
                    .iter()
                    .map(|ipv6_prefix| ipv6_prefix.region),
            )
            .map(Rc::from)
            .collect();

        ip_ranges.services = json_ip_ranges
            .prefixes
            .iter()
            .map(|prefix| prefix.service)
            .chain(
                json_ip_ranges
                    .ipv6_prefixes
                    .iter()
                    .map(|ipv6_prefix| ipv6_prefix.service),
            )
            .map(Rc::from)
            .collect();

        ip_ranges.network_border_groups = json_ip_ranges
            .prefixes
            .iter()
            .map(|prefix| prefix.network_border_group)
            .chain(
                json_ip_ranges
                    .ipv6_prefixes
                    .iter()
                    .map(|ipv6_prefix| ipv6_prefix.network_border_group),
            )
            .map(Rc::from)
            .collect();

        // Range records share the interned set values instead of re-allocating per entry.
        ip_ranges.ipv4_ranges = json_ip_ranges
            .prefixes
            .iter()
            .map(|prefix| IpRange {
                prefix: IpNetwork::V4(prefix.ip_prefix),
                region: utils::get_rc_str_from_set(prefix.region, &ip_ranges.regions).unwrap(),
                service: utils::get_rc_str_from_set(prefix.service, &ip_ranges.services).unwrap(),
                network_border_group: utils::get_rc_str_from_set(
                    prefix.network_border_group,
                    &ip_ranges.network_border_groups,
                )
                .unwrap(),
            })
            .collect();

        ip_ranges.ipv6_ranges = json_ip_ranges
            .ipv6_prefixes
            .iter()
            .map(|ipv6_prefix| IpRange {
                prefix: IpNetwork::V6(ipv6_prefix.ipv6_prefix),
                region: utils::get_rc_str_from_set(ipv6_prefix.region, &ip_ranges.regions)
                    .unwrap(),
                service: utils::get_rc_str_from_set(ipv6_prefix.service, &ip_ranges.services)
                    .unwrap(),
                network_border_group: utils::get_rc_str_from_set(
                    ipv6_prefix.network_border_group,
                    &ip_ranges.network_border_groups,
                )
                .unwrap(),
            })
            .collect();

        Ok(ip_ranges)
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::errors::Error;

    /*----------------------------------------------------------------------------------
      Test Helper Functions
    ----------------------------------------------------------------------------------*/

    pub(crate) const TEST_JSON: &str = r#"{
      "syncToken": "1693526400",
      "createDate": "2023-09-01-00-00-00",
      "prefixes": [
        {
          "ip_prefix": "52.94.76.0/22",
          "region": "us-west-2",
          "service": "AMAZON",
          "network_border_group": "us-west-2"
        },
        {
          "ip_prefix": "52.94.76.0/22",
          "region": "us-west-2",
          "service": "EC2",
          "network_border_group": "us-west-2"
        },
        {
          "ip_prefix": "54.231.0.0/16",
          "region": "us-east-1",
          "service": "S3",
          "network_border_group": "us-east-1"
        },
        {
          "ip_prefix": "13.52.0.0/16",
          "region": "us-west-1",
          "service": "AMAZON",
          "network_border_group": "us-west-1"
        },
        {
          "ip_prefix": "3.5.140.0/22",
          "region": "ap-northeast-2",
          "service": "EC2",
          "network_border_group": "ap-northeast-2-wl1-sel-wlz-1"
        }
      ],
      "ipv6_prefixes": [
        {
          "ipv6_prefix": "2600:1f00::/24",
          "region": "us-east-1",
          "service": "AMAZON",
          "network_border_group": "us-east-1"
        },
        {
          "ipv6_prefix": "2600:9000::/28",
          "region": "GLOBAL",
          "service": "CLOUDFRONT",
          "network_border_group": "GLOBAL"
        }
      ]
    }"#;

    pub(crate) fn test_ip_ranges() -> IpRanges {
        IpRanges::from_json(TEST_JSON).unwrap()
    }

    /*----------------------------------------------------------------------------------
      IpRanges
    ----------------------------------------------------------------------------------*/

    #[test]
    fn test_from_json_preserves_document_order() {
        let ip_ranges = test_ip_ranges();

        assert_eq!(ip_ranges.sync_token(), "1693526400");
        assert_eq!(ip_ranges.ipv4_ranges().len(), 5);
        assert_eq!(ip_ranges.ipv6_ranges().len(), 2);

        let ipv4_prefixes: Vec<String> = ip_ranges
            .ipv4_ranges()
            .iter()
            .map(IpRange::prefix_string)
            .collect();
        assert_eq!(
            ipv4_prefixes,
            [
                "52.94.76.0/22",
                "52.94.76.0/22",
                "54.231.0.0/16",
                "13.52.0.0/16",
                "3.5.140.0/22"
            ]
        );
    }

    #[test]
    fn test_from_json_collects_distinct_values() {
        let ip_ranges = test_ip_ranges();

        let regions: Vec<&str> = ip_ranges.regions().iter().map(|r| r.as_ref()).collect();
        assert_eq!(
            regions,
            ["GLOBAL", "ap-northeast-2", "us-east-1", "us-west-1", "us-west-2"]
        );

        let services: Vec<&str> = ip_ranges.services().iter().map(|s| s.as_ref()).collect();
        assert_eq!(services, ["AMAZON", "CLOUDFRONT", "EC2", "S3"]);

        let network_border_groups: Vec<&str> = ip_ranges
            .network_border_groups()
            .iter()
            .map(|g| g.as_ref())
            .collect();
        assert_eq!(
            network_border_groups,
            [
                "GLOBAL",
                "ap-northeast-2-wl1-sel-wlz-1",
                "us-east-1",
                "us-west-1",
                "us-west-2"
            ]
        );
    }

    #[test]
    fn test_from_json_interns_shared_values() {
        let ip_ranges = test_ip_ranges();

        let first = &ip_ranges.ipv4_ranges()[0];
        let second = &ip_ranges.ipv4_ranges()[1];
        assert!(Rc::ptr_eq(&first.region, &second.region));
        assert!(Rc::ptr_eq(
            &first.network_border_group,
            &second.network_border_group
        ));
    }

    #[test]
    fn test_from_json_malformed_document() {
        let error = IpRanges::from_json(r#"{"prefixes": []}"#).unwrap_err();
        assert!(matches!(error, Error::MalformedDocument(_)));
    }
}
