use crate::core::ip_range::IpRange;
use std::collections::HashMap;

/*-------------------------------------------------------------------------------------------------
  Deduplication
-------------------------------------------------------------------------------------------------*/

/// Group ranges by their CIDR string (the IPv4 prefix when present, else the IPv6 prefix).
///
/// The document publishes one entry per (prefix, service) pair, so rule-generating formatters
/// would otherwise emit the same prefix once per service:
///
/// ```text
/// allow 98.88.0.0/13; # AWS AMAZON/us-east-1
/// allow 98.88.0.0/13; # AWS EC2/us-east-1
/// ```
///
/// Grouping is plain string matching, not subnet-aware. Distinct prefixes keep first-seen
/// order; ranges within a group keep input order.
pub fn group_by_prefix(ranges: &[IpRange]) -> Vec<(String, Vec<IpRange>)> {
    let mut group_index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<IpRange>)> = Vec::new();

    for range in ranges {
        let prefix = range.prefix_string();
        match group_index.get(&prefix) {
            Some(&index) => groups[index].1.push(range.clone()),
            None => {
                group_index.insert(prefix.clone(), groups.len());
                groups.push((prefix, vec![range.clone()]));
            }
        }
    }

    groups
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
