use crate::core::errors::{Error, Result};
use crate::core::ip_range::IpRange;
use log::trace;
use regex::{Regex, RegexBuilder};
use std::str::FromStr;

/*-------------------------------------------------------------------------------------------------
  Match Mode
-------------------------------------------------------------------------------------------------*/

/// How a prefix pattern is matched against a range's CIDR string.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum MatchMode {
    /// The CIDR string starts with the pattern.
    #[default]
    Prefix,
    /// The pattern occurs anywhere in the CIDR string.
    Substr,
    /// The pattern is a regular expression searched against the CIDR string.
    Regex,
}

impl FromStr for MatchMode {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "prefix" => Ok(MatchMode::Prefix),
            "substr" => Ok(MatchMode::Substr),
            "regex" => Ok(MatchMode::Regex),
            other => Err(Error::UnsupportedMatchMode(other.to_string())),
        }
    }
}

/*-------------------------------------------------------------------------------------------------
  Prefix Matcher
-------------------------------------------------------------------------------------------------*/

#[derive(Clone, Debug)]
pub(crate) enum PrefixMatcher {
    /// No prefix filter; matches every range.
    Any,
    Prefix(String),
    Substr(String),
    Regex(Regex),
}

impl PrefixMatcher {
    /// An empty pattern always matches, whatever the mode. Regex patterns compile with
    /// multi-line mode as the default flag and are considered a match only when a non-empty
    /// match is found.
    fn new(pattern: &str, mode: MatchMode) -> Result<Self> {
        if pattern.is_empty() {
            return Ok(PrefixMatcher::Any);
        }

        match mode {
            MatchMode::Prefix => Ok(PrefixMatcher::Prefix(pattern.to_string())),
            MatchMode::Substr => Ok(PrefixMatcher::Substr(pattern.to_string())),
            MatchMode::Regex => {
                let regex = RegexBuilder::new(pattern).multi_line(true).build()?;
                Ok(PrefixMatcher::Regex(regex))
            }
        }
    }

    fn matches(&self, prefix: &str) -> bool {
        match self {
            PrefixMatcher::Any => true,
            PrefixMatcher::Prefix(pattern) => prefix.starts_with(pattern),
            PrefixMatcher::Substr(pattern) => prefix.contains(pattern),
            PrefixMatcher::Regex(regex) => regex
                .find(prefix)
                .is_some_and(|found| !found.as_str().is_empty()),
        }
    }
}

/*-------------------------------------------------------------------------------------------------
  Query Builder
-------------------------------------------------------------------------------------------------*/

/// Builder used to construct a [Query] with the desired criteria. Every criterion defaults to
/// "match all" (`"*"` selectors, empty prefix pattern, [MatchMode::Prefix]).
///
/// ```rust
/// # fn main() -> awsiprules::Result<()> {
/// let query = awsiprules::QueryBuilder::new()
///     .service("EC2")
///     .region("us-east-1")
///     .prefix_pattern("52.")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct QueryBuilder {
    service: String,
    region: String,
    network_border_group: String,
    prefix_pattern: String,
    match_mode: MatchMode,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self {
            service: "*".to_string(),
            region: "*".to_string(),
            network_border_group: "*".to_string(),
            prefix_pattern: String::new(),
            match_mode: MatchMode::default(),
        }
    }
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /*-------------------------------------------------------------------------
      Setters
    -------------------------------------------------------------------------*/

    /// Match this AWS service, case-insensitively; `"*"` matches every service.
    pub fn service(mut self, service: &str) -> Self {
        self.service = service.to_string();
        self
    }

    /// Match this AWS region, case-insensitively; `"*"` matches every region.
    pub fn region(mut self, region: &str) -> Self {
        self.region = region.to_string();
        self
    }

    /// Match this network border group exactly; `"*"` matches every group.
    pub fn network_border_group(mut self, network_border_group: &str) -> Self {
        self.network_border_group = network_border_group.to_string();
        self
    }

    /// Match range CIDR strings against this pattern; an empty pattern matches everything.
    pub fn prefix_pattern(mut self, prefix_pattern: &str) -> Self {
        self.prefix_pattern = prefix_pattern.to_string();
        self
    }

    /// Set how the prefix pattern is matched; defaults to [MatchMode::Prefix].
    pub fn match_mode(mut self, match_mode: MatchMode) -> Self {
        self.match_mode = match_mode;
        self
    }

    /*-------------------------------------------------------------------------
      Build Method
    -------------------------------------------------------------------------*/

    /// Build the [Query]. Fails with [Error::InvalidPattern] when a regex pattern does not
    /// compile.
    pub fn build(self) -> Result<Query> {
        Ok(Query {
            service: (self.service != "*").then(|| self.service.to_uppercase()),
            region: (self.region != "*").then(|| self.region.to_lowercase()),
            network_border_group: (self.network_border_group != "*")
                .then_some(self.network_border_group),
            prefix_matcher: PrefixMatcher::new(&self.prefix_pattern, self.match_mode)?,
        })
    }
}

/*-------------------------------------------------------------------------------------------------
  Query
-------------------------------------------------------------------------------------------------*/

/// Filter criteria for [IpRanges::query](crate::IpRanges::query). All four criteria are
/// AND-combined and evaluated independently per range. Use the [QueryBuilder] to construct one.
#[derive(Clone, Debug)]
pub struct Query {
    /// Upper-cased service selector; `None` matches every service.
    service: Option<String>,

    /// Lower-cased region selector; `None` matches every region.
    region: Option<String>,

    /// Exact network border group selector; `None` matches every group.
    network_border_group: Option<String>,

    prefix_matcher: PrefixMatcher,
}

/*--------------------------------------------------------------------------------------
  Query Implementation
--------------------------------------------------------------------------------------*/

impl Query {
    /*-------------------------------------------------------------------------
      Match Functions
    -------------------------------------------------------------------------*/

    pub(crate) fn match_service(&self, range: &IpRange) -> bool {
        if let Some(service) = &self.service {
            range.service().to_uppercase() == *service
        } else {
            trace!("No `service` criterion");
            true
        }
    }

    pub(crate) fn match_region(&self, range: &IpRange) -> bool {
        if let Some(region) = &self.region {
            range.region().to_lowercase() == *region
        } else {
            trace!("No `region` criterion");
            true
        }
    }

    pub(crate) fn match_network_border_group(&self, range: &IpRange) -> bool {
        if let Some(network_border_group) = &self.network_border_group {
            range.network_border_group() == network_border_group.as_str()
        } else {
            trace!("No `network_border_group` criterion");
            true
        }
    }

    pub(crate) fn match_prefix(&self, range: &IpRange) -> bool {
        self.prefix_matcher.matches(&range.prefix_string())
    }

    /// Check whether a range satisfies every criterion.
    pub fn matches(&self, range: &IpRange) -> bool {
        let criteria = [
            Query::match_service,
            Query::match_region,
            Query::match_network_border_group,
            Query::match_prefix,
        ];
        criteria.iter().all(|criterion| criterion(self, range))
    }
}

impl Default for Query {
    fn default() -> Self {
        QueryBuilder::default().build().expect("default query builds")
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ip_range::tests::{test_ipv4_range, test_ipv6_range};
    use crate::core::ip_ranges::tests::test_ip_ranges;

    /*----------------------------------------------------------------------------------
      Match Mode
    ----------------------------------------------------------------------------------*/

    #[test]
    fn test_match_mode_from_str() {
        assert_eq!("prefix".parse::<MatchMode>().unwrap(), MatchMode::Prefix);
        assert_eq!("substr".parse::<MatchMode>().unwrap(), MatchMode::Substr);
        assert_eq!("regex".parse::<MatchMode>().unwrap(), MatchMode::Regex);

        let error = "glob".parse::<MatchMode>().unwrap_err();
        assert!(matches!(error, Error::UnsupportedMatchMode(mode) if mode == "glob"));
    }

    /*----------------------------------------------------------------------------------
      Query Criteria
    ----------------------------------------------------------------------------------*/

    #[test]
    fn test_wildcard_query_matches_everything() {
        let query = Query::default();

        assert!(query.matches(&test_ipv4_range()));
        assert!(query.matches(&test_ipv6_range()));
    }

    #[test]
    fn test_match_service_is_case_insensitive() {
        let query = QueryBuilder::new().service("ec2").build().unwrap();
        assert!(query.match_service(&test_ipv4_range()));

        let query = QueryBuilder::new().service("S3").build().unwrap();
        assert!(!query.match_service(&test_ipv4_range()));
    }

    #[test]
    fn test_match_region_is_case_insensitive() {
        let query = QueryBuilder::new().region("US-EAST-1").build().unwrap();
        assert!(query.match_region(&test_ipv4_range()));

        let query = QueryBuilder::new().region("us-west-1").build().unwrap();
        assert!(!query.match_region(&test_ipv4_range()));
    }

    #[test]
    fn test_match_network_border_group_is_exact() {
        let query = QueryBuilder::new()
            .network_border_group("us-east-1")
            .build()
            .unwrap();
        assert!(query.match_network_border_group(&test_ipv4_range()));

        // Unlike region matching, border group matching is case-sensitive.
        let query = QueryBuilder::new()
            .network_border_group("US-EAST-1")
            .build()
            .unwrap();
        assert!(!query.match_network_border_group(&test_ipv4_range()));
    }

    #[test]
    fn test_match_prefix_modes() {
        let range = test_ipv4_range(); // 10.0.0.0/8

        let starts_with = QueryBuilder::new().prefix_pattern("10.").build().unwrap();
        assert!(starts_with.match_prefix(&range));

        let starts_with_miss = QueryBuilder::new().prefix_pattern("0.0").build().unwrap();
        assert!(!starts_with_miss.match_prefix(&range));

        let substr = QueryBuilder::new()
            .prefix_pattern("0.0")
            .match_mode(MatchMode::Substr)
            .build()
            .unwrap();
        assert!(substr.match_prefix(&range));

        let regex = QueryBuilder::new()
            .prefix_pattern(r"^10\..*/8$")
            .match_mode(MatchMode::Regex)
            .build()
            .unwrap();
        assert!(regex.match_prefix(&range));

        let regex_miss = QueryBuilder::new()
            .prefix_pattern(r"^192\.")
            .match_mode(MatchMode::Regex)
            .build()
            .unwrap();
        assert!(!regex_miss.match_prefix(&range));
    }

    #[test]
    fn test_empty_prefix_pattern_matches_all_modes() {
        for mode in [MatchMode::Prefix, MatchMode::Substr, MatchMode::Regex] {
            let query = QueryBuilder::new()
                .prefix_pattern("")
                .match_mode(mode)
                .build()
                .unwrap();
            assert!(query.match_prefix(&test_ipv4_range()));
        }
    }

    #[test]
    fn test_invalid_regex_pattern() {
        let error = QueryBuilder::new()
            .prefix_pattern("[")
            .match_mode(MatchMode::Regex)
            .build()
            .unwrap_err();
        assert!(matches!(error, Error::InvalidPattern(_)));
    }

    /*----------------------------------------------------------------------------------
      Query Against a Snapshot
    ----------------------------------------------------------------------------------*/

    #[test]
    fn test_query_wildcards_return_every_range() {
        let ip_ranges = test_ip_ranges();

        let result = ip_ranges.query(&Query::default());

        assert_eq!(result.ipv4(), ip_ranges.ipv4_ranges());
        assert_eq!(result.ipv6(), ip_ranges.ipv6_ranges());
    }

    #[test]
    fn test_query_by_service() {
        let ip_ranges = test_ip_ranges();

        let query = QueryBuilder::new().service("ec2").build().unwrap();
        let result = ip_ranges.query(&query);

        assert_eq!(result.ipv4().len(), 2);
        assert!(result.ipv4().iter().all(|range| range.service() == "EC2"));
        assert!(result.ipv6().is_empty());
    }

    #[test]
    fn test_query_absent_service_returns_empty_result() {
        let ip_ranges = test_ip_ranges();

        let query = QueryBuilder::new().service("NO_SUCH_SERVICE").build().unwrap();
        let result = ip_ranges.query(&query);

        assert!(result.ipv4().is_empty());
        assert!(result.ipv6().is_empty());
    }

    #[test]
    fn test_query_prefix_vs_substr() {
        let ip_ranges = test_ip_ranges();

        let prefix_query = QueryBuilder::new().prefix_pattern("52.").build().unwrap();
        let prefix_result = ip_ranges.query(&prefix_query);
        assert_eq!(prefix_result.ipv4().len(), 2);

        // "52" also occurs mid-string (13.52.0.0/16), so substr matching returns a strict
        // superset.
        let substr_query = QueryBuilder::new()
            .prefix_pattern("52")
            .match_mode(MatchMode::Substr)
            .build()
            .unwrap();
        let substr_result = ip_ranges.query(&substr_query);
        assert_eq!(substr_result.ipv4().len(), 3);
    }

    #[test]
    fn test_query_combines_criteria_with_and() {
        let ip_ranges = test_ip_ranges();

        let query = QueryBuilder::new()
            .service("EC2")
            .region("us-west-2")
            .build()
            .unwrap();
        let result = ip_ranges.query(&query);

        assert_eq!(result.ipv4().len(), 1);
        assert_eq!(result.ipv4()[0].prefix_string(), "52.94.76.0/22");
    }
}
