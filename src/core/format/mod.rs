use crate::core::dedup;
use crate::core::errors::{Error, Result};
use crate::core::ip_range::IpRange;
use lazy_static::lazy_static;
use serde::ser::{Serialize, Serializer};
use std::collections::BTreeMap;

/*-------------------------------------------------------------------------------------------------
  Format Modules
-------------------------------------------------------------------------------------------------*/

pub mod cidr;
pub mod csv;
pub mod haproxy;
pub mod iptables;
pub mod json;
pub mod nginx;
pub mod text;
pub mod yaml;

/*-------------------------------------------------------------------------------------------------
  Render Data
-------------------------------------------------------------------------------------------------*/

/// Input accepted by every formatter. Callers construct the variant deliberately; formatters
/// match on the shape instead of probing the data at runtime.
#[derive(Clone, Debug)]
pub enum RenderData {
    /// A sequence of IP range records. The only shape the rule-generating formatters accept.
    Ranges(Vec<IpRange>),

    /// Heterogeneous rows of cells; row 0 is the header row.
    Rows(Vec<Vec<String>>),

    /// A flat sequence of strings, rendered one per line by the text formatter.
    Strings(Vec<String>),

    /// A single scalar value.
    Scalar(String),
}

impl RenderData {
    /// Group the ranges by their CIDR string, preserving first-seen order of distinct
    /// prefixes and input order within each group. Only valid for [RenderData::Ranges];
    /// every other shape fails with [Error::InvalidOperation].
    pub fn deduplicate(&self) -> Result<Vec<(String, Vec<IpRange>)>> {
        match self {
            RenderData::Ranges(ranges) => Ok(dedup::group_by_prefix(ranges)),
            _ => Err(Error::InvalidOperation("deduplicate")),
        }
    }
}

/// Serializes as the underlying value, so `json` and `yaml` documents carry no enum tagging.
impl Serialize for RenderData {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            RenderData::Ranges(ranges) => ranges.serialize(serializer),
            RenderData::Rows(rows) => rows.serialize(serializer),
            RenderData::Strings(strings) => strings.serialize(serializer),
            RenderData::Scalar(value) => value.serialize(serializer),
        }
    }
}

/*-------------------------------------------------------------------------------------------------
  Formatter Contract
-------------------------------------------------------------------------------------------------*/

/// A rendering strategy selected by a short format code. Implementations turn [RenderData]
/// into target-specific text and never write output themselves.
pub trait Formatter: Send + Sync {
    /// The stable format code this implementation registers under.
    fn code(&self) -> &'static str;

    /// Render the data, or fail without producing partial output.
    fn render(&self, data: &RenderData) -> Result<String>;
}

/*-------------------------------------------------------------------------------------------------
  Formatter Registry
-------------------------------------------------------------------------------------------------*/

lazy_static! {
    // One process-wide code -> formatter mapping, built once at first use.
    static ref FORMATTERS: BTreeMap<&'static str, Box<dyn Formatter>> = {
        let formatters: Vec<Box<dyn Formatter>> = vec![
            Box::new(text::TextFormatter),
            Box::new(json::JsonFormatter),
            Box::new(yaml::YamlFormatter),
            Box::new(cidr::CidrFormatter),
            Box::new(iptables::IptablesFormatter),
            Box::new(nginx::NginxFormatter),
            Box::new(haproxy::HaproxyFormatter),
            Box::new(csv::CsvFormatter),
        ];

        formatters
            .into_iter()
            .map(|formatter| (formatter.code(), formatter))
            .collect()
    };
}

/// Resolve a format code to its registered implementation; unknown codes fail with
/// [Error::UnsupportedFormat].
pub fn lookup(code: &str) -> Result<&'static dyn Formatter> {
    FORMATTERS
        .get(code)
        .map(|formatter| formatter.as_ref())
        .ok_or_else(|| Error::UnsupportedFormat(code.to_string()))
}

/// The registered format codes.
pub fn codes() -> Vec<&'static str> {
    FORMATTERS.keys().copied().collect()
}

/// Resolve a format code and render the data with it.
pub fn render(code: &str, data: &RenderData) -> Result<String> {
    lookup(code)?.render(data)
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
