//! Query the AWS IP Ranges and render firewall-ready allow lists.
//!
//! `awsiprules` downloads the published
//! [AWS IP address ranges](https://docs.aws.amazon.com/vpc/latest/userguide/aws-ip-ranges.html)
//! document, filters it by region, service, network border group, or prefix pattern, and
//! renders the selection as plain text, JSON, YAML, a bare CIDR list, or deduplicated nginx /
//! iptables rules.
//!
//! ```no_run
//! # fn main() -> awsiprules::Result<()> {
//! // Get the AWS IP Ranges
//! let ip_ranges = awsiprules::get_ranges()?;
//!
//! // Select the S3 ranges in us-east-1
//! let query = awsiprules::QueryBuilder::new()
//!     .service("S3")
//!     .region("us-east-1")
//!     .build()?;
//! let result = ip_ranges.query(&query);
//!
//! // Render them as an nginx allow list
//! let data = awsiprules::RenderData::Ranges(result.all());
//! let config = awsiprules::format::render("nginx", &data)?;
//! println!("{config}");
//! # Ok(())
//! # }
//! ```

mod core;

/*-------------------------------------------------------------------------------------------------
  Library Interface
-------------------------------------------------------------------------------------------------*/

pub use crate::core::client::{get_ranges, Client, ClientBuilder};
pub use crate::core::errors::{Error, Result};
pub use crate::core::format::{self, Formatter, RenderData};
pub use crate::core::ip_range::IpRange;
pub use crate::core::ip_ranges::IpRanges;
pub use crate::core::query::{MatchMode, Query, QueryBuilder};
pub use crate::core::query_results::QueryResult;
