use crate::core::errors::{Error, Result};
use crate::core::format::{Formatter, RenderData};

/*-------------------------------------------------------------------------------------------------
  HAProxy Formatter
-------------------------------------------------------------------------------------------------*/

/// Reserved format code. The intended output is an ACL-based allow/deny block:
///
/// ```text
/// acl aws_ips src 203.0.113.0/24 198.51.100.0/24
/// http-request allow if aws_ips
/// http-request deny
/// ```
pub struct HaproxyFormatter;

impl Formatter for HaproxyFormatter {
    fn code(&self) -> &'static str {
        "haproxy"
    }

    fn render(&self, _data: &RenderData) -> Result<String> {
        Err(Error::NotImplemented("haproxy"))
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
