use crate::core::errors::{Error, Result};
use crate::core::format::{Formatter, RenderData};

/*-------------------------------------------------------------------------------------------------
  CIDR Formatter
-------------------------------------------------------------------------------------------------*/

/// A bare list of CIDR prefixes, one per line in input order - the shape most Unix tooling
/// expects to consume. Only accepts range data.
pub struct CidrFormatter;

impl Formatter for CidrFormatter {
    fn code(&self) -> &'static str {
        "cidr"
    }

    fn render(&self, data: &RenderData) -> Result<String> {
        let RenderData::Ranges(ranges) = data else {
            return Err(Error::InvalidInput("cidr"));
        };

        let mut text = String::new();
        for range in ranges {
            text.push_str(&range.prefix_string());
            text.push('\n');
        }
        Ok(text)
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ip_range::tests::{test_ipv4_range, test_ipv6_range};

    #[test]
    fn test_render_one_prefix_per_line() {
        let data = RenderData::Ranges(vec![test_ipv4_range(), test_ipv6_range()]);
        let text = CidrFormatter.render(&data).unwrap();
        assert_eq!(text, "10.0.0.0/8\n2001:db8::/32\n");
    }

    #[test]
    fn test_render_rejects_non_range_data() {
        let data = RenderData::Strings(vec!["10.0.0.0/8".to_string()]);
        let error = CidrFormatter.render(&data).unwrap_err();
        assert!(matches!(error, Error::InvalidInput("cidr")));
    }
}
