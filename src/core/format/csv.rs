use crate::core::errors::{Error, Result};
use crate::core::format::{Formatter, RenderData};

/*-------------------------------------------------------------------------------------------------
  CSV Formatter
-------------------------------------------------------------------------------------------------*/

/// Reserved format code. The intended output is a header line followed by one row per range:
///
/// ```text
/// ip_prefix,region,service,network_border_group
/// 203.0.113.0/24,us-west-2,AMAZON,us-west-2
/// ```
///
/// The `--csv <path>` file export covers the use case in the meantime.
pub struct CsvFormatter;

impl Formatter for CsvFormatter {
    fn code(&self) -> &'static str {
        "csv"
    }

    fn render(&self, _data: &RenderData) -> Result<String> {
        Err(Error::NotImplemented("csv"))
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_is_not_implemented() {
        let error = CsvFormatter
            .render(&RenderData::Strings(vec![]))
            .unwrap_err();
        assert!(matches!(error, Error::NotImplemented("csv")));
    }
}
