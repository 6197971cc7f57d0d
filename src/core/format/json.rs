use crate::core::errors::Result;
use crate::core::format::{Formatter, RenderData};

/*-------------------------------------------------------------------------------------------------
  JSON Formatter
-------------------------------------------------------------------------------------------------*/

/// Renders any [RenderData] shape as a JSON document. Range records serialize as ordered
/// field:value mappings in record declaration order.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn code(&self) -> &'static str {
        "json"
    }

    fn render(&self, data: &RenderData) -> Result<String> {
        Ok(serde_json::to_string(data)?)
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
