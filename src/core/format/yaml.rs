use crate::core::errors::Result;
use crate::core::format::{Formatter, RenderData};

/*-------------------------------------------------------------------------------------------------
  YAML Formatter
-------------------------------------------------------------------------------------------------*/

/// Renders any [RenderData] shape as a YAML document in block (non-flow) style.
pub struct YamlFormatter;

impl Formatter for YamlFormatter {
    fn code(&self) -> &'static str {
        "yaml"
    }

    fn render(&self, data: &RenderData) -> Result<String> {
        Ok(serde_yaml::to_string(data)?)
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
