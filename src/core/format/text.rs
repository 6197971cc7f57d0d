use crate::core::errors::Result;
use crate::core::format::{Formatter, RenderData};
use crate::core::ip_range::IpRange;

/*-------------------------------------------------------------------------------------------------
  Text Formatter
-------------------------------------------------------------------------------------------------*/

/// Plain text output. Range and row data render as a markdown-style table; string sequences
/// render one element per line; a scalar renders as-is. Empty sequences render the empty
/// string.
pub struct TextFormatter;

impl Formatter for TextFormatter {
    fn code(&self) -> &'static str {
        "text"
    }

    fn render(&self, data: &RenderData) -> Result<String> {
        match data {
            RenderData::Ranges(ranges) => {
                if ranges.is_empty() {
                    return Ok(String::new());
                }

                let header: Vec<String> = IpRange::FIELD_NAMES
                    .iter()
                    .map(|name| name.to_string())
                    .collect();
                let rows: Vec<Vec<String>> = ranges
                    .iter()
                    .map(|range| range.field_values().to_vec())
                    .collect();

                Ok(table(&header, &rows))
            }

            RenderData::Rows(rows) => match rows.split_first() {
                Some((header, body)) => Ok(table(header, body)),
                None => Ok(String::new()),
            },

            RenderData::Strings(strings) => {
                let mut text = String::new();
                for value in strings {
                    text.push_str(value);
                    text.push('\n');
                }
                Ok(text)
            }

            RenderData::Scalar(value) => Ok(value.clone()),
        }
    }
}

/*--------------------------------------------------------------------------------------
  Table Layout
--------------------------------------------------------------------------------------*/

/// Markdown-style table: columns left-padded to the widest cell, ` | ` column joints, and a
/// `-+-` dashed separator under the header.
fn table(header: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = header.iter().map(String::len).collect();
    for row in rows {
        for (column, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(column) {
                *width = (*width).max(cell.len());
            }
        }
    }

    let render_row = |cells: &[String]| -> String {
        widths
            .iter()
            .enumerate()
            .map(|(column, width)| {
                let cell = cells.get(column).map(String::as_str).unwrap_or("");
                format!("{cell:<width$}")
            })
            .collect::<Vec<String>>()
            .join(" | ")
    };

    let mut text = render_row(header);
    text.push('\n');
    text.push_str(
        &widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<String>>()
            .join("-+-"),
    );
    text.push('\n');

    for row in rows {
        text.push_str(&render_row(row));
        text.push('\n');
    }

    text
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ip_range::tests::test_ipv4_range;

    #[test]
    fn test_render_ranges_as_table() {
        let data = RenderData::Ranges(vec![test_ipv4_range()]);
        let text = TextFormatter.render(&data).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3); // header, separator, one data row
        assert!(lines[0].starts_with("ip_prefix |"));
        assert!(lines[1].contains("-+-"));
        assert!(lines[2].starts_with("10.0.0.0/8"));
        assert!(lines[2].contains("| EC2"));

        // Every line is padded to the same width.
        assert_eq!(lines[0].len(), lines[1].len());
        assert_eq!(lines[0].len(), lines[2].len());
    }

    #[test]
    fn test_render_rows_uses_first_row_as_header() {
        let data = RenderData::Rows(vec![
            vec!["ID".to_string(), "Name".to_string()],
            vec!["1".to_string(), "One".to_string()],
            vec!["2".to_string(), "Two".to_string()],
        ]);
        let text = TextFormatter.render(&data).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "ID | Name");
        assert_eq!(lines[1], "---+-----");
        assert_eq!(lines[2], "1  | One ");
        assert_eq!(lines[3], "2  | Two ");
    }

    #[test]
    fn test_render_strings_one_per_line() {
        let data = RenderData::Strings(vec!["us-east-1".to_string(), "us-west-2".to_string()]);
        let text = TextFormatter.render(&data).unwrap();
        assert_eq!(text, "us-east-1\nus-west-2\n");
    }

    #[test]
    fn test_render_scalar() {
        let data = RenderData::Scalar("1693526400".to_string());
        assert_eq!(TextFormatter.render(&data).unwrap(), "1693526400");
    }

    #[test]
    fn test_render_empty_sequences() {
        assert_eq!(
            TextFormatter.render(&RenderData::Ranges(vec![])).unwrap(),
            ""
        );
        assert_eq!(TextFormatter.render(&RenderData::Rows(vec![])).unwrap(), "");
        assert_eq!(
            TextFormatter.render(&RenderData::Strings(vec![])).unwrap(),
            ""
        );
    }
}
