use std::path::Path;

use ccase_operations::providers::ChangeReport;

use super::StatusFormatter;
use crate::error::Result;

pub(crate) struct JsonStatusFormatter;

impl StatusFormatter for JsonStatusFormatter {
    fn format_status(&self, report: &ChangeReport, _root: &Path) -> Result<String> {
        let mut output = serde_json::to_string_pretty(report)?;
        output.push('\n');
        Ok(output)
    }
}
