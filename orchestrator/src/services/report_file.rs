//! Writing the final report to disk

use std::path::Path;

use shared::{logging, FinalReport, UnitId};

use crate::error::OrchestratorResult;

/// Write `report` as pretty JSON, creating missing parent directories
pub fn write_report_json(report: &FinalReport, path: &Path) -> OrchestratorResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, report.to_json_pretty()?)?;
    logging::log_success(&UnitId::Orchestrator, &format!("Final report written to {}", path.display()));
    Ok(())
}
