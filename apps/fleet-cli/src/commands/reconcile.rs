use chrono::NaiveDate;
use serde::Serialize;

use fleet_rental::ReconciliationReport;

use super::Context;
use crate::error::CliResult;

#[derive(Debug, Serialize)]
pub struct SweepResult {
    pub as_of: NaiveDate,
    pub fine_multiplier: String,
    #[serde(flatten)]
    pub report: ReconciliationReport,
}

pub async fn reconcile(ctx: &Context) -> CliResult<SweepResult> {
    let report = ctx.manager.check_and_apply_overdue_fines().await?;
    Ok(SweepResult {
        as_of: ctx.clock.today(),
        fine_multiplier: ctx.manager.settings().overdue_fine_multiplier.to_string(),
        report,
    })
}
