use serde_json::json;

use crate::error::CliError;

use super::{AppContext, CommandResult};

pub fn run(context: &AppContext) -> Result<CommandResult, CliError> {
    let table = context.dashboard.table();
    let data = json!({
        "options": table.filter_options(),
        "landing": context.dashboard.landing_selection(),
        "load_report": table.report(),
    });
    Ok(context.result(data))
}
