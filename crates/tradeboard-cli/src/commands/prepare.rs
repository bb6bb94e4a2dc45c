use serde_json::json;
use tradeboard_core::DashboardConfig;

use crate::cli::PrepareArgs;
use crate::error::CliError;
use crate::prepare::prepare_file;

use super::CommandResult;

pub fn run(args: &PrepareArgs, config: &DashboardConfig) -> Result<CommandResult, CliError> {
    let output = args.output.clone().unwrap_or_else(|| config.data_path.clone());
    let report = prepare_file(&args.input, &output)?;

    let mut warnings = Vec::new();
    if report.unexpected_layout {
        warnings.push(String::from(
            "raw export columns differ from the expected layout",
        ));
    }
    if report.incomplete_groups > 0 {
        warnings.push(format!(
            "{} group(s) lack an export or import value and have no net trade row",
            report.incomplete_groups
        ));
    }

    let data = json!({
        "input": args.input.display().to_string(),
        "output": output.display().to_string(),
        "report": report,
    });
    Ok(CommandResult::ok(data, output.display().to_string()).with_warnings(warnings))
}
