use tradeboard_core::Panel;

use crate::cli::SelectionArgs;
use crate::error::CliError;

use super::{AppContext, CommandResult};

pub async fn run(args: &SelectionArgs, context: &AppContext) -> Result<CommandResult, CliError> {
    let selection = context.selection(args)?;
    let rendered = match context.dashboard.composition(&selection, context.mode).await {
        Ok(rendered) => rendered,
        Err(error) => return context.failure(Panel::Composition, error),
    };

    let mut result = context
        .result(serde_json::to_value(&rendered.view)?)
        .with_cache_hit(rendered.cache_hit);
    if rendered.view.slices.is_empty() {
        result = result.with_warning(format!(
            "no {} rows by category for {} in {}",
            selection.trade_type, selection.geo, selection.year
        ));
    }
    Ok(result)
}
