use tradeboard_core::Panel;

use crate::cli::SelectionArgs;
use crate::error::CliError;

use super::{AppContext, CommandResult};

pub async fn run(args: &SelectionArgs, context: &AppContext) -> Result<CommandResult, CliError> {
    let selection = context.selection(args)?;
    match context.dashboard.trend(&selection, context.mode).await {
        Ok(rendered) => Ok(context
            .result(serde_json::to_value(&rendered.view)?)
            .with_cache_hit(rendered.cache_hit)),
        Err(error) => context.failure(Panel::Trend, error),
    }
}
