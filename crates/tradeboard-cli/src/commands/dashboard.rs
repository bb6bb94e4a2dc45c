use serde::Serialize;
use serde_json::{json, Value};
use tradeboard_core::{CoreError, EnvelopeError, Rendered};

use crate::cli::SelectionArgs;
use crate::error::CliError;

use super::{AppContext, CommandResult};

pub async fn run(args: &SelectionArgs, context: &AppContext) -> Result<CommandResult, CliError> {
    let selection = context.selection(args)?;
    let render = context.dashboard.render(&selection, context.mode).await;

    let errors = render
        .failures()
        .into_iter()
        .map(|(panel, error)| {
            EnvelopeError::new(error.code(), error.to_string())
                .map(|envelope_error| envelope_error.with_view(panel.as_str()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let data = json!({
        "selection": selection,
        "panels": {
            "summary": panel_value(&render.summary)?,
            "composition": panel_value(&render.composition)?,
            "trend": panel_value(&render.trend)?,
            "map": panel_value(&render.map)?,
        },
    });

    Ok(context
        .result(data)
        .with_errors(errors)
        .with_cache_hit(render.cache_hit()))
}

/// Failed panels render as `null`; the error list says why.
fn panel_value<T: Serialize>(
    panel: &Result<Rendered<T>, CoreError>,
) -> Result<Value, serde_json::Error> {
    match panel {
        Ok(rendered) => serde_json::to_value(&rendered.view),
        Err(_) => Ok(Value::Null),
    }
}
