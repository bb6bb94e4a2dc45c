use std::collections::BTreeMap;

use serde_json::Value;
use tradeboard_core::Panel;

use crate::cli::MapArgs;
use crate::error::CliError;

use super::{AppContext, CommandResult};

pub async fn run(args: &MapArgs, context: &AppContext) -> Result<CommandResult, CliError> {
    let selection = context.selection(&args.selection)?;
    let rendered = match context.dashboard.map(&selection, context.mode).await {
        Ok(rendered) => rendered,
        Err(error) => return context.failure(Panel::Map, error),
    };

    let mut data = serde_json::to_value(&rendered.view)?;
    if args.with_geometry {
        let shapes = context.dashboard.shapes();
        let geometries = rendered
            .view
            .regions
            .iter()
            .filter_map(|region| {
                shapes
                    .get(&region.geo)
                    .map(|shape| (region.geo.to_string(), shape.geometry.clone()))
            })
            .collect::<BTreeMap<_, _>>();
        if let Value::Object(fields) = &mut data {
            fields.insert(String::from("geometries"), serde_json::to_value(geometries)?);
        }
    }

    Ok(context.result(data).with_cache_hit(rendered.cache_hit))
}
