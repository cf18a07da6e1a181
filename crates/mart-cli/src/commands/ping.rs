use mart_core::enums::Collection;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct PingRow {
    collection: Collection,
    reachable: bool,
}

pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut rows = Vec::with_capacity(Collection::ALL.len());
    for collection in Collection::ALL {
        rows.push(PingRow {
            collection,
            reachable: ctx.service.ping(collection).await,
        });
    }

    output(&rows, flags.format)?;
    if rows.iter().any(|row| !row.reachable) {
        anyhow::bail!("one or more collections are unreachable");
    }
    Ok(())
}
