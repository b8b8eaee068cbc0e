use crate::commands::utils::AppContext;
use anyhow::{Context, Result};
use std::path::Path;

pub async fn upload(ctx: &AppContext, file: &Path) -> Result<()> {
    let token = ctx
        .session
        .token()
        .await
        .context("not logged in; run `poliq login` first")?;

    let uploaded = ctx.documents.upload(file, &token).await?;
    println!(
        "Uploaded {} (document id: {})",
        uploaded.document.name, uploaded.document.id
    );

    if let Some(snippet) = uploaded.snippet {
        println!("\nExtracted preview:\n{}", snippet);
    }

    Ok(())
}
