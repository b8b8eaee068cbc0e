use crate::commands::utils::AppContext;
use anyhow::Result;

pub async fn list(ctx: &AppContext) -> Result<()> {
    let entries = ctx.history.entries().await;
    if entries.is_empty() {
        println!("No past queries found");
        return Ok(());
    }

    for entry in entries {
        println!("{}  {}  [{}]", entry.id, entry.timestamp, entry.document);
        println!("    {}", entry.text);
    }
    Ok(())
}

pub async fn show(ctx: &AppContext, id: &str) -> Result<()> {
    let entry = ctx.usecase.reuse(id).await?;

    println!("Question ({}, {}):", entry.document, entry.timestamp);
    println!("  {}", entry.text);
    match entry.response {
        Some(response) => {
            println!("Answer:");
            println!("  {}", response.summary);
        }
        None => println!("No answer recorded"),
    }
    Ok(())
}

pub async fn remove(ctx: &AppContext, id: &str) -> Result<()> {
    if ctx.history.remove(id).await? {
        println!("Removed {}", id);
    } else {
        println!("No history entry with id {}", id);
    }
    Ok(())
}
