use crate::commands::utils::AppContext;
use anyhow::Result;
use poliq_api::Feedback;

pub async fn ask(ctx: &AppContext, question: &str) -> Result<()> {
    let response = ctx.usecase.ask(question).await?;

    println!("{}", response.summary);

    if !response.details.is_empty() {
        println!();
        for detail in &response.details {
            println!("  - {}", detail);
        }
    }
    if !response.suggestions.is_empty() {
        println!("\nYou could also ask:");
        for suggestion in &response.suggestions {
            println!("  - {}", suggestion);
        }
    }

    Ok(())
}

pub async fn feedback(ctx: &AppContext, rating: Feedback) -> Result<()> {
    let message = ctx.usecase.send_feedback(rating).await?;
    println!("{}", message);
    Ok(())
}
