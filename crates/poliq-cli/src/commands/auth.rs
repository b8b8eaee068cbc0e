use crate::commands::utils::AppContext;
use anyhow::Result;

pub async fn login(ctx: &AppContext, username: &str, password: &str) -> Result<()> {
    ctx.session.login(username, password).await?;
    println!("Logged in as {}", username);
    Ok(())
}

pub async fn register(
    ctx: &AppContext,
    username: &str,
    email: &str,
    password: &str,
) -> Result<()> {
    ctx.session.register(username, email, password).await?;
    println!("Registered {} and logged in", username);
    Ok(())
}

pub async fn logout(ctx: &AppContext) -> Result<()> {
    ctx.session.logout().await?;
    println!("Logged out");
    Ok(())
}

pub async fn status(ctx: &AppContext) -> Result<()> {
    if ctx.session.is_authenticated().await {
        println!("Session:  logged in");
    } else {
        println!("Session:  not logged in");
    }

    match ctx.documents.current().await {
        Some(document) => println!("Document: {} ({})", document.name, document.id),
        None => println!("Document: none uploaded"),
    }

    println!("History:  {} entries", ctx.history.len().await);
    Ok(())
}
