use console::style;

use super::Context;

pub fn run(ctx: &Context) -> anyhow::Result<()> {
    let session = ctx.session()?;
    match &session.user_label {
        Some(name) => println!("{} Logged in as {} ({})", style("✓").green(), name, session.role),
        None => println!("{} Logged in as {}", style("✓").green(), session.role),
    }
    Ok(())
}
