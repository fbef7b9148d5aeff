use clap::Args;
use console::style;
use wishr_core::error::WishrError;
use wishr_core::models::item::ItemId;
use wishr_core::models::session::{Role, Session};
use wishr_core::store::Store;
use wishr_core::Wishlist;

use super::{list, open_wishlist, prompt_line, Context};

#[derive(Args)]
pub struct BuyArgs {
    /// Item id (or a unique prefix of it)
    id: String,
    /// Name of the buyer (will prompt if not provided)
    #[arg(long)]
    buyer: Option<String>,
    /// Skip the confirmation question
    #[arg(long, short)]
    yes: bool,
}

pub fn run(args: BuyArgs, ctx: &Context) -> anyhow::Result<()> {
    let session = ctx.session()?;
    let (config, mut wishlist) = open_wishlist()?;

    let (id, name) = buyable_item(&wishlist, &session, &args.id)?;

    // The purchase is only a draft until the buyer is confirmed.
    let buyer = match args.buyer {
        Some(b) => b,
        None => prompt_line("Your name", session.user_label.as_deref())?,
    };
    if buyer.trim().is_empty() {
        anyhow::bail!("Write your name first");
    }
    if !args.yes {
        let question = format!("Mark '{name}' as bought by {}? (y/n)", buyer.trim());
        let answer = prompt_line(&question, Some("y"))?;
        if !answer.eq_ignore_ascii_case("y") && !answer.eq_ignore_ascii_case("yes") {
            println!("Cancelled");
            return Ok(());
        }
    }

    let item = wishlist.mark_bought(&session, &id, &buyer)?;
    if let Some(purchase) = item.purchase() {
        println!(
            "{} '{}' marked as bought by {}",
            style("✓").green(),
            item.name(),
            purchase.bought_by
        );
    }

    wishlist.reload()?;
    list::render(&wishlist, &session, &config);
    Ok(())
}

/// Look up an item a viewer may still buy, before asking for a buyer name.
/// The same checks run again inside `Wishlist::mark_bought`.
pub fn buyable_item<S: Store>(
    wishlist: &Wishlist<S>,
    session: &Session,
    prefix: &str,
) -> Result<(ItemId, String), WishrError> {
    session.require(Role::Viewer, "mark items bought")?;
    let item = wishlist.resolve(prefix)?;
    if let Some(purchase) = item.purchase() {
        return Err(WishrError::AlreadyBought {
            id: item.id().to_string(),
            bought_by: purchase.bought_by.clone(),
        });
    }
    Ok((item.id().clone(), item.name().to_string()))
}
