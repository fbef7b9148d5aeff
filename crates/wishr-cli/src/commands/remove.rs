use clap::Args;
use console::style;
use wishr_core::error::WishrError;
use wishr_core::models::item::WishlistItem;
use wishr_core::models::session::{Role, Session};
use wishr_core::store::Store;
use wishr_core::Wishlist;

use super::{list, open_wishlist, Context};

#[derive(Args)]
pub struct RemoveArgs {
    /// Item id (or a unique prefix of it)
    id: String,
}

pub fn run(args: RemoveArgs, ctx: &Context) -> anyhow::Result<()> {
    let session = ctx.session()?;
    let (config, mut wishlist) = open_wishlist()?;

    let removed = remove_item(&mut wishlist, &session, &args.id)?;
    println!(
        "{} '{}' was removed from the wishlist",
        style("✓").green(),
        removed.name()
    );

    wishlist.reload()?;
    list::render(&wishlist, &session, &config);
    Ok(())
}

/// Check the role before looking the prefix up, so a viewer learns nothing
/// about which ids exist.
pub fn remove_item<S: Store>(
    wishlist: &mut Wishlist<S>,
    session: &Session,
    prefix: &str,
) -> Result<WishlistItem, WishrError> {
    session.require(Role::Owner, "remove items")?;
    let id = wishlist.resolve(prefix)?.id().clone();
    wishlist.remove(session, &id)
}
