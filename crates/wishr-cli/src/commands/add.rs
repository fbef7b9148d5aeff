use clap::Args;
use console::style;

use super::{list, open_wishlist, Context};

#[derive(Args)]
pub struct AddArgs {
    /// What you wish for
    name: String,
    /// A few words about the wish
    #[arg(long, short)]
    description: Option<String>,
    /// Where to find it
    #[arg(long, short)]
    url: Option<String>,
}

pub fn run(args: AddArgs, ctx: &Context) -> anyhow::Result<()> {
    let session = ctx.session()?;
    let (config, mut wishlist) = open_wishlist()?;

    let item = wishlist.create(
        &session,
        &args.name,
        args.description.as_deref(),
        args.url.as_deref(),
    )?;
    println!("{} '{}' was added to the wishlist", style("✓").green(), item.name());

    wishlist.reload()?;
    list::render(&wishlist, &session, &config);
    Ok(())
}
