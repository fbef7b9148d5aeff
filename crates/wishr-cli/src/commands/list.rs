use comfy_table::{Attribute, Cell, Color, Table};
use wishr_core::config::WishrConfig;
use wishr_core::models::item::WishlistItem;
use wishr_core::models::session::{Role, Session};
use wishr_core::store::Store;
use wishr_core::Wishlist;

use super::{open_wishlist, Context};

pub fn run(ctx: &Context) -> anyhow::Result<()> {
    let session = ctx.session()?;
    let (config, wishlist) = open_wishlist()?;
    render(&wishlist, &session, &config);
    Ok(())
}

/// Print the wishlist the way `session`'s role sees it.
pub fn render<S: Store>(wishlist: &Wishlist<S>, session: &Session, config: &WishrConfig) {
    let items = wishlist.items();
    match session.role {
        Role::Owner => {
            println!("Your wishes ({})", items.len());
            if items.is_empty() {
                println!("No wishes yet. Use `wishr add` to add your first one.");
                return;
            }
            println!("{}", owner_table(items, config.url_display_width));
        }
        Role::Viewer => {
            println!("The wishlist ({} wishes)", items.len());
            if items.is_empty() {
                println!("Nothing on the wishlist yet.");
                return;
            }
            let stats = wishlist.stats();
            println!(
                "Total: {} | Bought: {} | Not bought: {}",
                stats.total, stats.bought, stats.unbought
            );
            println!("{}", viewer_table(items, config.url_display_width));
        }
    }
}

fn owner_table(items: &[WishlistItem], url_width: usize) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["ID", "WISH", "DESCRIPTION", "LINK", "ADDED"]);
    for item in items {
        table.add_row(vec![
            Cell::new(short_id(item)),
            Cell::new(item.name()).add_attribute(Attribute::Bold),
            Cell::new(item.description().unwrap_or("-")),
            Cell::new(link(item, url_width)),
            Cell::new(item.date_added()),
        ]);
    }
    table
}

fn viewer_table(items: &[WishlistItem], url_width: usize) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        "ID",
        "WISH",
        "DESCRIPTION",
        "LINK",
        "ADDED",
        "STATUS",
        "BOUGHT BY",
    ]);
    for item in items {
        let (name, status, buyer) = match item.purchase() {
            Some(p) => (
                Cell::new(item.name()).add_attribute(Attribute::CrossedOut),
                Cell::new(format!("bought {}", p.purchase_date)).fg(Color::Green),
                Cell::new(&p.bought_by),
            ),
            None => (
                Cell::new(item.name()).add_attribute(Attribute::Bold),
                Cell::new("available").fg(Color::Yellow),
                Cell::new("-"),
            ),
        };
        table.add_row(vec![
            Cell::new(short_id(item)),
            name,
            Cell::new(item.description().unwrap_or("-")),
            Cell::new(link(item, url_width)),
            Cell::new(item.date_added()),
            status,
            buyer,
        ]);
    }
    table
}

/// Leading id groups; enough for `Wishlist::resolve` to find the item.
fn short_id(item: &WishlistItem) -> String {
    item.id().to_string().chars().take(13).collect()
}

fn link(item: &WishlistItem, width: usize) -> String {
    item.url()
        .map(|u| display_url(u, width))
        .unwrap_or_else(|| "-".to_string())
}

/// Shorten `url` to at most `width` characters, ending in `...` when cut.
pub fn display_url(url: &str, width: usize) -> String {
    if url.chars().count() <= width {
        return url.to_string();
    }
    if width < 3 {
        return url.chars().take(width).collect();
    }
    let mut shortened: String = url.chars().take(width - 3).collect();
    shortened.push_str("...");
    shortened
}
