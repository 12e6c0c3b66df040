//! Wishlist.

use fruit_mall_core::ProductId;
use fruit_mall_storefront::state::WishlistToggle;
use fruit_mall_storefront::{AppContext, AppError, Result};

use crate::render;

pub async fn show(ctx: &mut AppContext) -> Result<()> {
    ctx.load_wishlist().await?;
    render::wishlist(ctx.wishlist().items());
    Ok(())
}

pub async fn add(ctx: &mut AppContext, product: ProductId) -> Result<()> {
    ctx.load_wishlist().await?;
    let item = ctx.add_to_wishlist(product).await?;
    render::success(&format!("{} is in your wishlist.", item.fruit_name));
    Ok(())
}

pub async fn remove(ctx: &mut AppContext, product: ProductId) -> Result<()> {
    ctx.load_wishlist().await?;
    let id = ctx
        .wishlist()
        .entry_for(product)
        .map(|entry| entry.id)
        .ok_or_else(|| AppError::NotFound(format!("product {product} in wishlist")))?;
    ctx.remove_from_wishlist(id).await?;
    render::success("Removed from wishlist.");
    Ok(())
}

pub async fn toggle(ctx: &mut AppContext, product: ProductId) -> Result<()> {
    ctx.load_wishlist().await?;
    match ctx.toggle_wishlist(product).await? {
        WishlistToggle::Added(item) => {
            render::success(&format!("Saved {}.", item.fruit_name));
        }
        WishlistToggle::Removed(_) => render::success("Removed from wishlist."),
    }
    Ok(())
}

pub async fn clear(ctx: &mut AppContext) -> Result<()> {
    ctx.clear_wishlist().await?;
    render::success("Wishlist cleared.");
    Ok(())
}
