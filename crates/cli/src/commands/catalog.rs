//! Browsing the catalog.

use fruit_mall_core::{CategoryId, ProductId};
use fruit_mall_storefront::catalog::CatalogQuery;
use fruit_mall_storefront::{AppContext, Result};

use crate::render;

pub async fn home(ctx: &mut AppContext) -> Result<()> {
    let newest = ctx.home().await?;
    render::success("New arrivals");
    render::products(&newest);
    Ok(())
}

pub async fn products(ctx: &mut AppContext, query: CatalogQuery) -> Result<()> {
    ctx.load_products().await?;
    show_page(ctx, query);
    Ok(())
}

pub async fn product(ctx: &mut AppContext, id: ProductId) -> Result<()> {
    let product = ctx.product(id).await?;
    let reviews = ctx.product_reviews(id).await?;
    render::product_detail(&product, &reviews);
    Ok(())
}

pub async fn categories(ctx: &mut AppContext) -> Result<()> {
    ctx.load_categories().await?;
    render::categories(ctx.catalog().categories());
    Ok(())
}

pub async fn category(ctx: &mut AppContext, id: CategoryId, query: CatalogQuery) -> Result<()> {
    let category = ctx.load_category(id).await?;
    render::success(&category.name);
    show_page(ctx, query);
    Ok(())
}

pub async fn search(ctx: &mut AppContext, keyword: &str, query: CatalogQuery) -> Result<()> {
    ctx.search(keyword).await?;
    show_page(ctx, query);
    Ok(())
}

fn show_page(ctx: &mut AppContext, query: CatalogQuery) {
    let sort = query.sort;
    ctx.set_query(query);
    render::catalog_page(&ctx.catalog_page(), sort);
}

pub async fn open(ctx: &mut AppContext, path: &str) {
    let decision = ctx.open(path).await;
    render::route(&decision);
}
