//! Reviews.

use fruit_mall_core::{OrderDetailId, OrderId, ProductId, ReviewId};
use fruit_mall_storefront::format::format_rating;
use fruit_mall_storefront::{AppContext, Result};

use crate::render;

pub async fn product(ctx: &mut AppContext, id: ProductId) -> Result<()> {
    let summary = ctx.product_reviews(id).await?;
    render::success(&format!(
        "{}: {} average over {} reviews",
        summary.fruit_name,
        format_rating(summary.average_rating),
        summary.review_count
    ));
    render::review_list(&summary.reviews);
    Ok(())
}

pub async fn mine(ctx: &mut AppContext) -> Result<()> {
    ctx.load_my_reviews().await?;
    render::review_list(ctx.my_reviews().data());
    Ok(())
}

pub async fn write(
    ctx: &mut AppContext,
    order_detail: OrderDetailId,
    rating: u8,
    content: &str,
    image_url: Option<String>,
) -> Result<()> {
    let review = ctx
        .write_review(order_detail, rating, content, image_url)
        .await?;
    render::success(&format!("Review {} posted.", review.id));
    Ok(())
}

pub async fn delete(ctx: &mut AppContext, id: ReviewId) -> Result<()> {
    ctx.delete_review(id).await?;
    render::success("Review deleted.");
    Ok(())
}

pub async fn reviewable(ctx: &mut AppContext, order: OrderId) -> Result<()> {
    let lines = ctx.reviewable(order).await?;
    if lines.is_empty() {
        render::success("Nothing left to review for this order.");
    } else {
        render::order_lines(&lines);
    }
    Ok(())
}
