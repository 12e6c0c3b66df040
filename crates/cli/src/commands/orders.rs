//! Order history.

use fruit_mall_core::OrderId;
use fruit_mall_storefront::{AppContext, Result};

use crate::render;

pub async fn list(ctx: &mut AppContext) -> Result<()> {
    ctx.load_my_orders().await?;
    render::orders(ctx.orders().data());
    Ok(())
}

pub async fn show(ctx: &mut AppContext, id: OrderId) -> Result<()> {
    let order = ctx.order(id).await?;
    render::order(&order);
    Ok(())
}

pub async fn cancel(ctx: &mut AppContext, id: OrderId) -> Result<()> {
    ctx.load_my_orders().await?;
    let order = ctx.cancel_order(id).await?;
    render::success(&format!(
        "Order {} is now {}.",
        order.id,
        order.order_status.label()
    ));
    Ok(())
}
