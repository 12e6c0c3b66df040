//! Cart and checkout.

use clap::Args;
use fruit_mall_core::{CartItemId, PaymentMethod, ProductId};
use fruit_mall_storefront::api::DeliveryInfo;
use fruit_mall_storefront::{AppContext, Result};

use crate::render;

/// Payment and delivery details for an order.
#[derive(Args)]
pub struct CheckoutArgs {
    /// `card`, `bank-transfer` or `virtual-account`
    #[arg(long, default_value = "card")]
    pub payment: PaymentMethod,

    #[arg(long)]
    recipient: String,

    #[arg(long)]
    phone: String,

    #[arg(long)]
    zip: String,

    #[arg(long)]
    address1: String,

    #[arg(long, default_value = "")]
    address2: String,

    /// Note for the courier
    #[arg(long, default_value = "")]
    request: String,
}

impl CheckoutArgs {
    pub fn delivery(&self) -> DeliveryInfo {
        DeliveryInfo {
            recipient: self.recipient.clone(),
            phone_number: self.phone.clone(),
            zip_code: self.zip.clone(),
            address1: self.address1.clone(),
            address2: self.address2.clone(),
            delivery_request: self.request.clone(),
        }
    }
}

pub async fn show(ctx: &mut AppContext) -> Result<()> {
    ctx.load_cart().await?;
    render::cart(ctx.cart().items(), &ctx.cart_totals());
    Ok(())
}

pub async fn add(ctx: &mut AppContext, product: ProductId, quantity: u32) -> Result<()> {
    let line = ctx.add_to_cart(product, quantity).await?;
    render::success(&format!(
        "{} x {} in cart (line {}).",
        line.fruit_name, line.quantity, line.id
    ));
    Ok(())
}

pub async fn update(ctx: &mut AppContext, line: CartItemId, quantity: u32) -> Result<()> {
    let line = ctx.update_cart_quantity(line, quantity).await?;
    render::success(&format!("{} x {}.", line.fruit_name, line.quantity));
    Ok(())
}

pub async fn remove(ctx: &mut AppContext, line: CartItemId) -> Result<()> {
    ctx.remove_cart_item(line).await?;
    render::success("Removed from cart.");
    Ok(())
}

pub async fn clear(ctx: &mut AppContext) -> Result<()> {
    ctx.clear_cart().await?;
    render::success("Cart cleared.");
    Ok(())
}

pub async fn checkout(ctx: &mut AppContext, args: CheckoutArgs) -> Result<()> {
    ctx.load_cart().await?;
    let order = ctx.checkout(args.payment, args.delivery()).await?;
    render::success("Thank you for your order!");
    render::order(&order);
    Ok(())
}
