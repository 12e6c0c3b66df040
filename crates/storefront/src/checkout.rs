//! Turning a cart into an order request.

use fruit_mall_core::{PaymentMethod, PhoneNumber};

use crate::api::{CartItem, CreateOrderRequest, DeliveryInfo, OrderItemRequest};
use crate::error::{AppError, Result};

/// Check that the delivery details are complete.
///
/// # Errors
///
/// Returns [`AppError::Validation`] naming the first missing or malformed field.
pub fn validate_delivery(delivery: &DeliveryInfo) -> Result<()> {
    let required = [
        ("recipient", &delivery.recipient),
        ("zip code", &delivery.zip_code),
        ("address", &delivery.address1),
    ];
    if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
        return Err(AppError::Validation(format!("{field} is required")));
    }

    PhoneNumber::parse(&delivery.phone_number)
        .map_err(|e| AppError::Validation(e.to_string()))?;
    Ok(())
}

/// Build the order request for `items`.
///
/// # Errors
///
/// Returns [`AppError::EmptyCart`] if there are no lines, or
/// [`AppError::Validation`] if the delivery details are incomplete.
pub fn build_order_request(
    items: &[CartItem],
    payment_method: PaymentMethod,
    delivery: DeliveryInfo,
) -> Result<CreateOrderRequest> {
    if items.is_empty() {
        return Err(AppError::EmptyCart);
    }
    validate_delivery(&delivery)?;

    let order_items = items
        .iter()
        .map(|item| OrderItemRequest {
            fruit_id: item.fruit_id,
            quantity: item.quantity,
        })
        .collect();

    Ok(CreateOrderRequest {
        order_items,
        payment_method,
        delivery_info: DeliveryInfo {
            recipient: delivery.recipient.trim().to_string(),
            phone_number: delivery.phone_number.trim().to_string(),
            zip_code: delivery.zip_code.trim().to_string(),
            address1: delivery.address1.trim().to_string(),
            address2: delivery.address2.trim().to_string(),
            delivery_request: delivery.delivery_request,
        },
    })
}
