//! Review rules.

use std::collections::HashSet;

use fruit_mall_core::{OrderDetailId, OrderStatus};

use crate::api::{CreateReview, Order, OrderDetail, Review};
use crate::error::{AppError, Result};

/// Lowest accepted star rating.
pub const MIN_RATING: u8 = 1;
/// Highest accepted star rating.
pub const MAX_RATING: u8 = 5;

/// Build a review request after checking its rating and content.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if the rating is outside 1..=5 or the
/// content is blank.
pub fn new_review(
    order_detail_id: OrderDetailId,
    rating: u8,
    content: &str,
    image_url: Option<String>,
) -> Result<CreateReview> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(AppError::Validation(format!(
            "rating must be between {MIN_RATING} and {MAX_RATING}"
        )));
    }
    let content = content.trim();
    if content.is_empty() {
        return Err(AppError::Validation("review content is required".to_string()));
    }

    Ok(CreateReview {
        order_detail_id,
        rating,
        content: content.to_string(),
        image_url: image_url.filter(|url| !url.trim().is_empty()),
    })
}

/// Lines of `order` the member may still review.
///
/// Only delivered orders are reviewable, and a product already reviewed
/// for this order is skipped.
#[must_use]
pub fn reviewable_details<'a>(order: &'a Order, my_reviews: &[Review]) -> Vec<&'a OrderDetail> {
    if order.order_status != OrderStatus::Delivered {
        return Vec::new();
    }

    let reviewed: HashSet<_> = my_reviews
        .iter()
        .filter(|review| review.order_id == order.id)
        .map(|review| review.fruit_id)
        .collect();

    order
        .order_details
        .iter()
        .filter(|detail| !reviewed.contains(&detail.fruit_id))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;
    use fruit_mall_core::{OrderId, PaymentMethod, Price, ProductId, ReviewId};

    use super::*;

    fn detail(id: i64, fruit: i64) -> OrderDetail {
        OrderDetail {
            id: OrderDetailId::new(id),
            order_id: OrderId::new(1),
            fruit_id: ProductId::new(fruit),
            fruit_name: format!("Fruit {fruit}"),
            fruit_image_url: None,
            quantity: 1,
            unit_price: Price::from_won(9_000),
            total_price: Price::from_won(9_000),
        }
    }

    fn order(status: OrderStatus) -> Order {
        Order {
            id: OrderId::new(1),
            member_id: None,
            member_name: None,
            order_date: NaiveDate::from_ymd_opt(2024, 5, 2)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            total_price: Price::from_won(18_000),
            payment_method: PaymentMethod::Card,
            order_status: status,
            order_details: vec![detail(11, 3), detail(12, 4)],
        }
    }

    fn review(order: i64, fruit: i64) -> Review {
        Review {
            id: ReviewId::new(fruit),
            order_id: OrderId::new(order),
            fruit_id: ProductId::new(fruit),
            fruit_name: String::new(),
            fruit_image_url: None,
            rating: 5,
            content: "Sweet".to_string(),
            review_date: NaiveDate::from_ymd_opt(2024, 5, 9)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            image_url: None,
        }
    }

    #[test]
    fn test_rating_bounds() {
        assert!(new_review(OrderDetailId::new(1), 0, "ok", None).is_err());
        assert!(new_review(OrderDetailId::new(1), 6, "ok", None).is_err());
        assert!(new_review(OrderDetailId::new(1), 1, "ok", None).is_ok());
        assert!(new_review(OrderDetailId::new(1), 5, "ok", None).is_ok());
    }

    #[test]
    fn test_blank_content_rejected() {
        let err = new_review(OrderDetailId::new(1), 4, "  \n", None).unwrap_err();
        assert_eq!(err.user_message(), "review content is required");
    }

    #[test]
    fn test_review_is_trimmed() {
        let review =
            new_review(OrderDetailId::new(7), 4, "  Very juicy  ", Some(String::new())).unwrap();
        assert_eq!(review.content, "Very juicy");
        assert_eq!(review.image_url, None);
    }

    #[test]
    fn test_only_delivered_orders_are_reviewable() {
        assert!(reviewable_details(&order(OrderStatus::Shipped), &[]).is_empty());
        assert_eq!(reviewable_details(&order(OrderStatus::Delivered), &[]).len(), 2);
    }

    #[test]
    fn test_reviewed_lines_are_skipped() {
        let delivered = order(OrderStatus::Delivered);

        let remaining = reviewable_details(&delivered, &[review(1, 3)]);
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].fruit_id, ProductId::new(4));

        // A review of the same product on another order does not count.
        let remaining = reviewable_details(&delivered, &[review(2, 3)]);
        assert_eq!(remaining.len(), 2);
    }
}
