//! Review endpoints.

use fruit_mall_core::{ProductId, ReviewId};
use tracing::instrument;

use super::{ApiClient, ApiError, CreateReview, Review, ReviewSummary};

impl ApiClient {
    /// Get the reviews and average rating of a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(product_id = %fruit_id))]
    pub async fn product_reviews(&self, fruit_id: ProductId) -> Result<ReviewSummary, ApiError> {
        self.get(&["reviews", "fruit", &fruit_id.to_string()]).await
    }

    /// Get the reviews written by the member.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn my_reviews(&self) -> Result<Vec<Review>, ApiError> {
        self.get(&["reviews", "my-reviews"]).await
    }

    /// Publish a review of a delivered order line.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the review or the request fails.
    #[instrument(skip(self, review), fields(order_detail_id = %review.order_detail_id, rating = review.rating))]
    pub async fn create_review(&self, review: &CreateReview) -> Result<Review, ApiError> {
        self.post(&["reviews"], review).await
    }

    /// Delete one of the member's reviews.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(review_id = %id))]
    pub async fn delete_review(&self, id: ReviewId) -> Result<(), ApiError> {
        self.delete(&["reviews", &id.to_string()]).await
    }
}
