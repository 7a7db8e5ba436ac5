use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct CreateOrderDto {
    pub job_id: Uuid,

    #[validate(range(min = 1.0, message = "Amount must be positive"))]
    pub amount: f64,
}

/// Gateway order handed back to the checkout widget.
#[derive(Debug, Serialize, Deserialize)]
pub struct OrderResponseDto {
    pub order_id: String,
    /// Integer minor units (paise).
    pub amount: i64,
    pub currency: String,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct VerifyPaymentDto {
    pub job_id: Uuid,

    #[validate(length(min = 1, message = "Order id is required"))]
    pub razorpay_order_id: String,

    #[validate(length(min = 1, message = "Payment id is required"))]
    pub razorpay_payment_id: String,

    #[validate(length(min = 1, message = "Signature is required"))]
    pub razorpay_signature: String,
}
