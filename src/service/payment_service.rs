// service/payment_service.rs
use std::sync::Arc;

use bigdecimal::BigDecimal;
use hmac::{Hmac, Mac};
use num_traits::ToPrimitive;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::{
    config::Config,
    db::{db::DBClient, jobdb::JobExt, walletdb::WalletExt},
    dtos::paymentdtos::{OrderResponseDto, VerifyPaymentDto},
    models::{
        jobmodel::{Job, JobStatus},
        walletmodels::{TransactionStatus, TransactionType},
    },
    service::{
        error::ServiceError,
        notification_service::{best_effort, NotificationService},
    },
    utils::currency::rupees_to_paise,
};

/// Two-phase settlement against a Razorpay-style gateway: create an order
/// for the checkout widget, then verify the returned signature before
/// committing anything. Nothing is written on a mismatch, so a failed
/// attempt can always be retried.
pub struct PaymentService {
    db_client: Arc<DBClient>,
    notification_service: Arc<NotificationService>,
    http: reqwest::Client,
    key_id: String,
    key_secret: String,
    api_url: String,
}

impl PaymentService {
    pub fn new(
        db_client: Arc<DBClient>,
        notification_service: Arc<NotificationService>,
        config: &Config,
    ) -> Self {
        Self {
            db_client,
            notification_service,
            http: reqwest::Client::new(),
            key_id: config.razorpay_key_id.clone(),
            key_secret: config.razorpay_key_secret.clone(),
            api_url: config.razorpay_api_url.clone(),
        }
    }

    /// Phase one: obtain a gateway order for the job's final amount. The
    /// job must already be awaiting payment and the requested amount must
    /// match what the worker entered.
    pub async fn create_order(
        &self,
        job_id: Uuid,
        amount: f64,
    ) -> Result<OrderResponseDto, ServiceError> {
        let job = self.load_payable_job(job_id).await?;

        let job_amount = job
            .amount
            .as_ref()
            .and_then(|a| a.to_f64())
            .unwrap_or(0.0);
        if (job_amount - amount).abs() > 0.009 {
            return Err(ServiceError::Validation(format!(
                "Amount {:.2} does not match the job's payable amount {:.2}",
                amount, job_amount
            )));
        }

        let amount_paise = rupees_to_paise(
            job.amount
                .as_ref()
                .unwrap_or(&BigDecimal::from(0)),
        );

        let payload = serde_json::json!({
            "amount": amount_paise,
            "currency": "INR",
            "receipt": job_id.to_string(),
            "payment_capture": 1
        });

        let response = self
            .http
            .post(format!("{}/orders", self.api_url))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&payload)
            .send()
            .await?;

        let response_body: serde_json::Value = response.json().await?;

        if let Some(error) = response_body.get("error").and_then(|e| e["description"].as_str()) {
            return Err(ServiceError::Gateway(error.to_string()));
        }

        let order_id = response_body["id"]
            .as_str()
            .ok_or_else(|| ServiceError::Gateway("Missing order id in gateway response".to_string()))?
            .to_string();

        Ok(OrderResponseDto {
            order_id,
            amount: response_body["amount"].as_i64().unwrap_or(amount_paise),
            currency: response_body["currency"]
                .as_str()
                .unwrap_or("INR")
                .to_string(),
        })
    }

    /// Phase two: verify the checkout signature and, only on a match,
    /// close the job and credit the worker.
    pub async fn verify_payment(&self, body: VerifyPaymentDto) -> Result<Job, ServiceError> {
        let job = self.load_payable_job(body.job_id).await?;

        if !verify_checkout_signature(
            &body.razorpay_order_id,
            &body.razorpay_payment_id,
            &body.razorpay_signature,
            self.key_secret.as_bytes(),
        ) {
            tracing::warn!(job_id = %job.id, order_id = %body.razorpay_order_id, "payment signature mismatch");
            return Err(ServiceError::InvalidSignature);
        }

        let worker_id = job
            .worker_id
            .ok_or_else(|| ServiceError::Validation("Job has no assigned worker".to_string()))?;
        let amount = job
            .amount
            .clone()
            .ok_or_else(|| ServiceError::Validation("Job has no payable amount".to_string()))?;

        let updated = self
            .db_client
            .update_job_status(job.id, JobStatus::Completed)
            .await?;

        // The job is already closed; a failed credit is logged and left
        // for reconciliation rather than rolled back.
        let short_id = &job.id.to_string()[..8];
        let description = format!(
            "Payment for Job {} (Ref: {})",
            short_id, body.razorpay_payment_id
        );
        if let Err(e) = self
            .db_client
            .append_transaction(
                worker_id,
                Some(job.id),
                amount.clone(),
                TransactionType::Credit,
                TransactionStatus::Completed,
                description,
            )
            .await
        {
            tracing::error!(
                job_id = %job.id,
                worker_id = %worker_id,
                "ledger credit failed after job completion: {}", e
            );
        } else {
            best_effort(
                self.notification_service
                    .notify_payment_received(worker_id, &updated, amount.to_f64().unwrap_or(0.0))
                    .await,
                "payment received",
            );
        }

        tracing::info!(job_id = %job.id, "payment settled, job completed");
        Ok(updated)
    }

    async fn load_payable_job(&self, job_id: Uuid) -> Result<Job, ServiceError> {
        let job = self
            .db_client
            .get_job_by_id(job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(job_id))?;

        if job.status != JobStatus::CompletedPendingPayment {
            return Err(ServiceError::InvalidTransition {
                job: job_id,
                from: job.status,
                to: JobStatus::Completed,
            });
        }
        Ok(job)
    }
}

impl std::fmt::Debug for PaymentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentService")
            .field("api_url", &self.api_url)
            .field("key_id", &self.key_id)
            .finish()
    }
}

/// Recompute HMAC-SHA256 over `"{order_id}|{payment_id}"` with the gateway
/// key secret and compare the hex digest against the supplied signature in
/// constant time. A signature not produced with the secret cannot match.
pub fn verify_checkout_signature(
    order_id: &str,
    payment_id: &str,
    signature: &str,
    key_secret: &[u8],
) -> bool {
    let mut mac = Hmac::<Sha256>::new_from_slice(key_secret)
        .expect("HMAC can take key of any size");
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());

    let expected_hex = hex::encode(mac.finalize().into_bytes());

    ConstantTimeEq::ct_eq(signature.as_bytes(), expected_hex.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test_secret_key";

    fn sign(order_id: &str, payment_id: &str) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(SECRET).unwrap();
        mac.update(format!("{}|{}", order_id, payment_id).as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn genuine_signature_verifies() {
        let sig = sign("order_N5Xk2d", "pay_9aQx31");
        assert!(verify_checkout_signature(
            "order_N5Xk2d",
            "pay_9aQx31",
            &sig,
            SECRET
        ));
    }

    #[test]
    fn any_corrupted_signature_is_rejected() {
        let sig = sign("order_N5Xk2d", "pay_9aQx31");
        // Flip one nibble at every position; none may verify.
        for i in 0..sig.len() {
            let mut bytes = sig.clone().into_bytes();
            bytes[i] = if bytes[i] == b'0' { b'1' } else { b'0' };
            let tampered = String::from_utf8(bytes).unwrap();
            assert!(
                !verify_checkout_signature("order_N5Xk2d", "pay_9aQx31", &tampered, SECRET),
                "tampered signature at index {} verified",
                i
            );
        }
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let sig = sign("order_N5Xk2d", "pay_9aQx31");
        assert!(!verify_checkout_signature(
            "order_N5Xk2d",
            "pay_9aQx31",
            &sig,
            b"some_other_secret"
        ));
    }

    #[test]
    fn swapped_ids_are_rejected() {
        // Concatenation order is part of the contract.
        let sig = sign("order_N5Xk2d", "pay_9aQx31");
        assert!(!verify_checkout_signature(
            "pay_9aQx31",
            "order_N5Xk2d",
            &sig,
            SECRET
        ));
    }

    #[test]
    fn empty_signature_is_rejected() {
        assert!(!verify_checkout_signature(
            "order_N5Xk2d",
            "pay_9aQx31",
            "",
            SECRET
        ));
    }
}
