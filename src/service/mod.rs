pub mod dispute_service;
pub mod error;
pub mod job_service;
pub mod matching_service;
pub mod notification_service;
pub mod payment_service;
pub mod wallet_service;
