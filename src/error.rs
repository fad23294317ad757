//! Application-wide error types.

use thiserror::Error;

use crate::payment::PaymentError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("logger error: {0}")]
    Logger(String),

    #[error("payment error: {0}")]
    Payment(#[from] PaymentError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn config_error_display() {
        let e = AppError::Config("missing field".into());
        assert!(e.to_string().contains("config error"));
        assert!(e.to_string().contains("missing field"));
    }

    #[test]
    fn logger_error_display() {
        let e = AppError::Logger("already initialized".into());
        assert!(e.to_string().contains("already initialized"));
    }

    #[test]
    fn payment_error_converts() {
        let e: AppError = PaymentError::MissingCredential("PAYPAL_CLIENT_ID").into();
        assert!(e.to_string().starts_with("payment error"));
        assert!(e.to_string().contains("PAYPAL_CLIENT_ID"));
        let _: &dyn Error = &e;
    }
}
