use std::env;

use log::error;
use stripe::{
    Client, CreatePaymentIntent, CreatePaymentIntentAutomaticPaymentMethods, Currency,
    PaymentIntent, PaymentIntentId, PaymentIntentStatus,
};

use crate::errors::AppError;

/// Thin bridge to the external payment processor. Holds no local state;
/// intent creation is freely retryable from this side.
#[derive(Clone)]
pub struct PaymentGateway {
    client: Client,
}

impl PaymentGateway {
    pub fn from_env() -> Self {
        let secret_key = env::var("PAYMENT_SECRET_KEY").expect("PAYMENT_SECRET_KEY must be set");
        PaymentGateway {
            client: Client::new(secret_key),
        }
    }

    /// Creates a payment intent for `amount` minor currency units and
    /// returns the client secret the caller completes the charge with.
    pub async fn create_intent(&self, amount: i64) -> Result<String, AppError> {
        let mut params = CreatePaymentIntent::new(amount, Currency::USD);
        params.automatic_payment_methods = Some(CreatePaymentIntentAutomaticPaymentMethods {
            enabled: true,
            ..Default::default()
        });

        let intent = PaymentIntent::create(&self.client, params).await.map_err(|err| {
            error!("Error creating payment intent: {}", err);
            AppError::UpstreamFailure("Failed to create payment intent".to_string())
        })?;

        intent
            .client_secret
            .ok_or_else(|| AppError::UpstreamFailure("Gateway returned no client secret".to_string()))
    }

    /// Asks the gateway whether the charge behind `transaction_id` actually
    /// settled. Completion is never taken on the caller's word alone.
    pub async fn charge_succeeded(&self, transaction_id: &str) -> Result<bool, AppError> {
        let intent_id: PaymentIntentId = transaction_id
            .parse()
            .map_err(|_| AppError::BadRequest("Invalid transaction id".to_string()))?;

        let intent = PaymentIntent::retrieve(&self.client, &intent_id, &[])
            .await
            .map_err(|err| {
                error!("Error retrieving payment intent {}: {}", transaction_id, err);
                AppError::UpstreamFailure("Failed to verify payment".to_string())
            })?;

        Ok(intent.status == PaymentIntentStatus::Succeeded)
    }
}
