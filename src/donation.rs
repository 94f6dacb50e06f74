//! Redirects to the hosted checkout of the payment processor.

use axum::{extract::State, Json};
use samaj_shared::{
    donation::{CheckoutDescriptor, CheckoutSession},
    guard::Guard,
};

use crate::{config::Config, session::Session, store::Store, Error, Global};

/// Builds the checkout session for a predefined amount.
///
/// # Errors
///
/// - Errors if the amount is not one of the configured amounts.
pub fn checkout(config: &Config, desc: CheckoutDescriptor) -> Result<CheckoutSession, Error> {
    let price_id = config
        .donation
        .prices
        .get(&desc.amount.to_string())
        .ok_or_else(|| Error::invalid(format!("{} is not a predefined amount", desc.amount)))?
        .clone();

    let url = |path: &Option<String>, default: &str| {
        format!(
            "{}{}",
            config.public_url.trim_end_matches('/'),
            path.as_deref().unwrap_or(default)
        )
    };
    Ok(CheckoutSession {
        price_id,
        quantity: 1,
        mode: desc.donation_type.into(),
        success_url: url(&config.donation.success_path, "/success"),
        cancel_url: url(&config.donation.cancel_path, "/donate"),
    })
}

pub async fn handle_checkout<S: Store>(
    session: Session,
    State(Global { config, .. }): State<Global<S>>,
    Json(desc): Json<CheckoutDescriptor>,
) -> Result<Json<CheckoutSession>, Error> {
    session.require(Guard::Authenticated)?;
    let checkout = checkout(&config, desc)?;
    tracing::info!(
        "{} opened a {:?} checkout of {}",
        session.identity,
        checkout.mode,
        desc.amount
    );
    Ok(Json(checkout))
}

#[cfg(test)]
mod tests {
    use samaj_shared::donation::{CheckoutMode, DonationType};

    use super::*;

    fn config() -> Config {
        let mut config = Config::default();
        config.public_url = "https://samaj.example/".to_owned();
        config
            .donation
            .prices
            .insert("500".to_owned(), "price_500".to_owned());
        config
    }

    #[test]
    fn monthly_donations_subscribe() {
        let session = checkout(
            &config(),
            CheckoutDescriptor {
                amount: 500,
                donation_type: DonationType::Monthly,
            },
        )
        .unwrap();
        assert_eq!(session.price_id, "price_500");
        assert_eq!(session.mode, CheckoutMode::Subscription);
        assert_eq!(session.success_url, "https://samaj.example/success");
        assert_eq!(session.cancel_url, "https://samaj.example/donate");
    }

    #[test]
    fn unknown_amounts_are_rejected() {
        assert!(matches!(
            checkout(
                &config(),
                CheckoutDescriptor {
                    amount: 501,
                    donation_type: DonationType::OneTime,
                },
            ),
            Err(Error::Validation(_))
        ));
    }
}
