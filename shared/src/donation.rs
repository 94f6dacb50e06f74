use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DonationType {
    OneTime,
    Monthly,
}

/// Mode of a hosted checkout session.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutMode {
    Payment,
    Subscription,
}

impl From<DonationType> for CheckoutMode {
    fn from(value: DonationType) -> Self {
        match value {
            DonationType::OneTime => CheckoutMode::Payment,
            DonationType::Monthly => CheckoutMode::Subscription,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct CheckoutDescriptor {
    /// The selected amount, which must be one of the predefined amounts.
    pub amount: u32,
    pub donation_type: DonationType,
}

/// Everything a client needs to redirect to the hosted checkout page.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSession {
    pub price_id: String,
    pub quantity: u32,
    pub mode: CheckoutMode,
    pub success_url: String,
    pub cancel_url: String,
}
