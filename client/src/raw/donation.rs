use samaj_shared::donation::{CheckoutDescriptor, CheckoutSession};

super::json_requests! {
    /// Gets the hosted checkout session to redirect to.
    Checkout(CheckoutDescriptor) => "/api/donation/checkout": CheckoutSession,
}
