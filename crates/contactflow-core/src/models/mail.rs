/// Outbound mail models
use typed_builder::TypedBuilder;

/// A fully rendered message ready for the transport
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
pub struct OutgoingMail {
    #[builder(setter(into))]
    pub from: String,
    #[builder(setter(into))]
    pub to: String,
    #[builder(default, setter(strip_option, into))]
    pub reply_to: Option<String>,
    #[builder(setter(into))]
    pub subject: String,
    /// Plain-text alternative
    #[builder(default, setter(strip_option, into))]
    pub text: Option<String>,
    #[builder(setter(into))]
    pub html: String,
}

/// What the relay answered for an accepted message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub to: String,
    pub response: String,
}
