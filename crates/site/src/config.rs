//! Site-wide settings: where leads go, what the booking modal embeds, and
//! the address shown when a submission fails.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use voicefx_core::params::param_string;

const DEFAULT_WEBHOOK_URL: &str = "https://hooks.voicefx.dev/leads";
const DEFAULT_BOOKING_URL: &str = "https://cal.com/voicefx/intro-call";
const DEFAULT_CONTACT_EMAIL: &str = "hello@voicefx.dev";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Endpoint receiving the lead JSON via POST.
    pub webhook_url: String,
    /// Page embedded in the booking modal's iframe.
    pub booking_url: String,
    /// Fallback address shown in the failure banner.
    pub contact_email: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            webhook_url: DEFAULT_WEBHOOK_URL.to_owned(),
            booking_url: DEFAULT_BOOKING_URL.to_owned(),
            contact_email: DEFAULT_CONTACT_EMAIL.to_owned(),
        }
    }
}

impl SiteConfig {
    /// Reads overrides from a JSON object; missing or non-string keys keep
    /// their defaults.
    pub fn from_json(value: &Value) -> Self {
        Self {
            webhook_url: param_string(value, "webhook_url", DEFAULT_WEBHOOK_URL),
            booking_url: param_string(value, "booking_url", DEFAULT_BOOKING_URL),
            contact_email: param_string(value, "contact_email", DEFAULT_CONTACT_EMAIL),
        }
    }
}
