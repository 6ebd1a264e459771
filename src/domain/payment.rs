//! Payment gateways shown at checkout

use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PaymentMethod {
    pub id: u32,
    pub name: String,
    /// Account number the customer sends money to.
    pub number: String,
    /// Free-text instructions; meaningful only when `is_custom`.
    pub instructions: String,
    pub is_custom: bool,
    pub is_active: bool,
}

impl PaymentMethod {
    /// Instruction text for the checkout screen: the stored custom text, or
    /// the generated 5-step template for default-mode gateways.
    pub fn checkout_instructions(&self) -> String {
        if self.is_custom && !self.instructions.is_empty() {
            self.instructions.clone()
        } else {
            default_instructions(&self.name)
        }
    }
}

/// The standard 5-step send-money walkthrough, parameterized by gateway name.
pub fn default_instructions(gateway_name: &str) -> String {
    let name = if gateway_name.is_empty() {
        "[App Name]"
    } else {
        gateway_name
    };
    format!(
        "First, copy the number shown above.\n\
         Then open the {name} app.\n\
         Then select 'send money'.\n\
         Send the amount of money that was requested here.\n\
         Then copy the transaction ID and paste it below."
    )
}
