use super::payment::Gateway;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum SidebarPosition {
    #[default]
    Left,
    Right,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

/// The singleton settings document.
///
/// Missing fields take their defaults when the document is deserialized, so every
/// reader sees a complete struct.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub delivery_fee: Decimal,
    pub primary_color: String,
    pub accent_color: String,
    pub hubtel_client_id: String,
    pub hubtel_client_secret: String,
    pub merchant_account_number: String,
    pub sidebar_color: String,
    pub sidebar_accent_color: String,
    pub sidebar_position: SidebarPosition,
    pub theme: Theme,
    pub paystack_public_key: String,
    pub paystack_secret_key: String,
    pub payment_gateway: Gateway,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            delivery_fee: Decimal::ZERO,
            primary_color: "25 87% 54%".to_string(),
            accent_color: "39 100% 60%".to_string(),
            hubtel_client_id: String::new(),
            hubtel_client_secret: String::new(),
            merchant_account_number: String::new(),
            sidebar_color: "240 10% 3.9%".to_string(),
            sidebar_accent_color: "25 87% 54%".to_string(),
            sidebar_position: SidebarPosition::Left,
            theme: Theme::System,
            paystack_public_key: String::new(),
            paystack_secret_key: String::new(),
            payment_gateway: Gateway::Hubtel,
        }
    }
}

impl Settings {
    pub fn hubtel_configured(&self) -> bool {
        !self.hubtel_client_id.is_empty()
            && !self.hubtel_client_secret.is_empty()
            && !self.merchant_account_number.is_empty()
    }

    pub fn public_view(&self) -> PublicSettings {
        PublicSettings {
            delivery_fee: self.delivery_fee,
            primary_color: self.primary_color.clone(),
            accent_color: self.accent_color.clone(),
            sidebar_color: self.sidebar_color.clone(),
            sidebar_accent_color: self.sidebar_accent_color.clone(),
            sidebar_position: self.sidebar_position,
            theme: self.theme,
            paystack_public_key: self.paystack_public_key.clone(),
            payment_gateway: self.payment_gateway,
        }
    }
}

/// The subset of settings the storefront may see. Never carries secrets.
#[derive(Debug, Serialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PublicSettings {
    pub delivery_fee: Decimal,
    pub primary_color: String,
    pub accent_color: String,
    pub sidebar_color: String,
    pub sidebar_accent_color: String,
    pub sidebar_position: SidebarPosition,
    pub theme: Theme,
    pub paystack_public_key: String,
    pub payment_gateway: Gateway,
}

/// A partial settings edit coming from the admin forms.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsUpdate {
    pub delivery_fee: Option<Decimal>,
    pub primary_color: Option<String>,
    pub accent_color: Option<String>,
    pub hubtel_client_id: Option<String>,
    pub hubtel_client_secret: Option<String>,
    pub merchant_account_number: Option<String>,
    pub sidebar_color: Option<String>,
    pub sidebar_accent_color: Option<String>,
    pub sidebar_position: Option<SidebarPosition>,
    pub theme: Option<Theme>,
    pub paystack_public_key: Option<String>,
    pub paystack_secret_key: Option<String>,
    pub payment_gateway: Option<Gateway>,
}

macro_rules! apply_fields {
    ($update:expr, $settings:expr, $changed:ident, [$($field:ident => $name:literal),* $(,)?]) => {
        $(
            if let Some(value) = $update.$field {
                $settings.$field = value;
                $changed.push($name);
            }
        )*
    };
}

impl SettingsUpdate {
    /// Applies every present field and returns the document names of what changed.
    pub fn apply(self, settings: &mut Settings) -> Vec<&'static str> {
        let mut changed = Vec::new();
        apply_fields!(self, settings, changed, [
            delivery_fee => "deliveryFee",
            primary_color => "primaryColor",
            accent_color => "accentColor",
            hubtel_client_id => "hubtelClientId",
            hubtel_client_secret => "hubtelClientSecret",
            merchant_account_number => "merchantAccountNumber",
            sidebar_color => "sidebarColor",
            sidebar_accent_color => "sidebarAccentColor",
            sidebar_position => "sidebarPosition",
            theme => "theme",
            paystack_public_key => "paystackPublicKey",
            paystack_secret_key => "paystackSecretKey",
            payment_gateway => "paymentGateway",
        ]);
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_missing_fields_take_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"deliveryFee": 5, "theme": "dark"}"#).unwrap();
        assert_eq!(settings.delivery_fee, dec!(5));
        assert_eq!(settings.theme, Theme::Dark);
        assert_eq!(settings.primary_color, "25 87% 54%");
        assert_eq!(settings.sidebar_position, SidebarPosition::Left);
        assert_eq!(settings.payment_gateway, Gateway::Hubtel);
        assert!(!settings.hubtel_configured());
    }

    #[test]
    fn test_update_applies_only_present_fields() {
        let mut settings = Settings::default();
        let update = SettingsUpdate {
            delivery_fee: Some(dec!(7.5)),
            hubtel_client_secret: Some("s3cret".to_string()),
            ..Default::default()
        };

        let changed = update.apply(&mut settings);

        assert_eq!(changed, vec!["deliveryFee", "hubtelClientSecret"]);
        assert_eq!(settings.delivery_fee, dec!(7.5));
        assert_eq!(settings.accent_color, "39 100% 60%");
    }

    #[test]
    fn test_public_view_omits_secrets() {
        let settings = Settings {
            hubtel_client_secret: "hub-secret".to_string(),
            paystack_secret_key: "sk_test".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_string(&settings.public_view()).unwrap();
        assert!(!json.contains("hub-secret"));
        assert!(!json.contains("sk_test"));
    }
}
