use std::fmt;

const KEY_SEPARATOR: &str = "::";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupScope {
    Merchant,
    Product,
}

impl GroupScope {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Merchant => "merchant",
            Self::Product => "prod",
        }
    }

    pub const fn subscription_type(self) -> &'static str {
        match self {
            Self::Merchant => "Service Subscription",
            Self::Product => "Product Subscription",
        }
    }
}

/// How merchant names are turned into grouping identity.
///
/// `Verbatim` keeps names case- and whitespace-sensitive, so "Amazon" and
/// "amazon " land in different groups. `Canonical` trims, collapses inner
/// whitespace and lowercases before keying.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MerchantNormalization {
    #[default]
    Verbatim,
    Canonical,
}

impl MerchantNormalization {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Verbatim => "verbatim",
            Self::Canonical => "canonical",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "verbatim" => Some(Self::Verbatim),
            "canonical" => Some(Self::Canonical),
            _ => None,
        }
    }

    pub fn apply(self, merchant_name: &str) -> String {
        match self {
            Self::Verbatim => merchant_name.to_string(),
            Self::Canonical => merchant_name
                .split_whitespace()
                .collect::<Vec<&str>>()
                .join(" ")
                .to_lowercase(),
        }
    }
}

/// Grouping identity: `merchant::<merchant>` or `prod::<merchant>::<product>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey {
    pub scope: GroupScope,
    pub merchant: String,
    pub product_id: Option<String>,
}

impl GroupKey {
    pub fn for_transaction(
        merchant_name: &str,
        product_id: Option<&str>,
        normalization: MerchantNormalization,
    ) -> Self {
        let merchant = normalization.apply(merchant_name);
        match product_id {
            Some(id) => Self {
                scope: GroupScope::Product,
                merchant,
                product_id: Some(id.to_string()),
            },
            None => Self {
                scope: GroupScope::Merchant,
                merchant,
                product_id: None,
            },
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.product_id {
            Some(product_id) => write!(
                f,
                "{}{KEY_SEPARATOR}{}{KEY_SEPARATOR}{product_id}",
                self.scope.as_str(),
                self.merchant
            ),
            None => write!(f, "{}{KEY_SEPARATOR}{}", self.scope.as_str(), self.merchant),
        }
    }
}
