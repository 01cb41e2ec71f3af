use serde::Serialize;

const FALLBACK_MERCHANT: &str = "Your Service";
const FALLBACK_USER: &str = "customer";

/// A ready-to-send cancellation request for one subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CancelDraft {
    pub merchant: String,
    pub product: Option<String>,
    pub subject: String,
    pub body: String,
    pub recipient: String,
    pub mailto: String,
}

pub fn draft_cancellation(merchant: &str, product: Option<&str>, user: Option<&str>) -> CancelDraft {
    let merchant = non_blank(Some(merchant)).unwrap_or(FALLBACK_MERCHANT);
    let product = non_blank(product);
    let user = non_blank(user).unwrap_or(FALLBACK_USER);
    let target = product.unwrap_or(merchant);

    let subject = format!("Request to cancel {target} subscription");
    let body = [
        format!("Hello {merchant} Support,"),
        String::new(),
        format!("I'd like to cancel my subscription to {target} effective immediately."),
        "Please confirm the cancellation and any applicable refund per your policy.".to_string(),
        String::new(),
        format!("Account/Name: {user}"),
        String::new(),
        "Thank you,".to_string(),
        user.to_string(),
    ]
    .join("\n");

    let recipient = support_address(merchant);
    let mailto = format!(
        "mailto:{recipient}?subject={}&body={}",
        urlencoding::encode(&subject),
        urlencoding::encode(&body)
    );

    CancelDraft {
        merchant: merchant.to_string(),
        product: product.map(str::to_string),
        subject,
        body,
        recipient,
        mailto,
    }
}

fn support_address(merchant: &str) -> String {
    let domain = merchant
        .chars()
        .filter(|character| !character.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    format!("support@{domain}.com")
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|text| !text.is_empty())
}
