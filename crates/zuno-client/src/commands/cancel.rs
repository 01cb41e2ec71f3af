use crate::ClientResult;
use crate::audit::cancel::draft_cancellation;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::CancelData;

pub fn run(
    merchant: &str,
    product: Option<&str>,
    user: Option<&str>,
) -> ClientResult<SuccessEnvelope> {
    let draft = draft_cancellation(merchant, product, user);

    let data = CancelData {
        merchant: draft.merchant,
        product: draft.product,
        recipient: draft.recipient,
        subject: draft.subject,
        body: draft.body,
        mailto: draft.mailto,
    };

    success("cancel", data)
}
