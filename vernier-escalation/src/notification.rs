//! Grant notification builder. The notification center renders whichever
//! locale the user prefers; both texts ship on every notice.

use vernier_core::constants::GRANT_STATUS_LABEL;
use vernier_core::{Dispute, LocalizedText, NewNotification, NotificationKind};

/// Build the bilingual notice telling a reporter their dispute earned
/// provisional edit access.
pub fn provisional_edit_notice(
    product_name: &str,
    dispute: &Dispute,
    editor: &str,
) -> NewNotification {
    let en = format!(
        "Your dispute for \"{product_name}\" was not resolved in time. \
         You have been granted temporary edit access to correct the listing."
    );
    let es = format!(
        "Tu disputa sobre \"{product_name}\" no se resolvió a tiempo. \
         Se te ha concedido acceso de edición temporal para corregir la publicación."
    );

    NewNotification {
        user_id: editor.to_string(),
        kind: NotificationKind::ProvisionalEdit,
        product_sku: dispute.product_sku.clone(),
        dispute_id: dispute.id.clone(),
        message: LocalizedText::bilingual(en, es),
        status: GRANT_STATUS_LABEL.to_string(),
    }
}
