pub mod category_handlers;
pub mod post_handlers;
pub mod topic_handlers;
pub mod user_handlers;

use serde::Serialize;

/// Confirmation body returned by the delete endpoints.
#[derive(Serialize)]
pub struct DeleteConfirmation {
    pub message: String,
}

impl DeleteConfirmation {
    pub fn for_entity(entity: &str) -> Self {
        Self {
            message: format!("{entity} deleted successfully"),
        }
    }
}
