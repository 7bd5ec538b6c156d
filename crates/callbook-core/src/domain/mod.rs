pub mod call;
pub mod email;
pub mod ids;
pub mod phone;

pub use call::{CallDraft, CallFields, CallPatch, CallRecord, FieldPatch};
pub use email::{has_required_domain, REQUIRED_EMAIL_DOMAIN};
pub use ids::{CallId, EmptyTokenError, Revision};
pub use phone::is_valid_phone;
