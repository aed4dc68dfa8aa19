pub mod audit;
pub mod auth;
pub mod pagination;
pub mod records;
pub mod serde_time;
pub mod sync;
pub mod ui;

pub use audit::AuditLogDto;
pub use auth::CurrentUser;
pub use pagination::CursorPage;
pub use records::{MutationDto, RecordDto};
pub use sync::{SyncReport, SyncResultDto};
pub use ui::UiResponse;
