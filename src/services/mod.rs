//! One service per operation family.
//!
//! Services own the validation and sequencing of each operation; the remote
//! calls themselves go through the [`TrackerClient`](crate::domain::ports::TrackerClient) port.

pub mod attachment_service;
pub mod issue_service;
pub mod notification_service;
pub mod people_service;
pub mod proxy_service;

pub use attachment_service::AttachmentService;
pub use issue_service::IssueService;
pub use notification_service::NotificationService;
pub use people_service::PeopleService;
pub use proxy_service::ProxyService;
