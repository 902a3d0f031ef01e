//! Curby domain entities.
//!
//! Each entity is a row struct extending the generic record contract
//! (`id`, `created_at`, `updated_at`), a creation draft, and one metadata
//! descriptor declared with [`crate::descriptor!`]. Status-style fields are
//! stored as text and parsed leniently into closed enums with an `Unknown`
//! fallback, so an unrecognized value renders as a defined variant instead
//! of failing the row.

mod broadcast;
mod coin;
mod device;
mod event;
mod feedback;
mod item;
mod moderation;
mod notification_template;
mod review;
mod schedule;
mod support;

pub use broadcast::{Broadcast, BroadcastDelivery, BroadcastDeliveryDraft, BroadcastDeliveryStatus, BroadcastDraft};
pub use coin::{CurbyCoinTransactionType, CurbyCoinTransactionTypeDraft};
pub use device::{Device, DeviceDraft};
pub use event::{Event, EventDraft, EventType, EventTypeDraft};
pub use feedback::{Feedback, FeedbackDraft};
pub use item::{Item, ItemDraft, ItemStatus, SavedItem, SavedItemDraft};
pub use moderation::{
    UserBan, UserBanDraft, UserSuspension, UserSuspensionDraft, UserWarning, UserWarningDraft,
};
pub use notification_template::{NotificationTemplate, NotificationTemplateDraft};
pub use review::{ItemReview, ItemReviewDraft, ReviewStatus, UserReview, UserReviewDraft};
pub use schedule::{Schedule, ScheduleDraft};
pub use support::{SupportRequestMessageMedia, SupportRequestMessageMediaDraft};
