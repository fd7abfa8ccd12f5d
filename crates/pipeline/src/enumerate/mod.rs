//! Item enumeration.
//!
//! Two sources are supported, both producing a lazy stream of
//! [`MediaItem`](crate::MediaItem)s:
//!
//! - [`backup_items`] lists an exported chat backup directory once.
//! - [`history_items`] pages backwards through a live group chat, newest
//!   messages first, downloading media as it goes. [`configured_history`]
//!   takes the group and page size from [`SourceConfig`](hoard_config::SourceConfig).
//!
//! Both check their source up front: a missing directory or group is a
//! [`SourceNotFound`](crate::error::ErrorKind::SourceNotFound) error before
//! any item is produced. Failures after that are yielded as `Err` items and
//! don't end the stream.

mod backup;
mod history;

pub use self::backup::backup_items;
pub use self::history::{configured_history, history_items};
