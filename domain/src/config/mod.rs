//! Configuration entities for the domain layer
//!
//! Channels, models and roles are configured outside a discussion and
//! consumed as an immutable [`ConfigSnapshot`] when one starts.

mod channel;
mod defaults;
mod ids;
mod model;
mod output_format;
mod role;
mod snapshot;

pub use channel::{Channel, DEFAULT_CHANNEL_TIMEOUT_MS};
pub use ids::{ChannelId, ModelId, RoleId};
pub use model::Model;
pub use output_format::OutputFormat;
pub use role::{ActiveRole, Role};
pub use snapshot::{ConfigSnapshot, DanglingReference, RoleResolution};
