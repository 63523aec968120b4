//! Category ownership and the shared default catalog.
//!
//! Categories either belong to one owner or are system defaults visible to
//! everyone. Defaults are read-only for every owner.

pub mod defaults;

use serde::{Deserialize, Serialize};
use lyvinx_shared::types::UserId;

pub use defaults::{DEFAULT_CATEGORIES, DefaultCategory};

/// Who a category belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "ownerId", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CategoryOwner {
    /// Private to one owner.
    Owner(UserId),
    /// Shared system default.
    SystemDefault,
}

impl CategoryOwner {
    /// Builds the owner tag from a nullable owner column.
    #[must_use]
    pub fn from_column(user_id: Option<UserId>) -> Self {
        user_id.map_or(Self::SystemDefault, Self::Owner)
    }

    /// The owner column value for this tag.
    #[must_use]
    pub const fn to_column(self) -> Option<UserId> {
        match self {
            Self::Owner(id) => Some(id),
            Self::SystemDefault => None,
        }
    }

    /// Returns true for system defaults.
    #[must_use]
    pub const fn is_default(self) -> bool {
        matches!(self, Self::SystemDefault)
    }

    /// Whether `viewer` may read or reference the category.
    #[must_use]
    pub fn is_visible_to(self, viewer: UserId) -> bool {
        match self {
            Self::Owner(id) => id == viewer,
            Self::SystemDefault => true,
        }
    }

    /// Whether `editor` may update or delete the category.
    #[must_use]
    pub fn is_editable_by(self, editor: UserId) -> bool {
        match self {
            Self::Owner(id) => id == editor,
            Self::SystemDefault => false,
        }
    }
}

/// Returns true for `#RRGGBB` colors (case-insensitive).
#[must_use]
pub fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}
