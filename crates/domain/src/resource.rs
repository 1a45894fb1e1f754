// Copyright (C) 2026 The Mela Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// The resource types managed by the CMS.
///
/// Every kind shares the same mutation machinery; per-kind variance
/// lives entirely in the descriptor registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Category,
    Day,
    Event,
    Merchandise,
    ProShow,
    Room,
    Setting,
    Sponsor,
    TeamMember,
    User,
    Venue,
}

impl ResourceKind {
    /// All resource kinds, in stable order.
    pub const ALL: [Self; 11] = [
        Self::Category,
        Self::Day,
        Self::Event,
        Self::Merchandise,
        Self::ProShow,
        Self::Room,
        Self::Setting,
        Self::Sponsor,
        Self::TeamMember,
        Self::User,
        Self::Venue,
    ];

    /// Stable plural identifier, used in audit action labels.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Category => "categories",
            Self::Day => "days",
            Self::Event => "events",
            Self::Merchandise => "merchandise",
            Self::ProShow => "pro_shows",
            Self::Room => "rooms",
            Self::Setting => "settings",
            Self::Sponsor => "sponsors",
            Self::TeamMember => "team",
            Self::User => "users",
            Self::Venue => "venues",
        }
    }

    /// Human-readable singular name, used in client-facing messages.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Category => "Category",
            Self::Day => "Day",
            Self::Event => "Event",
            Self::Merchandise => "Merchandise item",
            Self::ProShow => "Pro show",
            Self::Room => "Room",
            Self::Setting => "Setting",
            Self::Sponsor => "Sponsor",
            Self::TeamMember => "Team member",
            Self::User => "User",
            Self::Venue => "Venue",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
