// Copyright (C) 2026 The Mela Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The static per-resource descriptor registry.
//!
//! Historically each resource module re-implemented the same
//! add/edit/delete control flow by hand. Here the control flow exists
//! once and everything that varies per resource is data in this
//! module: table and column names, nullability, whether the resource
//! carries an image, which read-back query denormalizes the response,
//! which natural key is unique, and how constraint violations read to
//! a client.

use crate::resource::ResourceKind;

/// One scalar column of a resource table, excluding `id` and the
/// image foreign key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Column name, also the field name in records and snapshots.
    pub name: &'static str,
    /// Whether an explicit null is a legal stored value.
    pub nullable: bool,
}

/// A foreign-key column and the table it references.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKeySpec {
    /// The referencing column on the resource table.
    pub column: &'static str,
    /// The referenced parent table.
    pub parent_table: &'static str,
}

/// Everything that varies between resource types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceDescriptor {
    /// The resource kind this descriptor belongs to.
    pub kind: ResourceKind,
    /// The backing table.
    pub table: &'static str,
    /// Scalar columns, in schema order.
    pub columns: &'static [ColumnSpec],
    /// The image foreign-key column, for image-bearing resources.
    pub image_column: Option<&'static str>,
    /// Denormalized read-back query (`?1` = row id), for resources
    /// whose response includes joined lookups such as day or venue
    /// titles. `None` means the response is assembled from the record
    /// itself.
    pub read_back: Option<&'static str>,
    /// A natural-key column with a uniqueness constraint.
    pub unique_field: Option<&'static str>,
    /// Foreign keys, for naming the offending column on insert/update
    /// referential failures.
    pub foreign_keys: &'static [ForeignKeySpec],
}

impl ResourceDescriptor {
    /// Returns whether a scalar column may hold an explicit null.
    ///
    /// The image field is always nullable; unknown names are not.
    #[must_use]
    pub fn is_nullable(&self, field: &str) -> bool {
        if self.image_column.is_some() && field == "image" {
            return true;
        }
        self.columns
            .iter()
            .any(|column| column.name == field && column.nullable)
    }

    /// Returns whether this resource carries an image reference.
    #[must_use]
    pub const fn has_image(&self) -> bool {
        self.image_column.is_some()
    }
}

const CATEGORIES: ResourceDescriptor = ResourceDescriptor {
    kind: ResourceKind::Category,
    table: "categories",
    columns: &[ColumnSpec {
        name: "name",
        nullable: false,
    }],
    image_column: None,
    read_back: None,
    unique_field: None,
    foreign_keys: &[],
};

const DAYS: ResourceDescriptor = ResourceDescriptor {
    kind: ResourceKind::Day,
    table: "days",
    columns: &[
        ColumnSpec {
            name: "title",
            nullable: false,
        },
        ColumnSpec {
            name: "date",
            nullable: false,
        },
    ],
    image_column: None,
    read_back: None,
    unique_field: None,
    foreign_keys: &[],
};

const EVENTS_READ_BACK: &str = "SELECT events.id, events.title, events.description, \
     events.start_time, events.end_time, events.category_id, events.day_id, \
     events.venue_id, events.room_id, images.identifier AS image, \
     categories.name AS category_name, days.title AS day_title, \
     venues.title AS venue_title \
     FROM events \
     JOIN categories ON categories.id = events.category_id \
     JOIN days ON days.id = events.day_id \
     JOIN venues ON venues.id = events.venue_id \
     LEFT JOIN images ON images.id = events.image_id \
     WHERE events.id = ?1";

const EVENTS: ResourceDescriptor = ResourceDescriptor {
    kind: ResourceKind::Event,
    table: "events",
    columns: &[
        ColumnSpec {
            name: "title",
            nullable: false,
        },
        ColumnSpec {
            name: "description",
            nullable: true,
        },
        ColumnSpec {
            name: "start_time",
            nullable: true,
        },
        ColumnSpec {
            name: "end_time",
            nullable: true,
        },
        ColumnSpec {
            name: "category_id",
            nullable: false,
        },
        ColumnSpec {
            name: "day_id",
            nullable: false,
        },
        ColumnSpec {
            name: "venue_id",
            nullable: false,
        },
        ColumnSpec {
            name: "room_id",
            nullable: true,
        },
    ],
    image_column: Some("image_id"),
    read_back: Some(EVENTS_READ_BACK),
    unique_field: None,
    foreign_keys: &[
        ForeignKeySpec {
            column: "category_id",
            parent_table: "categories",
        },
        ForeignKeySpec {
            column: "day_id",
            parent_table: "days",
        },
        ForeignKeySpec {
            column: "venue_id",
            parent_table: "venues",
        },
        ForeignKeySpec {
            column: "room_id",
            parent_table: "rooms",
        },
    ],
};

const MERCHANDISE: ResourceDescriptor = ResourceDescriptor {
    kind: ResourceKind::Merchandise,
    table: "merchandise",
    columns: &[
        ColumnSpec {
            name: "title",
            nullable: false,
        },
        ColumnSpec {
            name: "description",
            nullable: true,
        },
        ColumnSpec {
            name: "price",
            nullable: false,
        },
    ],
    image_column: Some("image_id"),
    read_back: None,
    unique_field: None,
    foreign_keys: &[],
};

const PRO_SHOWS_READ_BACK: &str = "SELECT pro_shows.id, pro_shows.title, \
     pro_shows.description, pro_shows.day_id, pro_shows.venue_id, \
     images.identifier AS image, days.title AS day_title, \
     venues.title AS venue_title \
     FROM pro_shows \
     JOIN days ON days.id = pro_shows.day_id \
     JOIN venues ON venues.id = pro_shows.venue_id \
     LEFT JOIN images ON images.id = pro_shows.image_id \
     WHERE pro_shows.id = ?1";

const PRO_SHOWS: ResourceDescriptor = ResourceDescriptor {
    kind: ResourceKind::ProShow,
    table: "pro_shows",
    columns: &[
        ColumnSpec {
            name: "title",
            nullable: false,
        },
        ColumnSpec {
            name: "description",
            nullable: true,
        },
        ColumnSpec {
            name: "day_id",
            nullable: false,
        },
        ColumnSpec {
            name: "venue_id",
            nullable: false,
        },
    ],
    image_column: Some("image_id"),
    read_back: Some(PRO_SHOWS_READ_BACK),
    unique_field: None,
    foreign_keys: &[
        ForeignKeySpec {
            column: "day_id",
            parent_table: "days",
        },
        ForeignKeySpec {
            column: "venue_id",
            parent_table: "venues",
        },
    ],
};

const ROOMS: ResourceDescriptor = ResourceDescriptor {
    kind: ResourceKind::Room,
    table: "rooms",
    columns: &[
        ColumnSpec {
            name: "title",
            nullable: false,
        },
        ColumnSpec {
            name: "venue_id",
            nullable: false,
        },
    ],
    image_column: None,
    read_back: None,
    unique_field: None,
    foreign_keys: &[ForeignKeySpec {
        column: "venue_id",
        parent_table: "venues",
    }],
};

const SETTINGS: ResourceDescriptor = ResourceDescriptor {
    kind: ResourceKind::Setting,
    table: "settings",
    columns: &[
        ColumnSpec {
            name: "name",
            nullable: false,
        },
        ColumnSpec {
            name: "value",
            nullable: false,
        },
    ],
    image_column: None,
    read_back: None,
    unique_field: Some("name"),
    foreign_keys: &[],
};

const SPONSORS: ResourceDescriptor = ResourceDescriptor {
    kind: ResourceKind::Sponsor,
    table: "sponsors",
    columns: &[
        ColumnSpec {
            name: "title",
            nullable: false,
        },
        ColumnSpec {
            name: "website",
            nullable: true,
        },
    ],
    image_column: Some("image_id"),
    read_back: None,
    unique_field: None,
    foreign_keys: &[],
};

const TEAM: ResourceDescriptor = ResourceDescriptor {
    kind: ResourceKind::TeamMember,
    table: "team",
    columns: &[
        ColumnSpec {
            name: "name",
            nullable: false,
        },
        ColumnSpec {
            name: "role",
            nullable: false,
        },
        ColumnSpec {
            name: "phone",
            nullable: true,
        },
    ],
    image_column: Some("image_id"),
    read_back: None,
    unique_field: None,
    foreign_keys: &[],
};

const USERS: ResourceDescriptor = ResourceDescriptor {
    kind: ResourceKind::User,
    table: "users",
    columns: &[
        ColumnSpec {
            name: "username",
            nullable: false,
        },
        ColumnSpec {
            name: "name",
            nullable: false,
        },
        ColumnSpec {
            name: "email",
            nullable: false,
        },
        ColumnSpec {
            name: "phone",
            nullable: true,
        },
        ColumnSpec {
            name: "role",
            nullable: false,
        },
    ],
    image_column: None,
    read_back: None,
    unique_field: Some("username"),
    foreign_keys: &[],
};

const VENUES: ResourceDescriptor = ResourceDescriptor {
    kind: ResourceKind::Venue,
    table: "venues",
    columns: &[
        ColumnSpec {
            name: "title",
            nullable: false,
        },
        ColumnSpec {
            name: "address",
            nullable: true,
        },
    ],
    image_column: None,
    read_back: None,
    unique_field: None,
    foreign_keys: &[],
};

/// Returns the descriptor for a resource kind.
#[must_use]
pub fn descriptor(kind: ResourceKind) -> &'static ResourceDescriptor {
    match kind {
        ResourceKind::Category => &CATEGORIES,
        ResourceKind::Day => &DAYS,
        ResourceKind::Event => &EVENTS,
        ResourceKind::Merchandise => &MERCHANDISE,
        ResourceKind::ProShow => &PRO_SHOWS,
        ResourceKind::Room => &ROOMS,
        ResourceKind::Setting => &SETTINGS,
        ResourceKind::Sponsor => &SPONSORS,
        ResourceKind::TeamMember => &TEAM,
        ResourceKind::User => &USERS,
        ResourceKind::Venue => &VENUES,
    }
}
