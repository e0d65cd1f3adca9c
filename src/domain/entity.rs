//! Descriptors for every table-backed resource.
//!
//! Each [`EntityKind`] resolves to a static [`Descriptor`] that the generic
//! repository reads to build its statements: which table, which key columns,
//! which columns to project and whether the row owns an uploaded image.

/// Column holding the stored relative image path on image-bearing tables.
pub const IMAGE_COLUMN: &str = "img";

/// Column refreshed with `NOW()` on every update when tracked.
pub const UPDATED_AT_COLUMN: &str = "updated_at";

/// One entry of a column projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    Column(&'static str),
    /// A stored relative image path rendered as an absolute public URL.
    ImageUrl(&'static str),
}

impl Projection {
    pub fn name(self) -> &'static str {
        match self {
            Projection::Column(name) | Projection::ImageUrl(name) => name,
        }
    }

    /// The same column as it is stored, without read-time rewriting.
    pub fn stored(self) -> Self {
        Projection::Column(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSlot {
    /// Sub-directory of the upload root the entity's images live in.
    pub directory: &'static str,
}

#[derive(Debug)]
pub struct Descriptor {
    pub table: &'static str,
    /// Human-readable name used in responses ("Item not found").
    pub label: &'static str,
    pub key: &'static [&'static str],
    pub projection: &'static [Projection],
    pub image: Option<ImageSlot>,
    pub tracks_updates: bool,
}

impl Descriptor {
    pub fn stored_projection(&self) -> impl Iterator<Item = Projection> + '_ {
        self.projection.iter().map(|column| column.stored())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    User,
    Vendor,
    VendorAdmin,
    Role,
    UserRole,
    Item,
    Table,
    Order,
    OrderItem,
    Cart,
    CartItem,
}

impl EntityKind {
    pub const ALL: [EntityKind; 11] = [
        EntityKind::User,
        EntityKind::Vendor,
        EntityKind::VendorAdmin,
        EntityKind::Role,
        EntityKind::UserRole,
        EntityKind::Item,
        EntityKind::Table,
        EntityKind::Order,
        EntityKind::OrderItem,
        EntityKind::Cart,
        EntityKind::CartItem,
    ];

    pub fn descriptor(self) -> &'static Descriptor {
        match self {
            EntityKind::User => &USERS,
            EntityKind::Vendor => &VENDORS,
            EntityKind::VendorAdmin => &VENDOR_ADMINS,
            EntityKind::Role => &ROLES,
            EntityKind::UserRole => &USER_ROLES,
            EntityKind::Item => &ITEMS,
            EntityKind::Table => &TABLES,
            EntityKind::Order => &ORDERS,
            EntityKind::OrderItem => &ORDER_ITEMS,
            EntityKind::Cart => &CARTS,
            EntityKind::CartItem => &CART_ITEMS,
        }
    }
}

use self::Projection::{Column, ImageUrl};

// Password hashes are never projected.
static USERS: Descriptor = Descriptor {
    table: "users",
    label: "User",
    key: &["id"],
    projection: &[
        Column("id"),
        Column("name"),
        Column("email"),
        Column("phone"),
        Column("created_at"),
        Column("updated_at"),
        ImageUrl(IMAGE_COLUMN),
    ],
    image: Some(ImageSlot { directory: "users" }),
    tracks_updates: true,
};

static VENDORS: Descriptor = Descriptor {
    table: "vendors",
    label: "Vendor",
    key: &["id"],
    projection: &[
        Column("id"),
        Column("name"),
        Column("description"),
        Column("created_at"),
        Column("updated_at"),
        ImageUrl(IMAGE_COLUMN),
    ],
    image: Some(ImageSlot {
        directory: "vendors",
    }),
    tracks_updates: true,
};

static VENDOR_ADMINS: Descriptor = Descriptor {
    table: "vendor_admins",
    label: "Vendor admin",
    key: &["user_id", "vendor_id"],
    projection: &[Column("user_id"), Column("vendor_id")],
    image: None,
    tracks_updates: false,
};

static ROLES: Descriptor = Descriptor {
    table: "roles",
    label: "Role",
    key: &["id"],
    projection: &[
        Column("id"),
        Column("name"),
        Column("created_at"),
        Column("updated_at"),
    ],
    image: None,
    tracks_updates: true,
};

static USER_ROLES: Descriptor = Descriptor {
    table: "user_roles",
    label: "User role",
    key: &["user_id", "role_id"],
    projection: &[Column("user_id"), Column("role_id")],
    image: None,
    tracks_updates: false,
};

static ITEMS: Descriptor = Descriptor {
    table: "items",
    label: "Item",
    key: &["id"],
    projection: &[
        Column("id"),
        Column("vendor_id"),
        Column("name"),
        Column("price"),
        Column("created_at"),
        Column("updated_at"),
        ImageUrl(IMAGE_COLUMN),
    ],
    image: Some(ImageSlot { directory: "items" }),
    tracks_updates: true,
};

static TABLES: Descriptor = Descriptor {
    table: "tables",
    label: "Table",
    key: &["id"],
    projection: &[
        Column("id"),
        Column("vendor_id"),
        Column("name"),
        Column("is_available"),
        Column("customer_id"),
        Column("is_needs_service"),
    ],
    image: None,
    tracks_updates: false,
};

static ORDERS: Descriptor = Descriptor {
    table: "orders",
    label: "Order",
    key: &["id"],
    projection: &[
        Column("id"),
        Column("total_order_cost"),
        Column("customer_id"),
        Column("vendor_id"),
        Column("status"),
        Column("created_at"),
        Column("updated_at"),
    ],
    image: None,
    tracks_updates: true,
};

static ORDER_ITEMS: Descriptor = Descriptor {
    table: "order_items",
    label: "Order item",
    key: &["id"],
    projection: &[
        Column("id"),
        Column("order_id"),
        Column("item_id"),
        Column("quantity"),
        Column("price"),
    ],
    image: None,
    tracks_updates: false,
};

static CARTS: Descriptor = Descriptor {
    table: "carts",
    label: "Cart",
    key: &["id"],
    projection: &[
        Column("id"),
        Column("total_price"),
        Column("quantity"),
        Column("vendor_id"),
        Column("created_at"),
        Column("updated_at"),
    ],
    image: None,
    tracks_updates: true,
};

static CART_ITEMS: Descriptor = Descriptor {
    table: "cart_items",
    label: "Cart item",
    key: &["cart_id", "item_id"],
    projection: &[Column("cart_id"), Column("item_id"), Column("quantity")],
    image: None,
    tracks_updates: false,
};
