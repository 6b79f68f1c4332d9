//! Typed access to the Stockly REST resources.
//!
//! Endpoints are declared as [`Endpoint`] values carrying the tags they
//! provide or invalidate. Queries go through the client's [`QueryCache`];
//! mutations drop the cached responses they make stale.

mod tag;
pub use self::tag::{Tag, TagKind};

mod cache;
pub use self::cache::QueryCache;

mod page;
pub use self::page::{Direction, Page, PageRequest};

mod endpoint;
pub use self::endpoint::Endpoint;

pub mod model;

mod receipt;
pub use self::receipt::validate_pdf;

mod api;
pub use self::api::Api;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Static facts about a resource collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptor {
    pub name: &'static str,
    pub path: &'static str,
    pub kind: TagKind,
    pub default_sort: &'static str,
    pub default_direction: Option<Direction>,
}

pub trait Resource {
    const DESCRIPTOR: Descriptor;
    type Model: DeserializeOwned + Serialize + Send;
}

pub struct Users;
pub struct Companies;
pub struct Products;
pub struct Warehouses;
pub struct Orders;
pub struct Shipments;
pub struct Receipts;
pub struct InventoryLogs;
pub struct RoleRequests;
pub struct Predictions;

impl Resource for Users {
    const DESCRIPTOR: Descriptor = Descriptor {
        name: "users",
        path: "/users",
        kind: TagKind::User,
        default_sort: "id",
        default_direction: None,
    };
    type Model = model::User;
}

impl Resource for Companies {
    const DESCRIPTOR: Descriptor = Descriptor {
        name: "companies",
        path: "/companies",
        kind: TagKind::Company,
        default_sort: "id",
        default_direction: None,
    };
    type Model = model::Company;
}

impl Resource for Products {
    const DESCRIPTOR: Descriptor = Descriptor {
        name: "products",
        path: "/products",
        kind: TagKind::Product,
        default_sort: "id",
        default_direction: None,
    };
    type Model = model::Product;
}

impl Resource for Warehouses {
    const DESCRIPTOR: Descriptor = Descriptor {
        name: "warehouses",
        path: "/warehouses",
        kind: TagKind::Warehouse,
        default_sort: "id",
        default_direction: Some(Direction::Asc),
    };
    type Model = model::Warehouse;
}

impl Resource for Orders {
    const DESCRIPTOR: Descriptor = Descriptor {
        name: "orders",
        path: "/orders",
        kind: TagKind::Order,
        default_sort: "id",
        default_direction: None,
    };
    type Model = model::Order;
}

impl Resource for Shipments {
    const DESCRIPTOR: Descriptor = Descriptor {
        name: "shipments",
        path: "/shipments",
        kind: TagKind::Shipment,
        default_sort: "id",
        default_direction: None,
    };
    type Model = model::Shipment;
}

impl Resource for Receipts {
    const DESCRIPTOR: Descriptor = Descriptor {
        name: "receipts",
        path: "/receipts",
        kind: TagKind::Receipt,
        default_sort: "orderId",
        default_direction: Some(Direction::Asc),
    };
    type Model = model::Receipt;
}

impl Resource for InventoryLogs {
    const DESCRIPTOR: Descriptor = Descriptor {
        name: "inventory-logs",
        path: "/inventory-logs",
        kind: TagKind::InventoryLog,
        default_sort: "timestamp",
        default_direction: Some(Direction::Desc),
    };
    type Model = model::InventoryLog;
}

impl Resource for RoleRequests {
    const DESCRIPTOR: Descriptor = Descriptor {
        name: "role-requests",
        path: "/role-requests",
        kind: TagKind::RoleRequest,
        default_sort: "id",
        default_direction: None,
    };
    type Model = model::RoleRequest;
}

impl Resource for Predictions {
    const DESCRIPTOR: Descriptor = Descriptor {
        name: "predictions",
        path: "/predictions",
        kind: TagKind::Prediction,
        default_sort: "id",
        default_direction: None,
    };
    type Model = model::Prediction;
}

/// Descriptors of every resource, for lookup by name.
pub const DESCRIPTORS: [Descriptor; 10] = [
    Users::DESCRIPTOR,
    Companies::DESCRIPTOR,
    Products::DESCRIPTOR,
    Warehouses::DESCRIPTOR,
    Orders::DESCRIPTOR,
    Shipments::DESCRIPTOR,
    Receipts::DESCRIPTOR,
    InventoryLogs::DESCRIPTOR,
    RoleRequests::DESCRIPTOR,
    Predictions::DESCRIPTOR,
];

impl Descriptor {
    pub fn lookup(name: &str) -> Option<Descriptor> {
        DESCRIPTORS.iter().find(|d| d.name == name).copied()
    }

    pub(crate) fn item_path(&self, id: impl std::fmt::Display) -> String {
        format!("{}/{}", self.path, id)
    }

    pub(crate) fn sub_path(&self, suffix: &str) -> String {
        format!("{}/{}", self.path, suffix)
    }
}
