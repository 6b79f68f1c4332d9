use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    User,
    Buyer,
    Supplier,
    Admin,
    SuperAdmin,
}

/// Dashboard area gated by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Companies,
    Products,
    Warehouses,
    WarehouseProducts,
    Orders,
    TrackShipment,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::User,
        Role::Buyer,
        Role::Supplier,
        Role::Admin,
        Role::SuperAdmin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Buyer => "BUYER",
            Role::Supplier => "SUPPLIER",
            Role::Admin => "ADMIN",
            Role::SuperAdmin => "SUPER_ADMIN",
        }
    }

    /// Sections listed for the role. `None` means every section.
    pub fn sections(&self) -> Option<&'static [Section]> {
        use Section::*;
        match self {
            Role::SuperAdmin => None,
            Role::Buyer => Some(&[Companies, Orders, TrackShipment]),
            Role::Supplier => Some(&[
                Companies,
                Products,
                Warehouses,
                WarehouseProducts,
                Orders,
                TrackShipment,
            ]),
            Role::User | Role::Admin => Some(&[]),
        }
    }

    pub fn can_access(&self, section: Section) -> bool {
        self.sections()
            .map(|sections| sections.contains(&section))
            .unwrap_or(true)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| format!("unknown role {}", s))
    }
}
