use std::fmt;

/// Cache tag kinds, one per resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    User,
    Company,
    Product,
    Warehouse,
    Order,
    Shipment,
    Receipt,
    InventoryLog,
    RoleRequest,
    Prediction,
}

/// Label attached to cached responses.
///
/// A tag without an id stands for the collection; a tag with an id for one
/// item of it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag {
    kind: TagKind,
    id: Option<String>,
}

impl Tag {
    pub fn list(kind: TagKind) -> Self {
        Self { kind, id: None }
    }

    pub fn id(kind: TagKind, id: impl ToString) -> Self {
        Self {
            kind,
            id: Some(id.to_string()),
        }
    }

    pub fn kind(&self) -> TagKind {
        self.kind
    }

    pub fn item(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Whether invalidating `self` drops a response that provides `provided`.
    ///
    /// A collection tag drops everything of its kind. An item tag drops the
    /// item and the collection responses of its kind.
    pub fn invalidates(&self, provided: &Tag) -> bool {
        if self.kind != provided.kind {
            return false;
        }
        match (&self.id, &provided.id) {
            (None, _) => true,
            (Some(_), None) => true,
            (Some(a), Some(b)) => a == b,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "{:?}:{}", self.kind, id),
            None => write!(f, "{:?}", self.kind),
        }
    }
}
