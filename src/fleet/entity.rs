use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EntityKind {
    Satellite,
    Ship,
}

impl EntityKind {
    /// The kind an entity of this kind is ranged against.
    pub fn counterpart(&self) -> EntityKind {
        match self {
            EntityKind::Satellite => EntityKind::Ship,
            EntityKind::Ship => EntityKind::Satellite,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub id: String,
}

impl EntityRef {
    pub fn satellite(id: impl Into<String>) -> Self {
        Self {
            kind: EntityKind::Satellite,
            id: id.into(),
        }
    }

    pub fn ship(id: impl Into<String>) -> Self {
        Self {
            kind: EntityKind::Ship,
            id: id.into(),
        }
    }
}
