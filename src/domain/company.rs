use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Company value object: a tenant company a user can be granted access to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Company {
    pub id: i64,
    pub name: String,
}

impl Company {
    /// Creates a new Company value object.
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
