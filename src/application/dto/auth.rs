use crate::domain::user::{User, UserId};
use serde::Serialize;
use utoipa::ToSchema;

/// The user behind a validated session cookie. Inserted into request
/// extensions by the session guard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CurrentUser {
    #[schema(value_type = i64)]
    #[serde(serialize_with = "serialize_user_id")]
    pub id: UserId,
    pub username: String,
    pub display_name: String,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.to_string(),
            display_name: user.display_name().to_string(),
        }
    }
}

fn serialize_user_id<S: serde::Serializer>(id: &UserId, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_i64(id.0)
}
