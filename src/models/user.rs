use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered account as stored in the database.
/// The password hash never leaves the persistence layer.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    #[serde(rename = "isLoggedIn")]
    pub is_logged_in: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Public view of a user returned by friend search and friend listings.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct UserSummary {
    pub id: i32,
    pub username: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_serialization_field_names() {
        let user = User {
            id: 1,
            username: "reader".to_string(),
            email: "reader@example.com".to_string(),
            is_logged_in: true,
            created_at: Utc::now(),
        };

        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["isLoggedIn"], true);
        assert!(value["createdAt"].is_string());
        assert!(value.get("password_hash").is_none());
    }
}
