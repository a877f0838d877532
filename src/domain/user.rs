use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    /// Normalized to eleven digits, punctuation stripped.
    pub cpf: String,
    /// Stored lower-cased; uniqueness is case-insensitive.
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(
        full_name: String,
        cpf: String,
        email: String,
        password_hash: String,
        phone: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            full_name,
            cpf,
            email,
            password_hash,
            phone,
            is_active: true,
            created_at: Utc::now(),
            updated_at: None,
        }
    }
}
