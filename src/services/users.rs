//! User registration and lookup. Credential hashing policy lives at the
//! boundary; this service stores whatever hash it is given.

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::queries;
use crate::domain::User;
use crate::error::AppError;
use crate::validation;

#[derive(Debug)]
pub struct RegisterUser {
    pub full_name: String,
    pub cpf: String,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
}

/// Absent fields keep their stored value.
#[derive(Debug, Default)]
pub struct UpdateProfile {
    pub full_name: Option<String>,
    pub phone: Option<String>,
}

#[derive(Clone)]
pub struct UserService {
    pool: SqlitePool,
}

impl UserService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn register(&self, input: RegisterUser) -> Result<User, AppError> {
        let full_name = validation::sanitize_string(&input.full_name);
        validation::validate_required("full_name", &full_name)?;
        validation::validate_max_len("full_name", &full_name, validation::FULL_NAME_MAX_LEN)?;
        if let Some(phone) = &input.phone {
            validation::validate_max_len("phone", phone, validation::PHONE_MAX_LEN)?;
        }

        let cpf = validation::normalize_cpf(&input.cpf)?;
        let email = validation::normalize_email(&input.email)?;

        if queries::cpf_exists(&self.pool, &cpf).await? {
            return Err(AppError::DuplicateIdentity("cpf"));
        }
        if queries::email_exists(&self.pool, &email).await? {
            return Err(AppError::DuplicateIdentity("email"));
        }

        let user = User::new(full_name, cpf, email, input.password_hash, input.phone);
        queries::insert_user(&self.pool, &user).await?;

        tracing::info!(user_id = %user.id, "user registered");

        Ok(user)
    }

    pub async fn get(&self, user_id: Uuid) -> Result<User, AppError> {
        queries::get_user(&self.pool, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))
    }

    /// Identity fields (cpf, email) are immutable after registration; only
    /// the display profile can change.
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        input: UpdateProfile,
    ) -> Result<User, AppError> {
        let mut user = self.get(user_id).await?;

        if let Some(full_name) = input.full_name {
            let full_name = validation::sanitize_string(&full_name);
            validation::validate_required("full_name", &full_name)?;
            validation::validate_max_len("full_name", &full_name, validation::FULL_NAME_MAX_LEN)?;
            user.full_name = full_name;
        }
        if let Some(phone) = input.phone {
            validation::validate_max_len("phone", &phone, validation::PHONE_MAX_LEN)?;
            user.phone = Some(phone);
        }
        user.updated_at = Some(Utc::now());

        if !queries::update_user(&self.pool, &user).await? {
            return Err(AppError::NotFound(format!("User {} not found", user_id)));
        }

        Ok(user)
    }

    /// Soft deactivation. The row is kept, so registered identities stay
    /// reserved, but every lookup (including token resolution) stops seeing
    /// the user at once.
    pub async fn deactivate(&self, user_id: Uuid) -> Result<(), AppError> {
        if !queries::deactivate_user(&self.pool, user_id).await? {
            return Err(AppError::NotFound(format!("User {} not found", user_id)));
        }

        tracing::info!(user_id = %user_id, "user deactivated");

        Ok(())
    }

    /// Constant identity comparison of stored and presented hashes is the
    /// credential layer's job; here a mismatch and a missing user are the
    /// same answer.
    pub async fn authenticate(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<Option<User>, AppError> {
        let email = email.trim().to_lowercase();
        let user = queries::get_user_by_email(&self.pool, &email).await?;

        Ok(user.filter(|u| u.password_hash == password_hash))
    }
}
