use crate::{
    auth::AuthService,
    db::DbPool,
    entities::admin::{self, ActiveModel as AdminActiveModel, Entity as AdminEntity},
    errors::ServiceError,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAdminRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Admin profile as returned by login and create; never carries the hash.
#[derive(Debug, Serialize, ToSchema)]
pub struct AdminProfile {
    pub id: Uuid,
    pub role: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl From<admin::Model> for AdminProfile {
    fn from(model: admin::Model) -> Self {
        Self {
            id: model.id,
            role: model.role,
            email: model.email,
            phone: model.phone,
            first_name: model.first_name,
            last_name: model.last_name,
        }
    }
}

#[derive(Clone)]
pub struct AdminService {
    db_pool: Arc<DbPool>,
    auth: Arc<AuthService>,
}

impl AdminService {
    pub fn new(db_pool: Arc<DbPool>, auth: Arc<AuthService>) -> Self {
        Self { db_pool, auth }
    }

    /// Creates an admin account. Email and password are the only required
    /// fields; a missing one is the client's mistake (`INCOMPLETE_FORM`),
    /// a taken email is a conflict (`DUPLICATE`).
    #[instrument(skip(self, request))]
    pub async fn create_admin(
        &self,
        request: CreateAdminRequest,
    ) -> Result<AdminProfile, ServiceError> {
        let email = request
            .email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or(ServiceError::IncompleteForm)?
            .to_lowercase();
        let password = request
            .password
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or(ServiceError::IncompleteForm)?;

        let existing = AdminEntity::find()
            .filter(admin::Column::Email.eq(email.clone()))
            .one(&*self.db_pool)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Duplicate);
        }

        let password_hash = self.auth.hash_password(password)?;

        let model = AdminActiveModel {
            id: Set(Uuid::new_v4()),
            role: Set("admin".to_string()),
            email: Set(email),
            password_hash: Set(password_hash),
            phone: Set(request.phone),
            first_name: Set(request.first_name),
            last_name: Set(request.last_name),
        }
        .insert(&*self.db_pool)
        .await?;

        info!(admin_id = %model.id, "admin created");
        Ok(model.into())
    }

    /// Verifies login credentials. Unknown email and wrong password are
    /// reported separately, preserving the login contract.
    #[instrument(skip(self, request))]
    pub async fn verify_credentials(
        &self,
        request: LoginRequest,
    ) -> Result<admin::Model, ServiceError> {
        let email = request
            .email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or(ServiceError::IncompleteForm)?
            .to_lowercase();
        let password = request
            .password
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or(ServiceError::IncompleteForm)?;

        let admin = AdminEntity::find()
            .filter(admin::Column::Email.eq(email.clone()))
            .one(&*self.db_pool)
            .await?
            .ok_or(ServiceError::NoUserFound)?;

        if !self.auth.verify_password(password, &admin.password_hash)? {
            warn!(email = %email, "failed login attempt");
            return Err(ServiceError::InvalidCredentials);
        }

        Ok(admin)
    }
}
