//! User Service

use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};

use super::store;
use crate::domain::{
    ConstraintViolation, DomainError, Resource, ValidationError, errors::map_unique_violation,
};
use crate::models::user::{self, Entity as User};

#[derive(Debug, Clone, serde::Deserialize, utoipa::ToSchema)]
pub struct NewUser {
    pub username: String,
    pub location: Option<String>,
}

pub async fn create_user(db: &DatabaseConnection, input: NewUser) -> Result<user::Model, DomainError> {
    let username = input.username.trim().to_string();
    if username.is_empty() {
        return Err(ValidationError::InvalidName.into());
    }

    let now = store::now();
    let saved = user::ActiveModel {
        username: Set(username),
        location: Set(input.location.filter(|l| !l.trim().is_empty())),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(|e| map_unique_violation(e, ConstraintViolation::DuplicateUsername))?;

    tracing::info!("User {} signed up as {}", saved.id, saved.username);
    Ok(saved)
}

pub async fn get_user(db: &DatabaseConnection, id: i32) -> Result<user::Model, DomainError> {
    store::require_user(db, id).await
}

/// Delete a user. Ownerships, loans, wishes, requests and memberships
/// go with it through the foreign-key cascades.
pub async fn delete_user(db: &DatabaseConnection, id: i32) -> Result<(), DomainError> {
    let result = User::delete_by_id(id).exec(db).await?;

    if result.rows_affected == 0 {
        return Err(DomainError::NotFound(Resource::User));
    }

    tracing::info!("User {} deleted", id);
    Ok(())
}
