//! Group Service - named circles of users

use sea_orm::*;
use serde::{Deserialize, Serialize};

use super::store;
use crate::domain::{
    ConstraintViolation, DomainError, Resource, ValidationError, errors::map_unique_violation,
};
use crate::models::group::{self, Entity as Group};
use crate::models::group_member::{self, Entity as GroupMember};
use crate::models::user::{Entity as User, UserDto};

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct NewGroup {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_private: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MemberDto {
    pub user: UserDto,
    pub is_admin: bool,
    pub joined_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupDetail {
    pub group: group::Model,
    pub members: Vec<MemberDto>,
}

/// URL-safe form of a group name: lowercase letters and digits, with runs
/// of whitespace, hyphens or underscores collapsed to one hyphen.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.trim().chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else if c.is_whitespace() || c == '-' || c == '_' {
            pending_dash = true;
        }
    }
    slug
}

/// Create a group; the creator joins it as admin.
pub async fn create_group(
    db: &DatabaseConnection,
    creator_id: i32,
    input: NewGroup,
) -> Result<group::Model, DomainError> {
    let name = input.name.trim().to_string();
    let slug = slugify(&name);
    if slug.is_empty() {
        return Err(ValidationError::InvalidName.into());
    }

    let txn = db.begin().await?;
    store::require_user(&txn, creator_id).await?;

    let now = store::now();
    let saved = group::ActiveModel {
        name: Set(name),
        slug: Set(slug),
        description: Set(input.description),
        is_private: Set(input.is_private),
        created_at: Set(now.clone()),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(|e| map_unique_violation(e, ConstraintViolation::DuplicateGroup))?;

    group_member::ActiveModel {
        user_id: Set(creator_id),
        group_id: Set(saved.id),
        is_admin: Set(true),
        joined_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    tracing::info!("Group '{}' created by user {}", saved.slug, creator_id);
    Ok(saved)
}

async fn require_group<C: ConnectionTrait>(db: &C, slug: &str) -> Result<group::Model, DomainError> {
    Group::find()
        .filter(group::Column::Slug.eq(slug))
        .one(db)
        .await?
        .ok_or(DomainError::NotFound(Resource::Group))
}

pub async fn join_group(
    db: &DatabaseConnection,
    user_id: i32,
    slug: &str,
) -> Result<group_member::Model, DomainError> {
    let txn = db.begin().await?;
    store::require_user(&txn, user_id).await?;
    let group = require_group(&txn, slug).await?;

    let membership = group_member::ActiveModel {
        user_id: Set(user_id),
        group_id: Set(group.id),
        is_admin: Set(false),
        joined_at: Set(store::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(|e| map_unique_violation(e, ConstraintViolation::DuplicateMembership))?;

    txn.commit().await?;

    tracing::info!("User {} joined group '{}'", user_id, slug);
    Ok(membership)
}

pub async fn leave_group(db: &DatabaseConnection, user_id: i32, slug: &str) -> Result<(), DomainError> {
    let txn = db.begin().await?;
    let group = require_group(&txn, slug).await?;

    let result = GroupMember::delete_many()
        .filter(group_member::Column::UserId.eq(user_id))
        .filter(group_member::Column::GroupId.eq(group.id))
        .exec(&txn)
        .await?;

    if result.rows_affected == 0 {
        return Err(DomainError::NotFound(Resource::Membership));
    }

    txn.commit().await?;

    tracing::info!("User {} left group '{}'", user_id, slug);
    Ok(())
}

pub async fn list_groups(db: &DatabaseConnection) -> Result<Vec<group::Model>, DomainError> {
    Ok(Group::find()
        .order_by_asc(group::Column::Name)
        .all(db)
        .await?)
}

pub async fn group_detail(db: &DatabaseConnection, slug: &str) -> Result<GroupDetail, DomainError> {
    let group = require_group(db, slug).await?;

    let members = GroupMember::find()
        .filter(group_member::Column::GroupId.eq(group.id))
        .order_by_asc(group_member::Column::JoinedAt)
        .find_also_related(User)
        .all(db)
        .await?
        .into_iter()
        .filter_map(|(membership, user)| {
            user.map(|u| MemberDto {
                user: u.into(),
                is_admin: membership.is_admin,
                joined_at: membership.joined_at,
            })
        })
        .collect();

    Ok(GroupDetail { group, members })
}

/// Groups the user belongs to, by name
pub async fn groups_of_user<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
) -> Result<Vec<group::Model>, DomainError> {
    let groups = GroupMember::find()
        .filter(group_member::Column::UserId.eq(user_id))
        .find_also_related(Group)
        .all(db)
        .await?;

    let mut groups: Vec<group::Model> = groups.into_iter().filter_map(|(_, g)| g).collect();
    groups.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::slugify;

    #[test]
    fn slug_keeps_words_and_joins_with_hyphens() {
        assert_eq!(slugify("Sci-Fi  Readers"), "sci-fi-readers");
        assert_eq!(slugify("  Book Club #1 "), "book-club-1");
        assert_eq!(slugify("Läsecirkel Göteborg"), "läsecirkel-göteborg");
        assert_eq!(slugify("!!!"), "");
    }
}
