use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "books")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Volume id of the external metadata provider; the natural key.
    #[sea_orm(unique)]
    pub google_book_id: String,
    #[sea_orm(unique)]
    pub isbn_13: Option<String>,
    #[sea_orm(unique)]
    pub isbn_10: Option<String>,
    #[sea_orm(unique)]
    pub other_identifier: Option<String>,
    pub title: String,
    pub authors: String,
    pub thumbnail: Option<String>,
    pub description: String,
    pub page_count: Option<i32>,
    pub published_date: Option<String>,
    pub language: Option<String>,
    pub categories: Option<String>, // JSON array
    pub publisher: Option<String>,
    pub average_rating: Option<f64>,
    pub info_link: Option<String>,
    pub preview_link: Option<String>,
    pub maturity_rating: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::ownership::Entity")]
    Ownerships,
    #[sea_orm(has_many = "super::loan::Entity")]
    Loans,
    #[sea_orm(has_many = "super::wishlist::Entity")]
    Wishes,
}

impl Related<super::ownership::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ownerships.def()
    }
}

impl Related<super::loan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Loans.def()
    }
}

impl Related<super::wishlist::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Wishes.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        super::ownership::Relation::User.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::ownership::Relation::Book.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Candidate attributes for a book, as handed over by the metadata
/// provider. Only `google_book_id` and `title` are mandatory.
#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct BookCandidate {
    pub google_book_id: String,
    pub title: String,
    #[serde(default)]
    pub authors: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub page_count: Option<i32>,
    #[serde(default)]
    pub isbn_13: Option<String>,
    #[serde(default)]
    pub isbn_10: Option<String>,
    #[serde(default)]
    pub other_identifier: Option<String>,
    #[serde(default)]
    pub published_date: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub categories: Option<Vec<String>>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub info_link: Option<String>,
    #[serde(default)]
    pub preview_link: Option<String>,
    #[serde(default)]
    pub maturity_rating: Option<String>,
}

// DTO for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookDto {
    pub id: i32,
    pub google_book_id: String,
    pub title: String,
    pub authors: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub description: String,
    pub page_count: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn_13: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn_10: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maturity_rating: Option<String>,
}

impl From<Model> for BookDto {
    fn from(model: Model) -> Self {
        let categories: Vec<String> = model
            .categories
            .map(|s| serde_json::from_str(&s).unwrap_or_default())
            .unwrap_or_default();

        Self {
            id: model.id,
            google_book_id: model.google_book_id,
            title: model.title,
            authors: model.authors,
            thumbnail: model.thumbnail,
            description: model.description,
            page_count: model.page_count,
            isbn_13: model.isbn_13,
            isbn_10: model.isbn_10,
            other_identifier: model.other_identifier,
            published_date: model.published_date,
            language: model.language,
            categories,
            publisher: model.publisher,
            average_rating: model.average_rating,
            info_link: model.info_link,
            preview_link: model.preview_link,
            maturity_rating: model.maturity_rating,
        }
    }
}
