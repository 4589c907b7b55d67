use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::RequestState;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "loan_requests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub owner_id: i32,
    pub requester_id: i32,
    pub book_id: i32,
    pub requested_at: String,
    /// true = approved, false = rejected, NULL = not decided yet
    pub decision: Option<bool>,
    pub decision_at: Option<String>,
    pub cancelled_at: Option<String>,
    pub reject_reason: Option<String>,
}

impl Model {
    pub fn state(&self) -> RequestState {
        RequestState::from_fields(self.decision, self.cancelled_at.is_some())
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Owner,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::RequesterId",
        to = "super::user::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Requester,
    #[sea_orm(
        belongs_to = "super::book::Entity",
        from = "Column::BookId",
        to = "super::book::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Book,
}

impl Related<super::book::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Book.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Request as shown to either party
#[derive(Debug, Clone, Serialize)]
pub struct LoanRequestDto {
    pub id: i32,
    pub owner_id: i32,
    pub requester_id: i32,
    pub book_id: i32,
    pub book_title: Option<String>,
    pub state: RequestState,
    pub requested_at: String,
    pub decision_at: Option<String>,
    pub cancelled_at: Option<String>,
    pub reject_reason: Option<String>,
}

impl LoanRequestDto {
    pub fn new(model: Model, book_title: Option<String>) -> Self {
        let state = model.state();
        Self {
            id: model.id,
            owner_id: model.owner_id,
            requester_id: model.requester_id,
            book_id: model.book_id,
            book_title,
            state,
            requested_at: model.requested_at,
            decision_at: model.decision_at,
            cancelled_at: model.cancelled_at,
            reject_reason: model.reject_reason,
        }
    }
}
