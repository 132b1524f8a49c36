//! Friend request entity for SeaORM.
//!
//! `(sender_id, receiver_id)` carries a unique index, see the migration.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use orbit_core::domain::{FriendRequest, FriendRequestStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum Status {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "accepted")]
    Accepted,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl From<Status> for FriendRequestStatus {
    fn from(value: Status) -> Self {
        match value {
            Status::Pending => FriendRequestStatus::Pending,
            Status::Accepted => FriendRequestStatus::Accepted,
            Status::Rejected => FriendRequestStatus::Rejected,
        }
    }
}

impl From<FriendRequestStatus> for Status {
    fn from(value: FriendRequestStatus) -> Self {
        match value {
            FriendRequestStatus::Pending => Status::Pending,
            FriendRequestStatus::Accepted => Status::Accepted,
            FriendRequestStatus::Rejected => Status::Rejected,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "friend_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub status: Status,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::SenderId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Sender,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ReceiverId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Receiver,
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for FriendRequest {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            sender_id: model.sender_id,
            receiver_id: model.receiver_id,
            status: model.status.into(),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<FriendRequest> for ActiveModel {
    fn from(request: FriendRequest) -> Self {
        Self {
            id: Set(request.id),
            sender_id: Set(request.sender_id),
            receiver_id: Set(request.receiver_id),
            status: Set(request.status.into()),
            created_at: Set(request.created_at.into()),
            updated_at: Set(request.updated_at.into()),
        }
    }
}
