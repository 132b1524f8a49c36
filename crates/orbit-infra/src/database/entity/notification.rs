//! Notification entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use orbit_core::domain::{Notification, NotificationKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum Kind {
    #[sea_orm(string_value = "like")]
    Like,
    #[sea_orm(string_value = "comment")]
    Comment,
    #[sea_orm(string_value = "friend_request")]
    FriendRequest,
    #[sea_orm(string_value = "friend_accept")]
    FriendAccept,
}

impl From<Kind> for NotificationKind {
    fn from(value: Kind) -> Self {
        match value {
            Kind::Like => NotificationKind::Like,
            Kind::Comment => NotificationKind::Comment,
            Kind::FriendRequest => NotificationKind::FriendRequest,
            Kind::FriendAccept => NotificationKind::FriendAccept,
        }
    }
}

impl From<NotificationKind> for Kind {
    fn from(value: NotificationKind) -> Self {
        match value {
            NotificationKind::Like => Kind::Like,
            NotificationKind::Comment => Kind::Comment,
            NotificationKind::FriendRequest => Kind::FriendRequest,
            NotificationKind::FriendAccept => Kind::FriendAccept,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub kind: Kind,
    pub related_user_id: Option<Uuid>,
    pub related_post_id: Option<Uuid>,
    pub is_read: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::RecipientId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Recipient,
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Notification {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            recipient_id: model.recipient_id,
            kind: model.kind.into(),
            related_user_id: model.related_user_id,
            related_post_id: model.related_post_id,
            is_read: model.is_read,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<Notification> for ActiveModel {
    fn from(notification: Notification) -> Self {
        Self {
            id: Set(notification.id),
            recipient_id: Set(notification.recipient_id),
            kind: Set(notification.kind.into()),
            related_user_id: Set(notification.related_user_id),
            related_post_id: Set(notification.related_post_id),
            is_read: Set(notification.is_read),
            created_at: Set(notification.created_at.into()),
            updated_at: Set(notification.updated_at.into()),
        }
    }
}
