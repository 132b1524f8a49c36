//! User entity for SeaORM.
//!
//! Profile and privacy fields are flattened into columns. The friend set is
//! a `uuid[]` column.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use orbit_core::domain::{PrivacySettings, Profile, User};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub avatar: String,
    pub website: Option<String>,
    pub friends: Vec<Uuid>,
    pub is_private: bool,
    pub allow_friend_requests: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::post::Entity")]
    Post,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for User {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            password_hash: model.password_hash,
            profile: Profile {
                first_name: model.first_name,
                last_name: model.last_name,
                bio: model.bio,
                avatar: model.avatar,
                website: model.website,
            },
            friends: model.friends,
            privacy: PrivacySettings {
                is_private: model.is_private,
                allow_friend_requests: model.allow_friend_requests,
            },
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<User> for ActiveModel {
    fn from(user: User) -> Self {
        Self {
            id: Set(user.id),
            username: Set(user.username),
            email: Set(user.email),
            password_hash: Set(user.password_hash),
            first_name: Set(user.profile.first_name),
            last_name: Set(user.profile.last_name),
            bio: Set(user.profile.bio),
            avatar: Set(user.profile.avatar),
            website: Set(user.profile.website),
            friends: Set(user.friends),
            is_private: Set(user.privacy.is_private),
            allow_friend_requests: Set(user.privacy.allow_friend_requests),
            created_at: Set(user.created_at.into()),
            updated_at: Set(user.updated_at.into()),
        }
    }
}
