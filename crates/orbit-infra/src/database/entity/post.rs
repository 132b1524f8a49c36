//! Post entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use orbit_core::domain::{Post, PostContent, PostPrivacy};

/// Stored form of [`PostPrivacy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum Privacy {
    #[sea_orm(string_value = "public")]
    Public,
    #[sea_orm(string_value = "friends")]
    Friends,
    #[sea_orm(string_value = "private")]
    Private,
}

impl From<Privacy> for PostPrivacy {
    fn from(value: Privacy) -> Self {
        match value {
            Privacy::Public => PostPrivacy::Public,
            Privacy::Friends => PostPrivacy::Friends,
            Privacy::Private => PostPrivacy::Private,
        }
    }
}

impl From<PostPrivacy> for Privacy {
    fn from(value: PostPrivacy) -> Self {
        match value {
            PostPrivacy::Public => Privacy::Public,
            PostPrivacy::Friends => Privacy::Friends,
            PostPrivacy::Private => Privacy::Private,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub author_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub text: String,
    pub image: String,
    pub likes: Vec<Uuid>,
    pub privacy: Privacy,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::comment::Entity")]
    Comment,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Post {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            author_id: model.author_id,
            content: PostContent {
                text: model.text,
                image: model.image,
            },
            likes: model.likes,
            privacy: model.privacy.into(),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<Post> for ActiveModel {
    fn from(post: Post) -> Self {
        Self {
            id: Set(post.id),
            author_id: Set(post.author_id),
            text: Set(post.content.text),
            image: Set(post.content.image),
            likes: Set(post.likes),
            privacy: Set(post.privacy.into()),
            created_at: Set(post.created_at.into()),
            updated_at: Set(post.updated_at.into()),
        }
    }
}
