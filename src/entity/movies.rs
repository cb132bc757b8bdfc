use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "movies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub release_date: Option<Date>,
    pub total_revenue: Option<f64>,
    pub director_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::directors::Entity",
        from = "Column::DirectorId",
        to = "super::directors::Column::Id"
    )]
    Directors,
    #[sea_orm(has_many = "super::movie_genres::Entity")]
    MovieGenres,
}

impl Related<super::directors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Directors.def()
    }
}

impl Related<super::movie_genres::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MovieGenres.def()
    }
}

// Many-to-many to genres through the movie_genres join table.
impl Related<super::genres::Entity> for Entity {
    fn to() -> RelationDef {
        super::movie_genres::Relation::Genres.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::movie_genres::Relation::Movies.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
