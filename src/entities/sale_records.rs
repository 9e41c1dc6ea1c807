use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "sale_records")]
pub struct Model {
    /// Store-assigned insertion sequence; listing order follows it.
    #[sea_orm(primary_key)]
    pub seq: i64,
    /// Identifier assigned by the seed feed.
    #[sea_orm(unique)]
    pub id: i64,
    pub title: String,
    pub price: f64,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub category: String,
    pub image: String,
    pub sold: bool,
    pub date_of_sale: Option<DateTimeUtc>,
    /// Unicode lowercase of `title`, matched by search.
    pub title_folded: String,
    #[sea_orm(column_type = "Text")]
    pub description_folded: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
