use chrono::Utc;
use contracts::domain::a001_product::aggregate::{Product, ProductId};
use contracts::domain::common::{AggregateId, EntityMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a001_product")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: i64,
    /// JSON array of image URLs
    pub image_urls: String,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Product {
    type Error = anyhow::Error;

    fn try_from(m: Model) -> Result<Self, Self::Error> {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            version: m.version,
        };
        let id = ProductId::from_string(&m.id)
            .map_err(|e| anyhow::anyhow!("Invalid product id {}: {}", m.id, e))?;
        let image_urls: Vec<String> = serde_json::from_str(&m.image_urls)
            .map_err(|e| anyhow::anyhow!("Invalid image_urls of product {}: {}", m.id, e))?;

        Ok(Product {
            id,
            title: m.title,
            description: m.description,
            price: m.price,
            image_urls,
            metadata,
        })
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn to_active(aggregate: &Product) -> anyhow::Result<ActiveModel> {
    Ok(ActiveModel {
        id: Set(aggregate.id.as_string()),
        title: Set(aggregate.title.clone()),
        description: Set(aggregate.description.clone()),
        price: Set(aggregate.price),
        image_urls: Set(serde_json::to_string(&aggregate.image_urls)?),
        is_deleted: Set(aggregate.metadata.is_deleted),
        created_at: Set(Some(aggregate.metadata.created_at)),
        updated_at: Set(Some(aggregate.metadata.updated_at)),
        version: Set(aggregate.metadata.version),
    })
}

/// Non-deleted products, most recently updated first
pub async fn list_all() -> anyhow::Result<Vec<Product>> {
    Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .order_by_desc(Column::UpdatedAt)
        .all(conn())
        .await?
        .into_iter()
        .map(Product::try_from)
        .collect()
}

/// Deleted rows are reported as missing
pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Product>> {
    Entity::find_by_id(id.to_string())
        .filter(Column::IsDeleted.eq(false))
        .one(conn())
        .await?
        .map(Product::try_from)
        .transpose()
}

pub async fn insert(aggregate: &Product) -> anyhow::Result<Uuid> {
    let active = to_active(aggregate)?;
    active.insert(conn()).await?;
    Ok(aggregate.id.value())
}

pub async fn update(aggregate: &Product) -> anyhow::Result<()> {
    let mut active = to_active(aggregate)?;
    active.created_at = sea_orm::ActiveValue::NotSet;
    active.update(conn()).await?;
    Ok(())
}

pub async fn soft_delete(id: Uuid) -> anyhow::Result<bool> {
    use sea_orm::sea_query::Expr;
    let result = Entity::update_many()
        .col_expr(Column::IsDeleted, Expr::value(true))
        .col_expr(Column::ImageUrls, Expr::value("[]"))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(Column::Id.eq(id.to_string()))
        .filter(Column::IsDeleted.eq(false))
        .exec(conn())
        .await?;
    Ok(result.rows_affected > 0)
}
