use std::collections::HashMap;
use std::str::FromStr;

use async_trait::async_trait;
use caddie_core::catalog::{CatalogError, CatalogSource};
use caddie_core::domain::club::{CatalogDocument, ClubModel, ClubModelId};
use caddie_core::domain::description::DescriptionFacts;
use caddie_core::domain::variant::{RetailerPrice, Variant, VariantId};
use rust_decimal::Decimal;
use sqlx::{sqlite::SqliteRow, Row};
use tracing::warn;

use super::{ClubRepository, RepositoryError};
use crate::DbPool;

pub struct SqlClubRepository {
    pool: DbPool,
}

impl SqlClubRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    fn parse_price(raw: &str) -> Option<Decimal> {
        Decimal::from_str(raw.trim()).ok()
    }

    fn offer_from_row(row: &SqliteRow) -> Result<Option<(i64, RetailerPrice)>, RepositoryError> {
        let variant_id: i64 = row.try_get("variant_id")?;
        let retailer: String = row.try_get("retailer")?;
        let price_text: String = row.try_get("price_text")?;

        let Some(price) = Self::parse_price(&price_text) else {
            warn!(
                event_name = "catalog.store.bad_offer_price",
                variant_id,
                retailer = %retailer,
                price_text = %price_text,
                "skipping retailer offer with unparseable price"
            );
            return Ok(None);
        };

        Ok(Some((variant_id, RetailerPrice { retailer, price, url: row.try_get("url")? })))
    }

    fn variant_from_row(row: &SqliteRow) -> Result<Option<(i64, Variant)>, RepositoryError> {
        let id: i64 = row.try_get("id")?;
        let club_id: i64 = row.try_get("club_id")?;
        let price_text: String = row.try_get("price_text")?;

        let Some(price) = Self::parse_price(&price_text) else {
            warn!(
                event_name = "catalog.store.bad_variant_price",
                variant_id = id,
                club_id,
                price_text = %price_text,
                "skipping variant with unparseable price"
            );
            return Ok(None);
        };

        let description: String = row.try_get("description")?;
        let facts = DescriptionFacts::parse(&description);
        Ok(Some((
            club_id,
            Variant {
                id: VariantId(id),
                loft: row.try_get("loft")?,
                shaft_material: row.try_get("shaftmaterial")?,
                set_makeup: row.try_get("setmakeup")?,
                length: row.try_get("length")?,
                bounce: row.try_get("bounce")?,
                price,
                description,
                source: row.try_get("source")?,
                url: row.try_get("url")?,
                prices: Vec::new(),
                facts,
            },
        )))
    }

    fn model_from_row(row: &SqliteRow) -> Result<ClubModel, RepositoryError> {
        Ok(ClubModel {
            id: Some(ClubModelId(row.try_get("id")?)),
            club_type: row.try_get("type")?,
            subtype: row.try_get("subtype")?,
            specific_type: row.try_get("specifictype")?,
            brand: row.try_get("brand")?,
            model: row.try_get("model")?,
            handicapper_level: row.try_get("handicapperlevel")?,
            category: row.try_get("category")?,
            image: row.try_get("image")?,
            variants: Vec::new(),
        })
    }
}

#[async_trait]
impl ClubRepository for SqlClubRepository {
    async fn list_club_models(&self) -> Result<Vec<ClubModel>, RepositoryError> {
        let club_rows = sqlx::query(
            r#"
            SELECT id, brand, model, type, category, subtype, specifictype,
                   handicapperlevel, image
            FROM clubs
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let variant_rows = sqlx::query(
            r#"
            SELECT id, club_id, price_text, loft, shaftmaterial, setmakeup, length, bounce,
                   description, source, url
            FROM variants
            ORDER BY club_id, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let offer_rows = sqlx::query(
            "SELECT variant_id, retailer, price_text, url FROM variant_prices
             ORDER BY variant_id, position",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut offers: HashMap<i64, Vec<RetailerPrice>> = HashMap::new();
        for row in &offer_rows {
            if let Some((variant_id, offer)) = Self::offer_from_row(row)? {
                offers.entry(variant_id).or_default().push(offer);
            }
        }

        let mut variants: HashMap<i64, Vec<Variant>> = HashMap::new();
        for row in &variant_rows {
            if let Some((club_id, mut variant)) = Self::variant_from_row(row)? {
                variant.prices = offers.remove(&variant.id.0).unwrap_or_default();
                variants.entry(club_id).or_default().push(variant);
            }
        }

        club_rows
            .iter()
            .map(|row| {
                let mut model = Self::model_from_row(row)?;
                if let Some(ClubModelId(id)) = model.id {
                    model.variants = variants.remove(&id).unwrap_or_default();
                }
                Ok(model)
            })
            .collect()
    }

    async fn replace_catalog(&self, models: &[ClubModel]) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM variant_prices").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM variants").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM clubs").execute(&mut *tx).await?;

        for model in models {
            let inserted = sqlx::query(
                r#"
                INSERT INTO clubs (
                    id, brand, model, type, category, subtype, specifictype,
                    handicapperlevel, image
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(model.id.map(|id| id.0))
            .bind(&model.brand)
            .bind(&model.model)
            .bind(&model.club_type)
            .bind(&model.category)
            .bind(&model.subtype)
            .bind(&model.specific_type)
            .bind(&model.handicapper_level)
            .bind(&model.image)
            .execute(&mut *tx)
            .await?;
            let club_id = inserted.last_insert_rowid();

            for variant in &model.variants {
                sqlx::query(
                    r#"
                    INSERT INTO variants (
                        id, club_id, price_text, loft, shaftmaterial, setmakeup, length,
                        bounce, description, source, url
                    ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(variant.id.0)
                .bind(club_id)
                .bind(variant.price.to_string())
                .bind(&variant.loft)
                .bind(&variant.shaft_material)
                .bind(&variant.set_makeup)
                .bind(&variant.length)
                .bind(&variant.bounce)
                .bind(&variant.description)
                .bind(&variant.source)
                .bind(&variant.url)
                .execute(&mut *tx)
                .await?;

                for (position, offer) in variant.prices.iter().enumerate() {
                    sqlx::query(
                        "INSERT INTO variant_prices (variant_id, position, retailer, price_text, url)
                         VALUES (?, ?, ?, ?, ?)",
                    )
                    .bind(variant.id.0)
                    .bind(position as i64)
                    .bind(&offer.retailer)
                    .bind(offer.price.to_string())
                    .bind(&offer.url)
                    .execute(&mut *tx)
                    .await?;
                }
            }
        }

        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl CatalogSource for SqlClubRepository {
    async fn fetch_catalog(&self) -> Result<CatalogDocument, CatalogError> {
        let clubs = self.list_club_models().await?;
        Ok(CatalogDocument { clubs })
    }
}
