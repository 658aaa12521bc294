//! Repositorio de vehículos
//!
//! Listado con filtros dinámicos (`QueryBuilder`), detalle y escrituras.
//! Todas las lecturas ignoran los vehículos con `status = 'deleted'`.

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    models::{
        vehicle::{NewVehicle, Vehicle, VehicleChanges, VehicleFilter, VehicleSummary, VehicleWithOwner},
        vehicle_image::{NewVehicleImage, VehicleImage},
    },
    repositories::vehicle_image_repository::{insert_image, lock_active_vehicle, vehicle_has_images},
    utils::{errors::AppError, validation::like_pattern},
};

/// Columnas del resumen de listado. La imagen de portada es la principal o,
/// si no hay, la más antigua.
const SUMMARY_COLUMNS: &str = r#"
    SELECT v.id, v.title, v.year, v.price, v.fuel_type, v.transmission, v.mileage,
           v.body_type, v.color, v.created_at,
           u.username AS created_by_username,
           (SELECT vi.image_url FROM vehicle_images vi
             WHERE vi.vehicle_id = v.id
             ORDER BY vi.is_primary DESC, vi.uploaded_at ASC, vi.id ASC
             LIMIT 1) AS primary_image,
           EXISTS (SELECT 1 FROM wishlist_items w
                    WHERE w.vehicle_id = v.id AND w.user_id = "#;

/// Construye la consulta del listado para `actor` con los filtros dados.
/// Los filtros se combinan con AND y los rangos son inclusivos.
pub fn build_list_query(filter: &VehicleFilter, actor: Uuid) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(SUMMARY_COLUMNS);
    qb.push_bind(actor);
    qb.push(
        ") AS is_wishlisted
    FROM vehicles v
    JOIN users u ON u.id = v.created_by
    WHERE v.status = 'active'",
    );

    if let Some(term) = filter.search.as_deref() {
        let pattern = like_pattern(term);
        qb.push(" AND (v.title ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR v.description ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR v.color ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR v.fuel_type::text ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR v.body_type::text ILIKE ");
        qb.push_bind(pattern);
        qb.push(")");
    }

    if let Some(fuel_type) = filter.fuel_type {
        qb.push(" AND v.fuel_type = ");
        qb.push_bind(fuel_type);
    }
    if let Some(body_type) = filter.body_type {
        qb.push(" AND v.body_type = ");
        qb.push_bind(body_type);
    }
    if let Some(transmission) = filter.transmission {
        qb.push(" AND v.transmission = ");
        qb.push_bind(transmission);
    }
    if let Some(min_price) = filter.min_price {
        qb.push(" AND v.price >= ");
        qb.push_bind(min_price);
    }
    if let Some(max_price) = filter.max_price {
        qb.push(" AND v.price <= ");
        qb.push_bind(max_price);
    }
    if let Some(min_year) = filter.min_year {
        qb.push(" AND v.year >= ");
        qb.push_bind(min_year);
    }
    if let Some(max_year) = filter.max_year {
        qb.push(" AND v.year <= ");
        qb.push_bind(max_year);
    }

    qb.push(" ORDER BY v.created_at DESC, v.id ASC");

    if let Some(limit) = filter.limit {
        qb.push(" LIMIT ");
        qb.push_bind(limit);
    }
    if let Some(offset) = filter.offset {
        qb.push(" OFFSET ");
        qb.push_bind(offset);
    }

    qb
}

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        filter: &VehicleFilter,
        actor: Uuid,
    ) -> Result<Vec<VehicleSummary>, AppError> {
        let vehicles = build_list_query(filter, actor)
            .build_query_as::<VehicleSummary>()
            .fetch_all(&self.pool)
            .await?;

        Ok(vehicles)
    }

    /// Vehículo activo sin datos del actor; lo usan las rutas de escritura
    pub async fn find_active(&self, id: Uuid) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            "SELECT * FROM vehicles WHERE id = $1 AND status = 'active'",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vehicle)
    }

    /// Detalle de un vehículo activo visto por `actor`
    pub async fn find_active_detail(
        &self,
        id: Uuid,
        actor: Uuid,
    ) -> Result<Option<VehicleWithOwner>, AppError> {
        let vehicle = sqlx::query_as::<_, VehicleWithOwner>(
            r#"
            SELECT v.*,
                   u.username AS created_by_username,
                   EXISTS (SELECT 1 FROM wishlist_items w
                            WHERE w.vehicle_id = v.id AND w.user_id = $2) AS is_wishlisted
            FROM vehicles v
            JOIN users u ON u.id = v.created_by
            WHERE v.id = $1 AND v.status = 'active'
            "#,
        )
        .bind(id)
        .bind(actor)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vehicle)
    }

    /// Crea el vehículo y sus imágenes en una sola transacción.
    /// La primera imagen queda como principal.
    pub async fn create_with_images(
        &self,
        new_vehicle: &NewVehicle,
        created_by: Uuid,
        image_urls: Vec<String>,
    ) -> Result<(Vehicle, Vec<VehicleImage>), AppError> {
        let mut tx = self.pool.begin().await?;

        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (
                id, title, year, price, fuel_type, transmission, mileage,
                body_type, color, engine, description, features, status, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, 'active', $13)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_vehicle.title)
        .bind(new_vehicle.year)
        .bind(new_vehicle.price)
        .bind(new_vehicle.fuel_type)
        .bind(new_vehicle.transmission)
        .bind(&new_vehicle.mileage)
        .bind(new_vehicle.body_type)
        .bind(&new_vehicle.color)
        .bind(&new_vehicle.engine)
        .bind(&new_vehicle.description)
        .bind(&new_vehicle.features)
        .bind(created_by)
        .fetch_one(&mut *tx)
        .await?;

        let mut images = Vec::new();
        for image in NewVehicleImage::batch(image_urls, false) {
            images.push(insert_image(&mut tx, vehicle.id, &image).await?);
        }

        tx.commit().await?;
        Ok((vehicle, images))
    }

    /// Actualización parcial más imágenes nuevas, bajo el bloqueo del
    /// vehículo. `None` si el vehículo no existe o está borrado.
    pub async fn update_with_images(
        &self,
        id: Uuid,
        changes: &VehicleChanges,
        image_urls: Vec<String>,
    ) -> Result<Option<(Vehicle, Vec<VehicleImage>)>, AppError> {
        let mut tx = self.pool.begin().await?;

        let Some(mut vehicle) = lock_active_vehicle(&mut tx, id).await? else {
            return Ok(None);
        };

        if !changes.is_empty() {
            vehicle = sqlx::query_as::<_, Vehicle>(
                r#"
                UPDATE vehicles SET
                    title = COALESCE($2, title),
                    year = COALESCE($3, year),
                    price = COALESCE($4, price),
                    fuel_type = COALESCE($5, fuel_type),
                    transmission = COALESCE($6, transmission),
                    mileage = COALESCE($7, mileage),
                    body_type = COALESCE($8, body_type),
                    color = COALESCE($9, color),
                    engine = COALESCE($10, engine),
                    description = COALESCE($11, description),
                    features = COALESCE($12, features),
                    updated_at = NOW()
                WHERE id = $1
                RETURNING *
                "#,
            )
            .bind(id)
            .bind(&changes.title)
            .bind(changes.year)
            .bind(changes.price)
            .bind(changes.fuel_type)
            .bind(changes.transmission)
            .bind(&changes.mileage)
            .bind(changes.body_type)
            .bind(&changes.color)
            .bind(&changes.engine)
            .bind(&changes.description)
            .bind(&changes.features)
            .fetch_one(&mut *tx)
            .await?;
        }

        let mut images = Vec::new();
        if !image_urls.is_empty() {
            let has_images = vehicle_has_images(&mut tx, id).await?;
            for image in NewVehicleImage::batch(image_urls, has_images) {
                images.push(insert_image(&mut tx, id, &image).await?);
            }
        }

        tx.commit().await?;
        Ok(Some((vehicle, images)))
    }

    /// Borrado lógico; `false` si no había vehículo activo
    pub async fn soft_delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE vehicles SET status = 'deleted', updated_at = NOW()
            WHERE id = $1 AND status = 'active'
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::vehicle::{BodyType, FuelType};
    use rust_decimal::Decimal;

    #[test]
    fn test_list_query_without_filters() {
        let qb = build_list_query(&VehicleFilter::default(), Uuid::new_v4());
        let sql = qb.sql();

        assert!(sql.contains("WHERE v.status = 'active'"));
        assert!(sql.contains("ORDER BY v.created_at DESC, v.id ASC"));
        assert!(!sql.contains("ILIKE"));
        assert!(!sql.contains("LIMIT"));
    }

    #[test]
    fn test_search_spans_all_text_columns() {
        let filter = VehicleFilter {
            search: Some("red".to_string()),
            ..Default::default()
        };
        let qb = build_list_query(&filter, Uuid::new_v4());
        let sql = qb.sql();

        for column in [
            "v.title ILIKE",
            "v.description ILIKE",
            "v.color ILIKE",
            "v.fuel_type::text ILIKE",
            "v.body_type::text ILIKE",
        ] {
            assert!(sql.contains(column), "missing {column}");
        }
        assert_eq!(sql.matches(" OR ").count(), 4);
    }

    #[test]
    fn test_filters_are_anded_and_inclusive() {
        let filter = VehicleFilter {
            fuel_type: Some(FuelType::Petrol),
            body_type: Some(BodyType::Saloon),
            min_price: Some(Decimal::new(1_000_000, 2)),
            max_price: Some(Decimal::new(2_000_000, 2)),
            min_year: Some(2015),
            max_year: Some(2020),
            limit: Some(10),
            offset: Some(20),
            ..Default::default()
        };
        let qb = build_list_query(&filter, Uuid::new_v4());
        let sql = qb.sql();

        assert!(sql.contains("AND v.fuel_type = $"));
        assert!(sql.contains("AND v.body_type = $"));
        assert!(!sql.contains("v.transmission = "));
        assert!(sql.contains("AND v.price >= $"));
        assert!(sql.contains("AND v.price <= $"));
        assert!(sql.contains("AND v.year >= $"));
        assert!(sql.contains("AND v.year <= $"));
        assert!(sql.contains("LIMIT $"));
        assert!(sql.contains("OFFSET $"));
    }
}
