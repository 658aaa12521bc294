//! Repositorio de imágenes de vehículo
//!
//! Toda escritura que pueda cambiar la imagen principal bloquea antes la
//! fila del vehículo (`FOR UPDATE`). El índice único parcial
//! `uq_vehicle_images_primary` rechaza cualquier estado con dos principales.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::{
    models::{
        vehicle::Vehicle,
        vehicle_image::{NewVehicleImage, VehicleImage},
    },
    utils::errors::{not_found_error, AppError},
};

/// Bloquea la fila de un vehículo activo hasta el fin de la transacción
pub(crate) async fn lock_active_vehicle(
    conn: &mut PgConnection,
    vehicle_id: Uuid,
) -> Result<Option<Vehicle>, AppError> {
    let vehicle = sqlx::query_as::<_, Vehicle>(
        "SELECT * FROM vehicles WHERE id = $1 AND status = 'active' FOR UPDATE",
    )
    .bind(vehicle_id)
    .fetch_optional(conn)
    .await?;

    Ok(vehicle)
}

pub(crate) async fn vehicle_has_images(
    conn: &mut PgConnection,
    vehicle_id: Uuid,
) -> Result<bool, AppError> {
    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM vehicle_images WHERE vehicle_id = $1)")
            .bind(vehicle_id)
            .fetch_one(conn)
            .await?;

    Ok(exists)
}

/// Quita la marca de principal a todas las imágenes del vehículo.
/// Debe ir en una sentencia aparte antes de marcar la nueva.
async fn demote_primary(conn: &mut PgConnection, vehicle_id: Uuid) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE vehicle_images SET is_primary = FALSE WHERE vehicle_id = $1 AND is_primary",
    )
    .bind(vehicle_id)
    .execute(conn)
    .await?;

    Ok(())
}

/// Inserta una imagen dentro de una transacción que ya bloqueó el vehículo
pub(crate) async fn insert_image(
    conn: &mut PgConnection,
    vehicle_id: Uuid,
    image: &NewVehicleImage,
) -> Result<VehicleImage, AppError> {
    if image.is_primary {
        demote_primary(&mut *conn, vehicle_id).await?;
    }

    let inserted = sqlx::query_as::<_, VehicleImage>(
        r#"
        INSERT INTO vehicle_images (id, vehicle_id, image_url, is_primary)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(vehicle_id)
    .bind(&image.image_url)
    .bind(image.is_primary)
    .fetch_one(&mut *conn)
    .await?;

    Ok(inserted)
}

pub struct VehicleImageRepository {
    pool: PgPool,
}

impl VehicleImageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Imágenes de un vehículo, la principal primero
    pub async fn list_for_vehicle(&self, vehicle_id: Uuid) -> Result<Vec<VehicleImage>, AppError> {
        let images = sqlx::query_as::<_, VehicleImage>(
            r#"
            SELECT * FROM vehicle_images
            WHERE vehicle_id = $1
            ORDER BY is_primary DESC, uploaded_at ASC, id ASC
            "#,
        )
        .bind(vehicle_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(images)
    }

    pub async fn find(
        &self,
        vehicle_id: Uuid,
        image_id: Uuid,
    ) -> Result<Option<VehicleImage>, AppError> {
        let image = sqlx::query_as::<_, VehicleImage>(
            "SELECT * FROM vehicle_images WHERE id = $1 AND vehicle_id = $2",
        )
        .bind(image_id)
        .bind(vehicle_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(image)
    }

    /// Añade imágenes con la marca de principal indicada por el llamador
    pub async fn attach(
        &self,
        vehicle_id: Uuid,
        images: &[NewVehicleImage],
    ) -> Result<Vec<VehicleImage>, AppError> {
        let mut tx = self.pool.begin().await?;

        lock_active_vehicle(&mut tx, vehicle_id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &vehicle_id.to_string()))?;

        let mut inserted = Vec::with_capacity(images.len());
        for image in images {
            inserted.push(insert_image(&mut tx, vehicle_id, image).await?);
        }

        tx.commit().await?;
        Ok(inserted)
    }

    /// Promueve una imagen existente a principal
    pub async fn set_primary(
        &self,
        vehicle_id: Uuid,
        image_id: Uuid,
    ) -> Result<VehicleImage, AppError> {
        let mut tx = self.pool.begin().await?;

        lock_active_vehicle(&mut tx, vehicle_id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &vehicle_id.to_string()))?;

        let belongs: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM vehicle_images WHERE id = $1 AND vehicle_id = $2)",
        )
        .bind(image_id)
        .bind(vehicle_id)
        .fetch_one(&mut *tx)
        .await?;

        if !belongs {
            return Err(not_found_error("Image", &image_id.to_string()));
        }

        demote_primary(&mut tx, vehicle_id).await?;

        let image = sqlx::query_as::<_, VehicleImage>(
            "UPDATE vehicle_images SET is_primary = TRUE WHERE id = $1 RETURNING *",
        )
        .bind(image_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(image)
    }

    /// `true` si alguna imagen de vehículo o de galería (activa o no) sigue
    /// apuntando a `image_url`
    pub async fn url_in_use(&self, image_url: &str) -> Result<bool, AppError> {
        let in_use: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (SELECT 1 FROM vehicle_images WHERE image_url = $1)
                OR EXISTS (SELECT 1 FROM gallery_images WHERE image_url = $1)
            "#,
        )
        .bind(image_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(in_use)
    }

    /// Borra la fila de la imagen y la devuelve para limpiar el fichero
    pub async fn delete(
        &self,
        vehicle_id: Uuid,
        image_id: Uuid,
    ) -> Result<Option<VehicleImage>, AppError> {
        let image = sqlx::query_as::<_, VehicleImage>(
            "DELETE FROM vehicle_images WHERE id = $1 AND vehicle_id = $2 RETURNING *",
        )
        .bind(image_id)
        .bind(vehicle_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(image)
    }
}
