//! Repositorio de la galería
//!
//! La lectura aleatoria no carga toda la tabla: cuenta las filas activas,
//! el llamador elige `k` posiciones distintas y solo esas filas se leen.

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    models::gallery::{GalleryImageWithOwner, NewGalleryImage},
    utils::errors::AppError,
};

pub struct GalleryRepository {
    pool: PgPool,
}

/// Instantánea consistente de la galería activa para un muestreo
pub struct GallerySnapshot<'c> {
    tx: Transaction<'c, Postgres>,
}

impl GallerySnapshot<'_> {
    pub async fn count_active(&mut self) -> Result<i64, AppError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM gallery_images WHERE is_active")
                .fetch_one(&mut *self.tx)
                .await?;

        Ok(count)
    }

    /// Filas activas cuyas posiciones (desde 0, por `uploaded_at, id`) están en `ranks`
    pub async fn fetch_ranks(&mut self, ranks: &[i64]) -> Result<Vec<GalleryImageWithOwner>, AppError> {
        if ranks.is_empty() {
            return Ok(Vec::new());
        }

        let images = sqlx::query_as::<_, GalleryImageWithOwner>(
            r#"
            SELECT ranked.*
            FROM (
                SELECT g.*,
                       u.username AS uploaded_by_username,
                       ROW_NUMBER() OVER (ORDER BY g.uploaded_at, g.id) - 1 AS rn
                FROM gallery_images g
                JOIN users u ON u.id = g.uploaded_by
                WHERE g.is_active
            ) ranked
            WHERE ranked.rn = ANY($1)
            "#,
        )
        .bind(ranks)
        .fetch_all(&mut *self.tx)
        .await?;

        Ok(images)
    }

    pub async fn finish(self) -> Result<(), AppError> {
        self.tx.commit().await?;
        Ok(())
    }
}

impl GalleryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Abre una transacción `REPEATABLE READ` para contar y leer sobre la
    /// misma instantánea
    pub async fn snapshot(&self) -> Result<GallerySnapshot<'static>, AppError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;

        Ok(GallerySnapshot { tx })
    }

    pub async fn create(
        &self,
        uploaded_by: Uuid,
        image: &NewGalleryImage,
    ) -> Result<GalleryImageWithOwner, AppError> {
        let created = sqlx::query_as::<_, GalleryImageWithOwner>(
            r#"
            WITH inserted AS (
                INSERT INTO gallery_images (id, title, description, image_url, uploaded_by)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING *
            )
            SELECT inserted.*, u.username AS uploaded_by_username
            FROM inserted
            JOIN users u ON u.id = inserted.uploaded_by
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&image.title)
        .bind(&image.description)
        .bind(&image.image_url)
        .bind(uploaded_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    pub async fn find_active(&self, id: Uuid) -> Result<Option<GalleryImageWithOwner>, AppError> {
        let image = sqlx::query_as::<_, GalleryImageWithOwner>(
            r#"
            SELECT g.*, u.username AS uploaded_by_username
            FROM gallery_images g
            JOIN users u ON u.id = g.uploaded_by
            WHERE g.id = $1 AND g.is_active
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(image)
    }

    /// Cambia título y descripción; los `None` conservan el valor actual
    pub async fn update(
        &self,
        id: Uuid,
        title: Option<&str>,
        description: Option<&str>,
    ) -> Result<Option<GalleryImageWithOwner>, AppError> {
        let image = sqlx::query_as::<_, GalleryImageWithOwner>(
            r#"
            WITH updated AS (
                UPDATE gallery_images SET
                    title = COALESCE($2, title),
                    description = COALESCE($3, description)
                WHERE id = $1 AND is_active
                RETURNING *
            )
            SELECT updated.*, u.username AS uploaded_by_username
            FROM updated
            JOIN users u ON u.id = updated.uploaded_by
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(description)
        .fetch_optional(&self.pool)
        .await?;

        Ok(image)
    }

    /// Borrado lógico; `false` si no había imagen activa
    pub async fn soft_delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result =
            sqlx::query("UPDATE gallery_images SET is_active = FALSE WHERE id = $1 AND is_active")
                .bind(id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}
