//! Controlador de estadísticas (solo admin)

use crate::{
    dto::stats_dto::StatsResponse,
    middleware::auth::AuthenticatedUser,
    repositories::stats_repository::StatsRepository,
    services::authorization_service::{authorize, Action, Resource},
    state::AppState,
    utils::errors::AppError,
};

pub struct StatsController {
    repository: StatsRepository,
}

impl StatsController {
    pub fn new(state: &AppState) -> Self {
        Self {
            repository: StatsRepository::new(state.pool.clone()),
        }
    }

    pub async fn get(&self, actor: &AuthenticatedUser) -> Result<StatsResponse, AppError> {
        authorize(actor, Action::Read, Resource::Stats, None)?;

        let stats = self.repository.totals().await?;
        Ok(StatsResponse::from(stats))
    }
}
