//! Room Registry administration (楼层 / 房间 / 负责人)

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Floor, Room, SupervisorCreate, SupervisorDetail};
use sqlx::SqlitePool;

use crate::db::repository::{RepoError, floor, room, supervisor};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text, validate_required_text,
};

#[derive(Clone)]
pub struct Registry {
    pool: SqlitePool,
}

impl Registry {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn floors(&self) -> AppResult<Vec<Floor>> {
        Ok(floor::find_all(&self.pool).await?)
    }

    async fn require_floor(&self, id: i64) -> AppResult<Floor> {
        floor::find_by_id(&self.pool, id).await?.ok_or_else(|| {
            AppError::with_message(ErrorCode::FloorNotFound, format!("Floor {id} not found"))
        })
    }

    pub async fn set_floor_group(&self, id: i64, group_chat_id: Option<String>) -> AppResult<Floor> {
        let group_chat_id = group_chat_id
            .map(|g| g.trim().to_string())
            .filter(|g| !g.is_empty());
        validate_optional_text(group_chat_id.as_deref(), "group_chat_id", MAX_SHORT_TEXT_LEN)?;
        self.require_floor(id).await?;

        floor::set_group(&self.pool, id, group_chat_id.as_deref()).await?;
        tracing::info!(floor = id, group = ?group_chat_id, "Floor group updated");
        self.require_floor(id).await
    }

    pub async fn rooms(&self, floor_id: i64) -> AppResult<Vec<Room>> {
        self.require_floor(floor_id).await?;
        Ok(room::find_by_floor(&self.pool, floor_id).await?)
    }

    pub async fn update_room_weight(&self, number: i64, duty_weight: i64) -> AppResult<Room> {
        match room::update_weight(&self.pool, number, duty_weight).await {
            Ok(()) => {}
            Err(RepoError::NotFound(msg)) => {
                return Err(AppError::with_message(ErrorCode::RoomNotFound, msg));
            }
            Err(RepoError::Validation(msg)) => {
                return Err(AppError::with_message(ErrorCode::ValueOutOfRange, msg));
            }
            Err(e) => return Err(e.into()),
        }
        tracing::info!(room = number, duty_weight, "Room duty weight updated");

        room::find_by_number(&self.pool, number).await?.ok_or_else(|| {
            AppError::with_message(ErrorCode::RoomNotFound, format!("Room {number} not found"))
        })
    }

    pub async fn supervisors(&self) -> AppResult<Vec<SupervisorDetail>> {
        Ok(supervisor::find_all(&self.pool).await?)
    }

    pub async fn supervisor(&self, identity: &str) -> AppResult<Option<SupervisorDetail>> {
        Ok(supervisor::find_by_identity(&self.pool, identity).await?)
    }

    /// Register a supervisor, or replace an existing identity's name and floors
    pub async fn register_supervisor(
        &self,
        payload: SupervisorCreate,
        now: i64,
    ) -> AppResult<SupervisorDetail> {
        validate_required_text(&payload.identity, "identity", MAX_SHORT_TEXT_LEN)?;
        validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
        if payload.floors.is_empty() {
            return Err(AppError::with_message(
                ErrorCode::RequiredField,
                "floors must not be empty",
            ));
        }

        let mut floors = payload.floors;
        floors.sort_unstable();
        floors.dedup();

        let detail = match supervisor::upsert(
            &self.pool,
            payload.identity.trim(),
            payload.name.trim(),
            &floors,
            now,
        )
        .await
        {
            Ok(detail) => detail,
            Err(RepoError::NotFound(msg)) => {
                return Err(AppError::with_message(ErrorCode::FloorNotFound, msg));
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(
            identity = %detail.supervisor.identity,
            floors = ?detail.floors,
            "Supervisor registered"
        );
        Ok(detail)
    }

    pub async fn delete_supervisor(&self, id: i64) -> AppResult<()> {
        match supervisor::delete(&self.pool, id).await {
            Ok(()) => {
                tracing::info!(supervisor_id = id, "Supervisor deleted");
                Ok(())
            }
            Err(RepoError::NotFound(msg)) => {
                Err(AppError::with_message(ErrorCode::SupervisorNotFound, msg))
            }
            Err(e) => Err(e.into()),
        }
    }
}
