// ==========================================
// WCM 设备台账 - 设备 API
// ==========================================
// 只提供台账表头需要的新增 / 查询
// ==========================================

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::asset_part::{Asset, NewAsset};
use crate::repository::asset_repo::AssetRepository;
use crate::repository::db_utils::now_timestamp;
use crate::repository::error::RepositoryError;

pub struct AssetApi {
    asset_repo: Arc<AssetRepository>,
}

impl AssetApi {
    pub fn new(asset_repo: Arc<AssetRepository>) -> Self {
        Self { asset_repo }
    }

    pub fn create_asset(&self, input: &NewAsset) -> ApiResult<Asset> {
        if input.asset_number.trim().is_empty() {
            return Err(ApiError::InvalidInput("设备编号不能为空".to_string()));
        }
        if input.name.trim().is_empty() {
            return Err(ApiError::InvalidInput("设备名称不能为空".to_string()));
        }

        let id = input
            .id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let asset = Asset {
            id,
            asset_number: input.asset_number.trim().to_string(),
            name: input.name.trim().to_string(),
            location: input.location.clone().filter(|s| !s.trim().is_empty()),
            created_at: now_timestamp(),
        };

        self.asset_repo.insert(&asset).map_err(|e| match e {
            RepositoryError::UniqueConstraintViolation(_) => ApiError::Conflict(format!(
                "设备已存在: id={} / 编号={}",
                asset.id, asset.asset_number
            )),
            other => other.into(),
        })?;
        info!(id = %asset.id, asset_number = %asset.asset_number, "设备已新增");
        Ok(asset)
    }

    pub fn get_asset(&self, id: &str) -> ApiResult<Asset> {
        self.asset_repo
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("设备(id={})不存在", id)))
    }

    pub fn list_assets(&self) -> ApiResult<Vec<Asset>> {
        Ok(self.asset_repo.list()?)
    }
}
