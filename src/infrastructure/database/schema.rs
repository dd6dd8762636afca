// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::SchemaMode;
use crate::infrastructure::database::entity_registry::EntityRegistry;
use crate::utils::errors::{BootstrapError, BootstrapResult};
use sea_orm::{ConnectionTrait, DatabaseConnection};
use tracing::{debug, info};

/// 按表结构模式处理已注册实体的表
///
/// # 参数
///
/// * `db` - 已打开的数据库连接
/// * `mode` - 表结构处理模式
/// * `registry` - 已注册的实体
///
/// # 返回值
///
/// * `Ok(usize)` - 被处理的表数量，`none` 模式下为0
/// * `Err(BootstrapError)` - 执行语句失败或校验不通过
pub async fn apply_schema_mode(
    db: &DatabaseConnection,
    mode: SchemaMode,
    registry: &EntityRegistry,
) -> BootstrapResult<usize> {
    let backend = db.get_database_backend();

    match mode {
        SchemaMode::Recreate => {
            // Drop in reverse so later tables referencing earlier ones go first
            for entity in registry.entities().iter().rev() {
                debug!(table = entity.table(), "Dropping table");
                db.execute(entity.drop_table(backend)).await?;
            }
            for entity in registry.entities() {
                debug!(table = entity.table(), "Creating table");
                db.execute(entity.create_table(backend)).await?;
            }
            info!(tables = registry.len(), "Schema recreated");
            Ok(registry.len())
        }
        SchemaMode::Validate => {
            for entity in registry.entities() {
                db.query_all(entity.check_table(backend))
                    .await
                    .map_err(|_| BootstrapError::SchemaValidation {
                        table: entity.table().to_string(),
                    })?;
            }
            info!(tables = registry.len(), "Schema validated");
            Ok(registry.len())
        }
        SchemaMode::Disabled => {
            debug!("Schema handling disabled");
            Ok(0)
        }
    }
}
