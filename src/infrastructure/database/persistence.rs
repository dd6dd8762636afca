// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::config::settings::{PersistenceSettings, SchemaMode};
use crate::infrastructure::database::data_source::DataSource;
use crate::infrastructure::database::entity_registry::EntityRegistry;
use crate::infrastructure::database::schema;
use crate::utils::errors::BootstrapResult;
use sea_orm::DatabaseConnection;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// ORM 厂商适配器
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VendorAdapter {
    /// 基于 sea-orm 的实现
    SeaOrm,
}

/// 持久化工厂
///
/// 绑定一个数据源和一组显式注册的实体，负责打开连接并按配置处理表结构
#[derive(Debug)]
pub struct PersistenceFactory {
    data_source: Arc<DataSource>,
    packages_to_scan: String,
    vendor_adapter: VendorAdapter,
    properties: BTreeMap<String, String>,
    schema_mode: SchemaMode,
    show_sql: bool,
    entities: EntityRegistry,
}

impl PersistenceFactory {
    /// 创建持久化工厂
    ///
    /// # 参数
    ///
    /// * `data_source` - 已注册的数据源
    /// * `settings` - `spring.jpa` 配置
    /// * `entities` - 显式注册的实体
    pub fn new(
        data_source: Arc<DataSource>,
        settings: &PersistenceSettings,
        entities: EntityRegistry,
    ) -> Self {
        let properties = settings.additional_properties();
        info!(
            packages = %settings.packages_to_scan,
            entities = entities.len(),
            schema_mode = settings.schema_mode.hbm2ddl_value(),
            "Persistence factory configured"
        );

        Self {
            data_source,
            packages_to_scan: settings.packages_to_scan.clone(),
            vendor_adapter: VendorAdapter::SeaOrm,
            properties,
            schema_mode: settings.schema_mode,
            show_sql: settings.show_sql,
            entities,
        }
    }

    pub fn data_source(&self) -> &Arc<DataSource> {
        &self.data_source
    }

    pub fn packages_to_scan(&self) -> &str {
        &self.packages_to_scan
    }

    pub fn vendor_adapter(&self) -> VendorAdapter {
        self.vendor_adapter
    }

    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn schema_mode(&self) -> SchemaMode {
        self.schema_mode
    }

    pub fn entities(&self) -> &EntityRegistry {
        &self.entities
    }

    /// 打开数据库连接
    ///
    /// SQL 日志是否输出由 `show_sql` 决定
    pub async fn open(&self) -> BootstrapResult<DatabaseConnection> {
        self.data_source.connect(self.show_sql).await
    }

    /// 按配置的表结构模式处理已注册实体
    pub async fn initialize_schema(&self, db: &DatabaseConnection) -> BootstrapResult<usize> {
        schema::apply_schema_mode(db, self.schema_mode, &self.entities).await
    }
}
