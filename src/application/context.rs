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

use crate::application::bean_registry::BeanRegistry;
use crate::config::settings::Settings;
use crate::infrastructure::database::data_source::DataSource;
use crate::infrastructure::database::entity_registry::EntityRegistry;
use crate::infrastructure::database::persistence::PersistenceFactory;
use crate::utils::errors::BootstrapResult;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing::info;

pub const DATA_SOURCE_BEAN: &str = "dataSource";
pub const ENTITY_MANAGER_FACTORY_BEAN: &str = "entityManagerFactory";
pub const DATABASE_CONNECTION_BEAN: &str = "databaseConnection";

/// 应用上下文
///
/// 持有配置和具名单例，按依赖顺序显式构造数据源和持久化工厂
#[derive(Debug)]
pub struct ApplicationContext {
    settings: Settings,
    entities: EntityRegistry,
    beans: BeanRegistry,
}

impl ApplicationContext {
    /// 创建不含实体的上下文
    pub fn new(settings: Settings) -> Self {
        let entities = EntityRegistry::new(settings.jpa.packages_to_scan.clone());
        Self::with_entities(settings, entities)
    }

    pub fn with_entities(settings: Settings, entities: EntityRegistry) -> Self {
        Self {
            settings,
            entities,
            beans: BeanRegistry::new(),
        }
    }

    /// 构造上下文并启动
    ///
    /// # 参数
    ///
    /// * `settings` - 已加载的配置
    /// * `entities` - 持久化工厂管理的实体
    ///
    /// # 返回值
    ///
    /// * `Ok(ApplicationContext)` - 启动完成的上下文
    /// * `Err(BootstrapError)` - 任一启动步骤失败
    pub async fn run(settings: Settings, entities: EntityRegistry) -> BootstrapResult<Self> {
        let context = Self::with_entities(settings, entities);
        context.start().await?;
        Ok(context)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn beans(&self) -> &BeanRegistry {
        &self.beans
    }

    /// 预先注册自定义数据源
    ///
    /// 已有数据源时保留原有实例
    pub fn register_data_source(&self, data_source: DataSource) -> BootstrapResult<Arc<DataSource>> {
        let (data_source, created) = self.beans.register_if_missing(DATA_SOURCE_BEAN, data_source)?;
        if !created {
            info!("Datasource already registered, keeping existing instance");
        }
        Ok(data_source)
    }

    /// 获取数据源，首次调用时根据配置构造
    pub fn data_source(&self) -> BootstrapResult<Arc<DataSource>> {
        self.beans.get_or_try_insert_with(DATA_SOURCE_BEAN, || {
            Ok(DataSource::from_settings(&self.settings.datasource))
        })
    }

    /// 获取持久化工厂，首次调用时基于已注册的数据源构造
    pub fn entity_manager_factory(&self) -> BootstrapResult<Arc<PersistenceFactory>> {
        if let Some(factory) = self.beans.get(ENTITY_MANAGER_FACTORY_BEAN) {
            return Ok(factory);
        }

        // Resolve outside the factory's entry so the registry lock is not held twice
        let data_source = self.data_source()?;
        self.beans
            .get_or_try_insert_with(ENTITY_MANAGER_FACTORY_BEAN, || {
                Ok(PersistenceFactory::new(
                    data_source,
                    &self.settings.jpa,
                    self.entities.clone(),
                ))
            })
    }

    /// 启动时打开的数据库连接
    pub fn connection(&self) -> Option<Arc<DatabaseConnection>> {
        self.beans.get(DATABASE_CONNECTION_BEAN)
    }

    /// 按依赖顺序构造全部单例，不进行任何 I/O
    pub fn refresh(&self) -> BootstrapResult<()> {
        self.data_source()?;
        self.entity_manager_factory()?;
        info!(beans = ?self.beans.names(), "Application context refreshed");
        Ok(())
    }

    /// 启动上下文
    ///
    /// 构造全部单例；开启连接校验时打开连接并按表结构模式处理已注册实体
    pub async fn start(&self) -> BootstrapResult<()> {
        self.refresh()?;

        if !self.settings.startup.validate_connection {
            info!("Connection validation disabled, skipping eager connect");
            return Ok(());
        }
        if self.connection().is_some() {
            return Ok(());
        }

        let factory = self.entity_manager_factory()?;
        let db = factory.open().await?;
        let tables = factory.initialize_schema(&db).await?;
        info!(tables, "Database connection established");

        self.beans.register_if_missing(DATABASE_CONNECTION_BEAN, db)?;
        Ok(())
    }
}
