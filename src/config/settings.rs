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

use crate::config::placeholder::{self, PlaceholderResolver};
use crate::utils::errors::BootstrapResult;
use config::builder::{ConfigBuilder, DefaultState};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// 选择激活配置文件的环境变量
pub const PROFILE_ENV_VAR: &str = "SPRING_PROFILES_ACTIVE";

/// 未指定时使用的配置文件名
pub const DEFAULT_PROFILE: &str = "default";

const PROFILE_KEY: &str = "spring.profiles.active";

/// 默认 SQL 方言
pub const DEFAULT_DIALECT: &str = "org.hibernate.dialect.PostgreSQL9Dialect";

/// 默认实体命名空间
pub const DEFAULT_PACKAGES_TO_SCAN: &str = "ormboot::entities";

pub const HBM2DDL_AUTO: &str = "hibernate.hbm2ddl.auto";
pub const DIALECT: &str = "hibernate.dialect";
pub const SHOW_SQL: &str = "hibernate.show_sql";
pub const LOB_NON_CONTEXTUAL_CREATION: &str = "hibernate.jdbc.lob.non_contextual_creation";

/// 应用程序配置设置
///
/// 对应配置树中 `spring` 节点下的所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 配置文件选择
    pub profiles: ProfileSettings,
    /// 数据源配置
    pub datasource: DataSourceSettings,
    /// 持久化工厂配置
    pub jpa: PersistenceSettings,
    /// 启动行为配置
    pub startup: StartupSettings,
}

/// 配置文件设置
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileSettings {
    /// 当前激活的配置文件
    pub active: String,
}

/// 数据源配置设置
///
/// 三个连接属性都允许缺省，缺失只会在打开连接时报错
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataSourceSettings {
    /// 数据库连接URL
    pub url: Option<String>,
    /// 数据库用户名
    pub username: Option<String>,
    /// 数据库密码
    pub password: Option<String>,
    /// 最大连接数
    pub max_connections: Option<u32>,
    /// 最小连接数
    pub min_connections: Option<u32>,
    /// 连接超时时间（秒）
    pub connect_timeout: Option<u64>,
    /// 空闲连接超时时间（秒）
    pub idle_timeout: Option<u64>,
}

/// 表结构处理模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaMode {
    /// 启动时删除并重建所有已注册实体的表
    Recreate,
    /// 启动时检查所有已注册实体的表是否存在
    Validate,
    /// 不做任何处理
    #[serde(rename = "none")]
    Disabled,
}

impl SchemaMode {
    /// 对应 `hibernate.hbm2ddl.auto` 的取值
    pub fn hbm2ddl_value(self) -> &'static str {
        match self {
            SchemaMode::Recreate => "create",
            SchemaMode::Validate => "validate",
            SchemaMode::Disabled => "none",
        }
    }
}

/// 持久化工厂配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct PersistenceSettings {
    /// 表结构处理模式
    pub schema_mode: SchemaMode,
    /// SQL 方言标识
    pub dialect: String,
    /// 是否输出执行的 SQL
    pub show_sql: bool,
    /// 大对象是否使用非上下文创建
    pub lob_non_contextual_creation: bool,
    /// 实体所在的命名空间
    pub packages_to_scan: String,
}

impl Default for PersistenceSettings {
    fn default() -> Self {
        Self {
            schema_mode: SchemaMode::Recreate,
            dialect: DEFAULT_DIALECT.to_string(),
            show_sql: true,
            lob_non_contextual_creation: true,
            packages_to_scan: DEFAULT_PACKAGES_TO_SCAN.to_string(),
        }
    }
}

impl PersistenceSettings {
    /// 生成持久化工厂的附加属性
    ///
    /// # 返回值
    ///
    /// 返回以属性名为键的有序映射
    pub fn additional_properties(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            (
                HBM2DDL_AUTO.to_string(),
                self.schema_mode.hbm2ddl_value().to_string(),
            ),
            (DIALECT.to_string(), self.dialect.clone()),
            (SHOW_SQL.to_string(), self.show_sql.to_string()),
            (
                LOB_NON_CONTEXTUAL_CREATION.to_string(),
                self.lob_non_contextual_creation.to_string(),
            ),
        ])
    }
}

/// 启动行为配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct StartupSettings {
    /// 启动时是否立即打开一次连接并处理表结构
    pub validate_connection: bool,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从配置文件和环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(BootstrapError)` - 配置加载或占位符解析失败
    pub fn new() -> BootstrapResult<Self> {
        SettingsLoader::from_env().load()
    }
}

/// 分层配置加载器
///
/// 优先级由低到高：内置默认值、`config/default`、`config/{profile}`、
/// `SPRING__` 前缀的环境变量、显式覆盖
#[derive(Debug, Clone)]
pub struct SettingsLoader {
    profile: String,
    config_dir: PathBuf,
    env_source: Option<config::Map<String, String>>,
    overrides: Vec<(String, String)>,
}

impl SettingsLoader {
    pub fn new(profile: impl Into<String>) -> Self {
        Self {
            profile: profile.into(),
            config_dir: PathBuf::from("config"),
            env_source: None,
            overrides: Vec::new(),
        }
    }

    /// 从 `SPRING_PROFILES_ACTIVE` 读取配置文件名
    pub fn from_env() -> Self {
        let profile =
            std::env::var(PROFILE_ENV_VAR).unwrap_or_else(|_| DEFAULT_PROFILE.to_string());
        Self::new(profile)
    }

    pub fn config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_dir = dir.into();
        self
    }

    /// 用给定映射代替进程环境变量
    pub fn env_source(mut self, vars: config::Map<String, String>) -> Self {
        self.env_source = Some(vars);
        self
    }

    /// 以最高优先级设置单个配置项
    ///
    /// `spring.profiles.active` 会切换加载的配置文件，而不是只改写报告值
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        if key == PROFILE_KEY {
            self.profile = value.into();
        } else {
            self.overrides.push((key, value.into()));
        }
        self
    }

    /// 加载并解析配置
    ///
    /// 先合并全部来源，再替换字符串值中的 `${...}` 占位符，最后反序列化 `spring` 节点
    pub fn load(&self) -> BootstrapResult<Settings> {
        let raw = self.builder()?.build()?;

        let pending = placeholder::collect_placeholders(&raw)?;
        let resolved = if pending.is_empty() {
            raw
        } else {
            let lookup = |key: &str| self.lookup_env(key);
            let resolver = PlaceholderResolver::new(&raw, &lookup);
            let mut builder = self.builder()?;
            for (path, text) in pending {
                let value = resolver.resolve(&text)?;
                tracing::debug!(key = %path, "Resolved configuration placeholder");
                builder = builder.set_override(path, value)?;
            }
            builder.build()?
        };

        let settings: Settings = resolved.get("spring")?;
        tracing::debug!(profile = %settings.profiles.active, "Configuration loaded");
        Ok(settings)
    }

    fn builder(&self) -> BootstrapResult<ConfigBuilder<DefaultState>> {
        let mut env = Environment::with_prefix("SPRING")
            .separator("__")
            .keep_prefix(true);
        if let Some(vars) = &self.env_source {
            env = env.source(Some(vars.clone()));
        }

        let mut builder = Config::builder()
            // Default pool settings
            .set_default("spring.datasource.max_connections", 10)?
            .set_default("spring.datasource.min_connections", 1)?
            .set_default("spring.datasource.connect_timeout", 10)?
            .set_default("spring.datasource.idle_timeout", 300)?
            // Default persistence settings
            .set_default("spring.jpa.schema_mode", "recreate")?
            .set_default("spring.jpa.dialect", DEFAULT_DIALECT)?
            .set_default("spring.jpa.show_sql", true)?
            .set_default("spring.jpa.lob_non_contextual_creation", true)?
            .set_default("spring.jpa.packages_to_scan", DEFAULT_PACKAGES_TO_SCAN)?
            .set_default("spring.startup.validate_connection", true)?
            .add_source(File::with_name(&self.config_path(DEFAULT_PROFILE)).required(false))
            .add_source(File::with_name(&self.config_path(&self.profile)).required(false))
            .add_source(env);

        for (key, value) in &self.overrides {
            builder = builder.set_override(key.as_str(), value.as_str())?;
        }
        // Only the profile that picked the files may be reported
        Ok(builder.set_override(PROFILE_KEY, self.profile.as_str())?)
    }

    fn config_path(&self, name: &str) -> String {
        self.config_dir.join(name).to_string_lossy().into_owned()
    }

    fn lookup_env(&self, key: &str) -> Option<String> {
        let relaxed = key.replace(['.', '-'], "_").to_uppercase();
        match &self.env_source {
            Some(vars) => vars.get(key).or_else(|| vars.get(&relaxed)).cloned(),
            None => std::env::var(key).or_else(|_| std::env::var(&relaxed)).ok(),
        }
    }
}
