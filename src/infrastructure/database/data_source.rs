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

use crate::config::settings::DataSourceSettings;
use crate::utils::errors::{BootstrapError, BootstrapResult};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::fmt;
use std::time::Duration;
use url::Url;

/// 数据源固定使用的驱动标识
pub const POSTGRES_DRIVER: &str = "org.postgresql.Driver";

pub const URL_KEY: &str = "spring.datasource.url";
pub const USERNAME_KEY: &str = "spring.datasource.username";
pub const PASSWORD_KEY: &str = "spring.datasource.password";

const JDBC_PREFIX: &str = "jdbc:";
const MAX_LIFETIME_SECS: u64 = 3600;

/// 连接池参数
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolOptions {
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub connect_timeout: Option<u64>,
    pub idle_timeout: Option<u64>,
}

/// 数据源
///
/// 保存解析后的连接参数，构造后不可变。缺失的连接属性在构造时被容忍，
/// 直到打开连接时才报错
#[derive(Clone)]
pub struct DataSource {
    url: Option<String>,
    username: Option<String>,
    password: Option<String>,
    driver_class_name: &'static str,
    pool: PoolOptions,
}

impl DataSource {
    /// 根据配置创建数据源
    ///
    /// # 参数
    ///
    /// * `settings` - `spring.datasource` 配置
    ///
    /// # 返回值
    ///
    /// 返回新的数据源，从不失败
    pub fn from_settings(settings: &DataSourceSettings) -> Self {
        let data_source = Self {
            url: settings.url.clone(),
            username: settings.username.clone(),
            password: settings.password.clone(),
            driver_class_name: POSTGRES_DRIVER,
            pool: PoolOptions {
                max_connections: settings.max_connections,
                min_connections: settings.min_connections,
                connect_timeout: settings.connect_timeout,
                idle_timeout: settings.idle_timeout,
            },
        };

        tracing::info!(
            url = data_source.url.as_deref().unwrap_or("<unset>"),
            driver = data_source.driver_class_name,
            "Datasource configured"
        );
        data_source
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    pub fn driver_class_name(&self) -> &'static str {
        self.driver_class_name
    }

    /// 生成驱动可直接使用的连接URL
    ///
    /// `jdbc:` 前缀会被去掉；PostgreSQL URL 总是使用配置的用户名和密码，
    /// URL 自带的凭据只能与配置一致，配置缺省时才直接沿用
    ///
    /// # 返回值
    ///
    /// * `Ok(String)` - 连接URL
    /// * `Err(BootstrapError)` - 缺少必需属性或URL无法解析
    pub fn connection_url(&self) -> BootstrapResult<String> {
        let raw = self
            .url
            .as_deref()
            .ok_or(BootstrapError::MissingProperty(URL_KEY))?;
        let native = raw.strip_prefix(JDBC_PREFIX).unwrap_or(raw);

        if !(native.starts_with("postgresql://") || native.starts_with("postgres://")) {
            return Ok(native.to_string());
        }

        let mut parsed =
            Url::parse(native).map_err(|e| BootstrapError::InvalidUrl(format!("{raw}: {e}")))?;

        // Configured credentials win; a URL credential may only repeat them
        if let Some(username) = self.username.as_deref() {
            let mut expected = parsed.clone();
            expected
                .set_username(username)
                .map_err(|_| credentials_error(raw))?;
            if !parsed.username().is_empty() && parsed.username() != expected.username() {
                return Err(BootstrapError::InvalidUrl(format!(
                    "{raw}: url user conflicts with {USERNAME_KEY}"
                )));
            }
            parsed = expected;
        } else if parsed.username().is_empty() {
            return Err(BootstrapError::MissingProperty(USERNAME_KEY));
        }

        if let Some(password) = self.password.as_deref() {
            let mut expected = parsed.clone();
            expected
                .set_password(Some(password))
                .map_err(|_| credentials_error(raw))?;
            if parsed.password().is_some() && parsed.password() != expected.password() {
                return Err(BootstrapError::InvalidUrl(format!(
                    "{raw}: url password conflicts with {PASSWORD_KEY}"
                )));
            }
            parsed = expected;
        } else if parsed.password().is_none() {
            return Err(BootstrapError::MissingProperty(PASSWORD_KEY));
        }

        Ok(parsed.to_string())
    }

    /// 生成连接池选项
    pub fn connect_options(&self) -> BootstrapResult<ConnectOptions> {
        let mut opt = ConnectOptions::new(self.connection_url()?);

        if let Some(max) = self.pool.max_connections {
            opt.max_connections(max);
        }

        if let Some(min) = self.pool.min_connections {
            opt.min_connections(min);
        }

        if let Some(timeout) = self.pool.connect_timeout {
            opt.connect_timeout(Duration::from_secs(timeout));
            opt.acquire_timeout(Duration::from_secs(timeout));
        }

        if let Some(idle) = self.pool.idle_timeout {
            opt.idle_timeout(Duration::from_secs(idle));
        }

        opt.max_lifetime(Duration::from_secs(MAX_LIFETIME_SECS));
        Ok(opt)
    }

    /// 打开数据库连接池
    ///
    /// # 参数
    ///
    /// * `sql_logging` - 是否输出执行的 SQL
    ///
    /// # 返回值
    ///
    /// * `Ok(DatabaseConnection)` - 数据库连接
    /// * `Err(BootstrapError)` - 缺少连接属性或驱动连接失败
    pub async fn connect(&self, sql_logging: bool) -> BootstrapResult<DatabaseConnection> {
        let mut opt = self.connect_options()?;
        opt.sqlx_logging(sql_logging);
        Ok(Database::connect(opt).await?)
    }
}

fn credentials_error(raw: &str) -> BootstrapError {
    BootstrapError::InvalidUrl(format!("{raw}: cannot carry credentials"))
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DataSource{{driver={}, url={}, username={}}}",
            self.driver_class_name,
            self.url.as_deref().unwrap_or("null"),
            self.username.as_deref().unwrap_or("null"),
        )
    }
}

impl fmt::Debug for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataSource")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("driver_class_name", &self.driver_class_name)
            .field("pool", &self.pool)
            .finish()
    }
}
