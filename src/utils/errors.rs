// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

/// 启动过程错误类型
///
/// 覆盖配置加载、占位符解析、数据源连接以及表结构处理中出现的所有错误
#[derive(Error, Debug)]
pub enum BootstrapError {
    /// 配置加载或反序列化失败
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// 占位符引用的配置项不存在且没有默认值
    #[error("Could not resolve placeholder '{key}'")]
    Placeholder { key: String },

    /// 占位符嵌套过深，通常意味着循环引用
    #[error("Placeholder '{key}' exceeds the maximum nesting depth")]
    PlaceholderDepth { key: String },

    /// 打开连接时缺少必需的配置项
    #[error("Missing required property: {0}")]
    MissingProperty(&'static str),

    /// 数据库URL无法解析
    #[error("Invalid datasource url: {0}")]
    InvalidUrl(String),

    /// 数据库驱动或连接错误
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// validate 模式下缺失的表
    #[error("Schema validation failed: table '{table}' is not accessible")]
    SchemaValidation { table: String },

    /// 同名单例已以其他类型注册
    #[error("Bean '{name}' is registered with a different type")]
    BeanTypeMismatch { name: &'static str },
}

impl BootstrapError {
    /// 判断错误是否发生在连接打开阶段
    ///
    /// # 返回值
    ///
    /// 缺少连接属性、URL非法或数据库错误时返回true
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            BootstrapError::MissingProperty(_)
                | BootstrapError::InvalidUrl(_)
                | BootstrapError::Database(_)
        )
    }
}

/// 启动过程的结果类型
pub type BootstrapResult<T> = Result<T, BootstrapError>;
