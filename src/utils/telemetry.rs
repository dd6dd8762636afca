// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// 默认日志过滤规则，`RUST_LOG` 存在时以其为准
pub const DEFAULT_LOG_FILTER: &str = "info,ormboot=debug";

/// 初始化日志系统
///
/// 重复调用不会 panic，已安装的全局订阅者保持不变
pub fn init_telemetry() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
