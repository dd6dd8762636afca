// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 包含应用上下文以及单例的构造和查找
pub mod application;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 基础设施模块
///
/// 提供数据源和持久化工厂
pub mod infrastructure;

/// 工具模块
///
/// 提供错误类型和日志初始化
pub mod utils;
