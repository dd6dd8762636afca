// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 处理应用程序的配置设置，包括数据源、持久化工厂和占位符解析
pub mod placeholder;
pub mod settings;
