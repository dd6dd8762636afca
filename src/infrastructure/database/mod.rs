// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 数据库模块
///
/// 提供数据源、持久化工厂、实体注册和表结构处理功能
pub mod data_source;
pub mod entity_registry;
pub mod persistence;
pub mod schema;
