// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施模块
///
/// 提供数据库连接和持久化集成
pub mod database;
