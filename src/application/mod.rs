// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 包含应用上下文和具名单例注册表
pub mod bean_registry;
pub mod context;
