// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层单元测试
///
/// 测试持久化工厂和实体注册表
pub mod entity_registry_test;
pub mod persistence_factory_test;
