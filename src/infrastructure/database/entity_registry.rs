// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::sea_query::{Expr, Query, Table};
use sea_orm::{DbBackend, EntityTrait, Schema, Statement};

/// 单个实体的注册信息
///
/// 保存表名以及生成建表、删表、检查语句的函数
#[derive(Clone)]
pub struct EntityRegistration {
    table: String,
    create: fn(DbBackend) -> Statement,
    drop: fn(DbBackend) -> Statement,
    check: fn(DbBackend) -> Statement,
}

impl EntityRegistration {
    pub fn of<E: EntityTrait>() -> Self {
        Self {
            table: E::default().table_name().to_string(),
            create: create_statement::<E>,
            drop: drop_statement::<E>,
            check: check_statement::<E>,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn create_table(&self, backend: DbBackend) -> Statement {
        (self.create)(backend)
    }

    pub fn drop_table(&self, backend: DbBackend) -> Statement {
        (self.drop)(backend)
    }

    /// 存在性检查查询，表不存在时执行失败
    pub fn check_table(&self, backend: DbBackend) -> Statement {
        (self.check)(backend)
    }
}

impl std::fmt::Debug for EntityRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityRegistration")
            .field("table", &self.table)
            .finish()
    }
}

fn create_statement<E: EntityTrait>(backend: DbBackend) -> Statement {
    let schema = Schema::new(backend);
    backend.build(&schema.create_table_from_entity(E::default()))
}

fn drop_statement<E: EntityTrait>(backend: DbBackend) -> Statement {
    let stmt = Table::drop()
        .table(E::default().table_ref())
        .if_exists()
        .to_owned();
    backend.build(&stmt)
}

fn check_statement<E: EntityTrait>(backend: DbBackend) -> Statement {
    let stmt = Query::select()
        .expr(Expr::val(1))
        .from(E::default().table_ref())
        .limit(1)
        .to_owned();
    backend.build(&stmt)
}

/// 实体注册表
///
/// 显式列出持久化工厂管理的实体，按注册顺序建表
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    namespace: String,
    entities: Vec<EntityRegistration>,
}

impl EntityRegistry {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            entities: Vec::new(),
        }
    }

    /// 注册实体，同名表只保留第一次注册
    pub fn register<E: EntityTrait>(mut self) -> Self {
        let registration = EntityRegistration::of::<E>();
        if self.entities.iter().any(|e| e.table == registration.table) {
            tracing::warn!(table = %registration.table, "Entity already registered, skipping");
        } else {
            self.entities.push(registration);
        }
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn entities(&self) -> &[EntityRegistration] {
        &self.entities
    }

    pub fn tables(&self) -> Vec<&str> {
        self.entities.iter().map(EntityRegistration::table).collect()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
