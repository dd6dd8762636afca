// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::utils::errors::{BootstrapError, BootstrapResult};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::any::Any;
use std::sync::Arc;

type Bean = Arc<dyn Any + Send + Sync>;

/// 具名单例注册表
///
/// 每个名称只构造一次，之后的查找都返回同一个实例
#[derive(Default)]
pub struct BeanRegistry {
    beans: DashMap<&'static str, Bean>,
}

impl BeanRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按名称和类型查找单例
    ///
    /// 名称不存在或类型不符时返回 `None`
    pub fn get<T: Any + Send + Sync>(&self, name: &str) -> Option<Arc<T>> {
        let bean = self.beans.get(name)?.value().clone();
        bean.downcast::<T>().ok()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.beans.contains_key(name)
    }

    /// 名称未注册时注册给定实例
    ///
    /// # 返回值
    ///
    /// * `Ok((Arc<T>, true))` - 新注册的实例
    /// * `Ok((Arc<T>, false))` - 已存在的实例，给定实例被丢弃
    /// * `Err(BootstrapError)` - 已存在的实例类型不同
    pub fn register_if_missing<T: Any + Send + Sync>(
        &self,
        name: &'static str,
        bean: T,
    ) -> BootstrapResult<(Arc<T>, bool)> {
        let mut created = false;
        let bean = self.get_or_try_insert_with(name, || {
            created = true;
            Ok(bean)
        })?;
        Ok((bean, created))
    }

    /// 获取单例，不存在时用 `init` 构造并注册
    ///
    /// `init` 在持有注册表分片锁时执行，不能再访问同一个注册表
    pub fn get_or_try_insert_with<T, F>(&self, name: &'static str, init: F) -> BootstrapResult<Arc<T>>
    where
        T: Any + Send + Sync,
        F: FnOnce() -> BootstrapResult<T>,
    {
        match self.beans.entry(name) {
            Entry::Occupied(entry) => entry
                .get()
                .clone()
                .downcast::<T>()
                .map_err(|_| BootstrapError::BeanTypeMismatch { name }),
            Entry::Vacant(entry) => {
                let bean = Arc::new(init()?);
                entry.insert(bean.clone());
                tracing::debug!(bean = name, "Registered singleton");
                Ok(bean)
            }
        }
    }

    /// 已注册的名称，按字母排序
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.beans.iter().map(|entry| *entry.key()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.beans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beans.is_empty()
    }
}

impl std::fmt::Debug for BeanRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BeanRegistry")
            .field("names", &self.names())
            .finish()
    }
}
