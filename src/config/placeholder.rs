// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::utils::errors::{BootstrapError, BootstrapResult};
use config::{Config, Value, ValueKind};
use once_cell::sync::Lazy;
use regex::Regex;

/// 占位符最大嵌套层数
pub const MAX_PLACEHOLDER_DEPTH: usize = 8;

const PLACEHOLDER_OPEN: &str = "${";

// Body between the braces: key, then an optional default that may nest placeholders
static PLACEHOLDER_BODY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^([^{}:]+)(?::(.*))?$").expect("placeholder pattern"));

/// 占位符解析器
///
/// 先在合并后的配置树中查找键，找不到时再查环境变量
pub struct PlaceholderResolver<'a> {
    config: &'a Config,
    env: &'a dyn Fn(&str) -> Option<String>,
}

impl<'a> PlaceholderResolver<'a> {
    pub fn new(config: &'a Config, env: &'a dyn Fn(&str) -> Option<String>) -> Self {
        Self { config, env }
    }

    /// 替换文本中的全部占位符
    ///
    /// # 参数
    ///
    /// * `text` - 可能包含 `${...}` 的字符串
    ///
    /// # 返回值
    ///
    /// * `Ok(String)` - 替换后的字符串
    /// * `Err(BootstrapError)` - 存在无法解析或循环引用的占位符
    pub fn resolve(&self, text: &str) -> BootstrapResult<String> {
        self.resolve_at_depth(text, 0)
    }

    fn resolve_at_depth(&self, text: &str, depth: usize) -> BootstrapResult<String> {
        let mut resolved = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(open) = rest.find(PLACEHOLDER_OPEN) {
            let body_start = open + PLACEHOLDER_OPEN.len();
            let Some(close) = closing_brace(&rest[body_start..]) else {
                // Unterminated, keep the tail verbatim
                break;
            };
            resolved.push_str(&rest[..open]);
            resolved.push_str(&self.resolve_body(&rest[body_start..body_start + close], depth)?);
            rest = &rest[body_start + close + 1..];
        }
        resolved.push_str(rest);
        Ok(resolved)
    }

    fn resolve_body(&self, body: &str, depth: usize) -> BootstrapResult<String> {
        let caps = PLACEHOLDER_BODY
            .captures(body)
            .ok_or_else(|| BootstrapError::Placeholder {
                key: body.to_string(),
            })?;
        let key = caps[1].trim();
        if depth >= MAX_PLACEHOLDER_DEPTH {
            return Err(BootstrapError::PlaceholderDepth {
                key: key.to_string(),
            });
        }

        // The default is only expanded when the key is absent
        match (self.lookup(key), caps.get(2)) {
            (Some(value), _) => self.resolve_at_depth(&value, depth + 1),
            (None, Some(default)) => self.resolve_at_depth(default.as_str(), depth + 1),
            (None, None) => Err(BootstrapError::Placeholder {
                key: key.to_string(),
            }),
        }
    }

    fn lookup(&self, key: &str) -> Option<String> {
        self.config
            .get_string(key)
            .ok()
            .or_else(|| (self.env)(key))
    }
}

/// 查找与开头 `${` 配对的 `}` 位置
fn closing_brace(body: &str) -> Option<usize> {
    let mut open = 0usize;
    for (idx, ch) in body.char_indices() {
        match ch {
            '{' => open += 1,
            '}' if open == 0 => return Some(idx),
            '}' => open -= 1,
            _ => {}
        }
    }
    None
}

/// 收集配置树中所有包含占位符的字符串值
///
/// 表按 `a.b` 展开，数组元素按 `a.b[0]` 展开
///
/// # 返回值
///
/// 返回 `(路径, 原始字符串)` 列表
pub fn collect_placeholders(config: &Config) -> BootstrapResult<Vec<(String, String)>> {
    let root: config::Map<String, Value> = config.clone().try_deserialize()?;
    let mut found = Vec::new();
    for (key, value) in &root {
        walk(key, value, &mut found);
    }
    Ok(found)
}

fn walk(path: &str, value: &Value, found: &mut Vec<(String, String)>) {
    match &value.kind {
        ValueKind::String(text) if text.contains(PLACEHOLDER_OPEN) => {
            found.push((path.to_string(), text.clone()));
        }
        ValueKind::Table(table) => {
            for (key, child) in table {
                walk(&format!("{path}.{key}"), child, found);
            }
        }
        ValueKind::Array(items) => {
            for (idx, child) in items.iter().enumerate() {
                walk(&format!("{path}[{idx}]"), child, found);
            }
        }
        _ => {}
    }
}
