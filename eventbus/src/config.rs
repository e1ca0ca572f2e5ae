//! 事件总线配置
//!
//! - `name`：总线名称，仅用于诊断输出与工作线程命名；默认随机 UUID；
//! - `threads`：异步分发线程池大小（至少为 1）。
//!
//! 支持 `bon` 构建器，也可以作为宿主应用配置文件的一部分反序列化：
//!
//! ```
//! use eventbus::EventBusConfig;
//!
//! let cfg = EventBusConfig::builder().name("orders").threads(4).build();
//! assert_eq!(cfg.name, "orders");
//! assert_eq!(cfg.threads, 4);
//! ```
use crate::error::{BusError, BusResult};
use bon::Builder;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Builder, Clone, Debug, Deserialize)]
#[serde(default)]
pub struct EventBusConfig {
    /// 总线名称（工作线程名前缀）
    #[builder(into, default = default_name())]
    pub name: String,
    /// 工作线程数
    #[builder(default = 1)]
    pub threads: usize,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            threads: 1,
        }
    }
}

impl EventBusConfig {
    pub fn validate(&self) -> BusResult<()> {
        if self.threads == 0 {
            return Err(BusError::invalid_config("threads must be at least 1"));
        }
        Ok(())
    }
}

fn default_name() -> String {
    Uuid::new_v4().to_string()
}
