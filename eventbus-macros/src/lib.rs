//! eventbus 过程宏
//!
//! - `#[event(handler = dyn XxxHandler, method = on_xxx)]`：为结构体/枚举生成
//!   `::eventbus::event::Event` 实现（事件类型与双分派）。
//!
use proc_macro::TokenStream;

mod event;

/// 事件宏
/// - 自动追加 `#[derive(Debug)]`（若缺失）
/// - 生成 `Event` 实现：`event_type()` 以自身类型为键，`dispatch` 调用 `handler.method(self)`
/// - 支持参数：
///   - `handler = Type`：处理该事件的能力，通常是 `dyn XxxHandler`（必填）
///   - `method = ident`：处理器上接收该事件的方法（必填）
#[proc_macro_attribute]
pub fn event(attr: TokenStream, item: TokenStream) -> TokenStream {
    event::expand(attr, item)
}
