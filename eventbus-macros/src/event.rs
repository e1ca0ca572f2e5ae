use proc_macro::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{
    Attribute, Ident, Item, Path, Result, Token, Type, parse::Parse, parse::ParseStream,
    parse_macro_input,
};

/// #[event] 宏实现
/// - 支持结构体与枚举（枚举的每个变体共用同一个处理器方法）
/// - 确保 `Debug` 派生
/// - 生成 `::eventbus::event::Event` 实现
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as EventAttrConfig);
    let mut input = parse_macro_input!(item as Item);

    let (Some(handler), Some(method)) = (cfg.handler, cfg.method) else {
        return syn::Error::new(
            proc_macro2::Span::call_site(),
            "#[event] requires both 'handler' and 'method', e.g., #[event(handler = dyn OrderHandler, method = on_order)]",
        )
        .to_compile_error()
        .into();
    };

    let (ident, generics) = match &mut input {
        Item::Struct(s) => {
            ensure_debug(&mut s.attrs);
            (s.ident.clone(), s.generics.clone())
        }
        Item::Enum(e) => {
            ensure_debug(&mut e.attrs);
            (e.ident.clone(), e.generics.clone())
        }
        other => {
            return syn::Error::new(
                other.span(),
                "#[event] can only be used on struct or enum types",
            )
            .to_compile_error()
            .into();
        }
    };

    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let out = quote! {
        #input

        impl #impl_generics ::eventbus::event::Event for #ident #ty_generics #where_clause {
            type Handler = #handler;

            fn event_type() -> ::eventbus::event::EventType {
                ::eventbus::event::EventType::of::<Self>()
            }

            fn dispatch(&self, handler: &Self::Handler) -> ::eventbus::event::HandlerResult {
                handler.#method(self)
            }
        }
    };

    TokenStream::from(out)
}

// 已有 derive 中没有 Debug（按末段比较，`std::fmt::Debug` 也算）时追加一条 derive(Debug)
fn ensure_debug(attrs: &mut Vec<Attribute>) {
    let derives_debug = attrs
        .iter()
        .filter(|attr| attr.path().is_ident("derive"))
        .filter_map(|attr| {
            attr.parse_args_with(Punctuated::<Path, Token![,]>::parse_terminated)
                .ok()
        })
        .flatten()
        .any(|path| path.segments.last().is_some_and(|seg| seg.ident == "Debug"));

    if !derives_debug {
        attrs.insert(0, syn::parse_quote!(#[derive(Debug)]));
    }
}

// -------- parsing --------

// 宏参数：handler 类型与处理方法
#[derive(Default)]
struct EventAttrConfig {
    handler: Option<Type>,
    method: Option<Ident>,
}

enum EventAttrValue {
    Handler(Type),
    Method(Ident),
}

struct EventAttrKv {
    key: Ident,
    value: EventAttrValue,
}

impl Parse for EventAttrKv {
    fn parse(input: ParseStream) -> Result<Self> {
        let key: Ident = input.parse()?;
        let _eq: Token![=] = input.parse()?;
        let value = match key.to_string().as_str() {
            "handler" => EventAttrValue::Handler(input.parse()?),
            "method" => EventAttrValue::Method(input.parse()?),
            _ => {
                return Err(syn::Error::new(
                    key.span(),
                    "unknown key; expected 'handler' | 'method'",
                ));
            }
        };
        Ok(Self { key, value })
    }
}

impl Parse for EventAttrConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut cfg = Self::default();
        let pairs = Punctuated::<EventAttrKv, Token![,]>::parse_terminated(input)?;

        for kv in pairs {
            let duplicate = match kv.value {
                EventAttrValue::Handler(ty) => cfg.handler.replace(ty).is_some(),
                EventAttrValue::Method(ident) => cfg.method.replace(ident).is_some(),
            };
            if duplicate {
                return Err(syn::Error::new(
                    kv.key.span(),
                    format!("duplicate key '{}' in attribute", kv.key),
                ));
            }
        }

        Ok(cfg)
    }
}
