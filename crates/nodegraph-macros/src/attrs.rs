//! Attribute parsing for `#[exposed_api(...)]` and `#[expose(...)]`.

use proc_macro2::TokenStream as TokenStream2;
use syn::parse::{Parse, ParseStream};
use syn::{Ident, LitStr, Token};

/// Conceptual classification override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conceptual {
    Getter,
    Function,
}

impl Conceptual {
    fn parse_ident(ident: &Ident) -> syn::Result<Self> {
        match ident.to_string().as_str() {
            "getter" => Ok(Conceptual::Getter),
            "function" => Ok(Conceptual::Function),
            other => Err(syn::Error::new(
                ident.span(),
                format!("unknown conceptual type '{other}', expected 'getter' or 'function'"),
            )),
        }
    }
}

/// One event declared on the impl attribute: `on_hit(i32, Vec3)`.
#[derive(Debug, Clone)]
pub struct EventDecl {
    pub name: Ident,
    pub args: Vec<syn::Type>,
}

/// Arguments of `#[exposed_api(...)]`, applying to the whole impl block.
#[derive(Debug, Default)]
pub struct TypeAttrs {
    /// Module identity override; defaults to the crate being compiled.
    pub module: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub hide_in_ui: bool,
    pub conceptual: Option<Conceptual>,
    /// Marks an extension impl: bindings target this type instead.
    pub extend: Option<syn::Path>,
    pub events: Vec<EventDecl>,
}

impl TypeAttrs {
    pub fn parse(args: TokenStream2) -> syn::Result<Self> {
        if args.is_empty() {
            return Ok(TypeAttrs::default());
        }
        let mut attrs = TypeAttrs::default();
        let parser = syn::meta::parser(|meta| attrs.parse_one(meta));
        syn::parse::Parser::parse2(parser, args)?;
        Ok(attrs)
    }

    fn parse_one(&mut self, meta: syn::meta::ParseNestedMeta) -> syn::Result<()> {
        if meta.path.is_ident("module") {
            self.module = Some(meta.value()?.parse::<LitStr>()?.value());
        } else if meta.path.is_ident("category") {
            self.category = Some(meta.value()?.parse::<LitStr>()?.value());
        } else if meta.path.is_ident("description") {
            self.description = Some(meta.value()?.parse::<LitStr>()?.value());
        } else if meta.path.is_ident("hide_in_ui") {
            self.hide_in_ui = true;
        } else if meta.path.is_ident("conceptual") {
            let ident: Ident = meta.value()?.parse()?;
            self.conceptual = Some(Conceptual::parse_ident(&ident)?);
        } else if meta.path.is_ident("extend") {
            self.extend = Some(meta.value()?.parse()?);
        } else if meta.path.is_ident("events") {
            meta.parse_nested_meta(|event| {
                let name = event
                    .path
                    .get_ident()
                    .cloned()
                    .ok_or_else(|| event.error("event name must be a plain identifier"))?;
                let mut args = Vec::new();
                if event.input.peek(syn::token::Paren) {
                    let content;
                    syn::parenthesized!(content in event.input);
                    for ty in
                        content.parse_terminated(syn::Type::parse, Token![,])?
                    {
                        args.push(ty);
                    }
                }
                self.events.push(EventDecl { name, args });
                Ok(())
            })?;
        } else {
            return Err(meta.error("unknown exposed_api option"));
        }
        Ok(())
    }
}

/// Arguments of a member-level `#[expose(...)]`.
///
/// Accepts a leading bare string as the description, matching how exposure
/// annotations read at the call site: `#[expose("Adds two numbers")]`.
#[derive(Debug, Default)]
pub struct MemberAttrs {
    pub description: Option<String>,
    pub category: Option<String>,
    pub property: bool,
    pub custom: bool,
    pub hide_in_ui: bool,
    pub force_flow_node: bool,
    pub conceptual: Option<Conceptual>,
}

impl Parse for MemberAttrs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut out = MemberAttrs::default();
        let mut first = true;
        while !input.is_empty() {
            if first && input.peek(LitStr) {
                out.description = Some(input.parse::<LitStr>()?.value());
            } else {
                let ident: Ident = input.parse()?;
                match ident.to_string().as_str() {
                    "property" => out.property = true,
                    "custom" => out.custom = true,
                    "hide_in_ui" => out.hide_in_ui = true,
                    "force_flow_node" => out.force_flow_node = true,
                    "conceptual" => {
                        input.parse::<Token![=]>()?;
                        let value: Ident = input.parse()?;
                        out.conceptual = Some(Conceptual::parse_ident(&value)?);
                    }
                    "category" => {
                        input.parse::<Token![=]>()?;
                        out.category = Some(input.parse::<LitStr>()?.value());
                    }
                    "description" => {
                        input.parse::<Token![=]>()?;
                        out.description = Some(input.parse::<LitStr>()?.value());
                    }
                    other => {
                        return Err(syn::Error::new(
                            ident.span(),
                            format!("unknown expose option '{other}'"),
                        ));
                    }
                }
            }
            first = false;
            if !input.is_empty() {
                input.parse::<Token![,]>()?;
            }
        }
        Ok(out)
    }
}

impl MemberAttrs {
    /// Parse from a `#[expose]` / `#[expose(...)]` attribute.
    pub fn from_attribute(attr: &syn::Attribute) -> syn::Result<Self> {
        match &attr.meta {
            syn::Meta::Path(_) => Ok(MemberAttrs::default()),
            syn::Meta::List(list) => syn::parse2(list.tokens.clone()),
            syn::Meta::NameValue(nv) => Err(syn::Error::new_spanned(
                nv,
                "expected #[expose] or #[expose(...)]",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote::quote;

    #[test]
    fn type_attrs_full_surface() {
        let attrs = TypeAttrs::parse(quote! {
            module = "game_core",
            category = "Gameplay",
            hide_in_ui,
            conceptual = function,
            events(on_hit(i32, Vec3), on_reset)
        })
        .unwrap();
        assert_eq!(attrs.module.as_deref(), Some("game_core"));
        assert_eq!(attrs.category.as_deref(), Some("Gameplay"));
        assert!(attrs.hide_in_ui);
        assert_eq!(attrs.conceptual, Some(Conceptual::Function));
        assert_eq!(attrs.events.len(), 2);
        assert_eq!(attrs.events[0].name.to_string(), "on_hit");
        assert_eq!(attrs.events[0].args.len(), 2);
        assert!(attrs.events[1].args.is_empty());
    }

    #[test]
    fn type_attrs_empty() {
        let attrs = TypeAttrs::parse(TokenStream2::new()).unwrap();
        assert!(attrs.module.is_none());
        assert!(attrs.events.is_empty());
    }

    #[test]
    fn member_attrs_leading_description() {
        let attrs: MemberAttrs =
            syn::parse2(quote! { "Adds two numbers", hide_in_ui }).unwrap();
        assert_eq!(attrs.description.as_deref(), Some("Adds two numbers"));
        assert!(attrs.hide_in_ui);
        assert!(!attrs.property);
    }

    #[test]
    fn member_attrs_options() {
        let attrs: MemberAttrs =
            syn::parse2(quote! { property, conceptual = getter, category = "Math" }).unwrap();
        assert!(attrs.property);
        assert_eq!(attrs.conceptual, Some(Conceptual::Getter));
        assert_eq!(attrs.category.as_deref(), Some("Math"));
    }

    #[test]
    fn member_attrs_rejects_unknown() {
        let result: syn::Result<MemberAttrs> = syn::parse2(quote! { bogus });
        assert!(result.is_err());
    }
}
