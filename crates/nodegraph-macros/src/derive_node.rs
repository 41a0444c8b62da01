//! Implementation of `#[derive(NodeType)]`.
//!
//! Generates the `NodeType` identity const plus the object-safe `NodeObject`
//! impl. A single declared base is supported:
//!
//! ```ignore
//! #[derive(NodeType)]
//! #[node(extends = Door)]
//! struct SlidingDoor {
//!     #[node(base)]
//!     door: Door,
//! }
//! ```
//!
//! Downcasts to `Door` then delegate through the marked field.

use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DeriveInput, LitStr};

pub(crate) fn derive_node_type_impl(input: DeriveInput) -> syn::Result<TokenStream2> {
    let ident = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "NodeType cannot be derived for generic types",
        ));
    }

    let mut name: Option<String> = None;
    let mut extends: Option<syn::Path> = None;
    for attr in &input.attrs {
        if !attr.path().is_ident("node") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                name = Some(meta.value()?.parse::<LitStr>()?.value());
            } else if meta.path.is_ident("extends") {
                extends = Some(meta.value()?.parse()?);
            } else {
                return Err(meta.error("unknown node option"));
            }
            Ok(())
        })?;
    }

    let base_field = find_base_field(&input)?;
    match (&extends, &base_field) {
        (Some(_), None) => {
            return Err(syn::Error::new_spanned(
                ident,
                "extends requires a field marked #[node(base)] holding the base value",
            ));
        }
        (None, Some(field)) => {
            return Err(syn::Error::new_spanned(
                field,
                "#[node(base)] requires #[node(extends = ...)] on the type",
            ));
        }
        _ => {}
    }

    let name = name.unwrap_or_else(|| ident.to_string());
    let parent = match &extends {
        Some(base) => quote! {
            ::core::option::Option::Some(<#base as ::nodegraph_core::NodeType>::INFO)
        },
        None => quote! { ::core::option::Option::None },
    };

    let delegate = match &base_field {
        Some(field) => quote! {
            ::nodegraph_core::NodeObject::ancestor_any(&self.#field, hash)
        },
        None => quote! { ::core::option::Option::None },
    };

    Ok(quote! {
        impl ::nodegraph_core::NodeType for #ident {
            const INFO: &'static ::nodegraph_core::TypeInfo =
                &::nodegraph_core::TypeInfo::new(#name, #parent);
        }

        impl ::nodegraph_core::NodeObject for #ident {
            fn type_info(&self) -> &'static ::nodegraph_core::TypeInfo {
                <Self as ::nodegraph_core::NodeType>::INFO
            }

            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }

            fn ancestor_any(
                &self,
                hash: ::nodegraph_core::TypeHash,
            ) -> ::core::option::Option<&dyn ::core::any::Any> {
                if hash == <Self as ::nodegraph_core::NodeType>::INFO.hash {
                    return ::core::option::Option::Some(self as &dyn ::core::any::Any);
                }
                #delegate
            }
        }
    })
}

fn find_base_field(input: &DeriveInput) -> syn::Result<Option<syn::Ident>> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "NodeType can only be derived for structs",
        ));
    };

    let mut base: Option<syn::Ident> = None;
    for field in &data.fields {
        let marked = field.attrs.iter().any(|attr| {
            if !attr.path().is_ident("node") {
                return false;
            }
            let mut is_base = false;
            let _ = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("base") {
                    is_base = true;
                }
                Ok(())
            });
            is_base
        });
        if marked {
            let ident = field.ident.clone().ok_or_else(|| {
                syn::Error::new_spanned(field, "#[node(base)] requires a named field")
            })?;
            if base.replace(ident).is_some() {
                return Err(syn::Error::new_spanned(
                    field,
                    "only one field may be marked #[node(base)]",
                ));
            }
        }
    }
    Ok(base)
}
