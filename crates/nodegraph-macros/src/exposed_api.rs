//! Implementation of `#[exposed_api]`: thunk synthesis and manifest
//! construction for an impl block.
//!
//! For every `#[expose]`-annotated method this generates a `CALL_*` thunk
//! with the uniform `(target, stack)` calling convention, and for every
//! declared event a `GET_EVENTID_*` accessor, a `HANDLE_*` handler, and
//! subscribe/unsubscribe wrappers. A `__exposed_bindings()` constructor
//! assembles the type's manifest entry from the synthesized pieces.
//!
//! Thunks pop declared parameters in declaration order (callers push in
//! reverse), so the stack protocol is fixed here and nowhere else.

use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use std::collections::HashSet;

use crate::attrs::{Conceptual, EventDecl, MemberAttrs, TypeAttrs};
use crate::event_id;

/// One of the eight stack kinds, as seen in a signature.
#[derive(Clone, Copy, PartialEq, Eq)]
enum ValueTy {
    Bool,
    Int,
    Float,
    Str,
    Vector3,
    Quaternion,
    Color,
    Object,
}

impl ValueTy {
    fn from_path(path: &syn::Path) -> Option<ValueTy> {
        let ident = path.segments.last()?.ident.to_string();
        match ident.as_str() {
            "bool" => Some(ValueTy::Bool),
            "i32" => Some(ValueTy::Int),
            "f32" => Some(ValueTy::Float),
            "String" => Some(ValueTy::Str),
            "Vec3" => Some(ValueTy::Vector3),
            "Quat" => Some(ValueTy::Quaternion),
            "Color" => Some(ValueTy::Color),
            "ObjRef" => Some(ValueTy::Object),
            _ => None,
        }
    }

    fn from_type(ty: &syn::Type) -> Option<ValueTy> {
        match ty {
            syn::Type::Path(path) => ValueTy::from_path(&path.path),
            _ => None,
        }
    }

    fn kind(self) -> TokenStream2 {
        let ident = format_ident!("{}", match self {
            ValueTy::Bool => "Bool",
            ValueTy::Int => "Int",
            ValueTy::Float => "Float",
            ValueTy::Str => "String",
            ValueTy::Vector3 => "Vector3",
            ValueTy::Quaternion => "Quaternion",
            ValueTy::Color => "Color",
            ValueTy::Object => "Object",
        });
        quote!(::nodegraph_core::ValueKind::#ident)
    }

    fn pop_method(self) -> syn::Ident {
        format_ident!("pop_{}", self.suffix())
    }

    fn push_method(self) -> syn::Ident {
        format_ident!("push_{}", self.suffix())
    }

    fn suffix(self) -> &'static str {
        match self {
            ValueTy::Bool => "bool",
            ValueTy::Int => "int",
            ValueTy::Float => "float",
            ValueTy::Str => "string",
            ValueTy::Vector3 => "vector3",
            ValueTy::Quaternion => "quaternion",
            ValueTy::Color => "color",
            ValueTy::Object => "object",
        }
    }
}

const SUPPORTED: &str =
    "supported stack types are bool, i32, f32, String, Vec3, Quat, Color, and ObjRef";

/// How one declared parameter is marshaled.
enum ParamTy {
    /// By-value stack payload, popped by the thunk.
    Value(ValueTy),
    /// `&mut K` out-parameter: defaulted locally, pushed after the call.
    Out(ValueTy, syn::Type),
    /// `&C` object parameter with a checked downcast.
    TypedObject(syn::Path),
}

struct Param {
    name: String,
    ty: ParamTy,
}

enum TargetKind {
    Instance,
    Static,
    Extension,
}

enum BoundKind {
    Function,
    PropertyGet,
    PropertySet,
}

struct ExposedMethod {
    ident: syn::Ident,
    attrs: MemberAttrs,
    target: TargetKind,
    kind: BoundKind,
    params: Vec<Param>,
    ret: Option<ValueTy>,
}

pub(crate) fn exposed_api_impl(
    args: TokenStream2,
    item: TokenStream2,
) -> syn::Result<TokenStream2> {
    let type_attrs = TypeAttrs::parse(args)?;
    let mut item: syn::ItemImpl = syn::parse2(item)?;

    if let Some((_, path, _)) = &item.trait_ {
        return Err(syn::Error::new_spanned(
            path,
            "#[exposed_api] applies to inherent impls only",
        ));
    }
    if !item.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &item.generics,
            "#[exposed_api] does not support generic impls",
        ));
    }

    let self_ty = (*item.self_ty).clone();
    let is_extension = type_attrs.extend.is_some();
    let target_ty: syn::Type = match &type_attrs.extend {
        Some(path) => syn::Type::Path(syn::TypePath {
            qself: None,
            path: path.clone(),
        }),
        None => self_ty.clone(),
    };

    if is_extension && !type_attrs.events.is_empty() {
        return Err(syn::Error::new_spanned(
            &self_ty,
            "events cannot be declared on an extension impl",
        ));
    }

    let module = match &type_attrs.module {
        Some(module) => module.clone(),
        None => std::env::var("CARGO_CRATE_NAME").unwrap_or_else(|_| "unknown".to_string()),
    };

    let mut thunks: Vec<TokenStream2> = Vec::new();
    let mut entries: Vec<TokenStream2> = Vec::new();
    let mut member_names: HashSet<String> = HashSet::new();

    for impl_item in &mut item.items {
        let syn::ImplItem::Fn(method) = impl_item else {
            continue;
        };
        let Some(position) = method
            .attrs
            .iter()
            .position(|attr| attr.path().is_ident("expose"))
        else {
            continue;
        };
        let attr = method.attrs.remove(position);
        let member_attrs = MemberAttrs::from_attribute(&attr)?;
        let name = method.sig.ident.clone();
        member_names.insert(name.to_string());

        if !matches!(method.vis, syn::Visibility::Public(_)) {
            let name_lit = name.to_string();
            entries.push(quote! { .skipped(#name_lit, "not public") });
            continue;
        }

        if member_attrs.custom {
            entries.push(custom_entry(
                &name,
                &member_attrs,
                &type_attrs,
                &self_ty,
                &target_ty,
            ));
            continue;
        }

        let parsed = parse_method(method, member_attrs, is_extension)?;
        thunks.push(gen_thunk(&parsed, &self_ty, &target_ty)?);
        entries.push(method_entry(&parsed, &type_attrs, &self_ty, &target_ty));
    }

    let mut event_fns: Vec<TokenStream2> = Vec::new();
    for event in &type_attrs.events {
        let event_name = event.name.to_string();
        if !member_names.insert(event_name.clone()) {
            return Err(syn::Error::new_spanned(
                &event.name,
                format!("duplicate exposed member name '{event_name}'"),
            ));
        }
        let (fns, entry) = gen_event(event, &type_attrs, &module)?;
        event_fns.push(fns);
        entries.push(entry);
    }

    let manifest = quote! {
        #[doc(hidden)]
        pub fn __exposed_bindings() -> ::nodegraph_registry::TypeBindings {
            ::nodegraph_registry::TypeBindings::new(
                <Self as ::nodegraph_core::NodeType>::INFO,
            )
            #(#entries)*
        }
    };

    Ok(quote! {
        #item

        impl #self_ty {
            #(#thunks)*
            #(#event_fns)*
            #manifest
        }
    })
}

// ============================================================================
// Signature analysis
// ============================================================================

fn parse_method(
    method: &syn::ImplItemFn,
    attrs: MemberAttrs,
    is_extension: bool,
) -> syn::Result<ExposedMethod> {
    let sig = &method.sig;
    let ident = sig.ident.clone();

    let target = match sig.receiver() {
        Some(receiver) => {
            if is_extension {
                return Err(syn::Error::new_spanned(
                    receiver,
                    "extension methods take the extended type as their first parameter, not self",
                ));
            }
            if receiver.reference.is_none() {
                return Err(syn::Error::new_spanned(
                    receiver,
                    "exposed methods take &self, not self by value",
                ));
            }
            if receiver.mutability.is_some() {
                return Err(syn::Error::new_spanned(
                    receiver,
                    "exposed methods take &self; use interior mutability for state changes",
                ));
            }
            TargetKind::Instance
        }
        None if is_extension => TargetKind::Extension,
        None => TargetKind::Static,
    };

    let mut typed_args = sig.inputs.iter().filter_map(|arg| match arg {
        syn::FnArg::Typed(pat_type) => Some(pat_type),
        syn::FnArg::Receiver(_) => None,
    });

    if matches!(target, TargetKind::Extension) {
        let receiver = typed_args.next().ok_or_else(|| {
            syn::Error::new_spanned(
                sig,
                "extension methods take the extended type by reference as their first parameter",
            )
        })?;
        if !matches!(&*receiver.ty, syn::Type::Reference(r) if r.mutability.is_none()) {
            return Err(syn::Error::new_spanned(
                &receiver.ty,
                "the extension receiver must be a shared reference to the extended type",
            ));
        }
    }

    let mut params = Vec::new();
    for pat_type in typed_args {
        let name = match &*pat_type.pat {
            syn::Pat::Ident(pat) => pat.ident.to_string(),
            other => {
                return Err(syn::Error::new_spanned(
                    other,
                    "exposed parameters must be plain identifiers",
                ));
            }
        };
        let ty = parse_param_type(&pat_type.ty)?;
        params.push(Param { name, ty });
    }

    let ret = match &sig.output {
        syn::ReturnType::Default => None,
        syn::ReturnType::Type(_, ty) => Some(ValueTy::from_type(ty).ok_or_else(|| {
            syn::Error::new_spanned(
                ty,
                format!("unsupported return type; {SUPPORTED} (return objects as ObjRef)"),
            )
        })?),
    };

    let kind = if attrs.property {
        classify_property(&ident, &params, ret.is_some(), sig)?
    } else {
        BoundKind::Function
    };

    Ok(ExposedMethod {
        ident,
        attrs,
        target,
        kind,
        params,
        ret,
    })
}

fn parse_param_type(ty: &syn::Type) -> syn::Result<ParamTy> {
    match ty {
        syn::Type::Path(path) => match ValueTy::from_path(&path.path) {
            Some(value) => Ok(ParamTy::Value(value)),
            None => Err(syn::Error::new_spanned(
                ty,
                format!("unsupported parameter type; {SUPPORTED}, or &T for a typed object"),
            )),
        },
        syn::Type::Reference(reference) if reference.mutability.is_some() => {
            match ValueTy::from_type(&reference.elem) {
                Some(value) => Ok(ParamTy::Out(value, (*reference.elem).clone())),
                None => Err(syn::Error::new_spanned(
                    ty,
                    format!("unsupported out-parameter type; {SUPPORTED}"),
                )),
            }
        }
        syn::Type::Reference(reference) => match &*reference.elem {
            syn::Type::Path(path) => {
                if ValueTy::from_path(&path.path).is_some() {
                    Err(syn::Error::new_spanned(
                        ty,
                        "stack payload types are passed by value, not by reference",
                    ))
                } else {
                    Ok(ParamTy::TypedObject(path.path.clone()))
                }
            }
            _ => Err(syn::Error::new_spanned(
                ty,
                format!("unsupported parameter type; {SUPPORTED}"),
            )),
        },
        _ => Err(syn::Error::new_spanned(
            ty,
            format!("unsupported parameter type; {SUPPORTED}"),
        )),
    }
}

fn classify_property(
    ident: &syn::Ident,
    params: &[Param],
    has_return: bool,
    sig: &syn::Signature,
) -> syn::Result<BoundKind> {
    if ident.to_string().starts_with("set_") {
        let value_params = params
            .iter()
            .filter(|p| !matches!(p.ty, ParamTy::Out(..)))
            .count();
        if value_params != 1 || has_return {
            return Err(syn::Error::new_spanned(
                sig,
                "property setters take exactly one value and return nothing",
            ));
        }
        Ok(BoundKind::PropertySet)
    } else {
        if !params.is_empty() || !has_return {
            return Err(syn::Error::new_spanned(
                sig,
                "property getters take no parameters and return the value",
            ));
        }
        Ok(BoundKind::PropertyGet)
    }
}

// ============================================================================
// Thunk synthesis
// ============================================================================

fn gen_thunk(
    parsed: &ExposedMethod,
    self_ty: &syn::Type,
    target_ty: &syn::Type,
) -> syn::Result<TokenStream2> {
    let name = &parsed.ident;
    let thunk_ident = format_ident!("CALL_{}", name);
    let qualified = format!("{}::{}", quote!(#self_ty), name);

    let mut pops: Vec<TokenStream2> = Vec::new();
    let mut call_args: Vec<TokenStream2> = Vec::new();
    let mut out_pushes: Vec<TokenStream2> = Vec::new();

    for (index, param) in parsed.params.iter().enumerate() {
        let local = format_ident!("arg{}", index);
        match &param.ty {
            ParamTy::Value(value) => {
                let pop = value.pop_method();
                pops.push(quote! { let #local = stack.#pop()?; });
                call_args.push(quote!(#local));
            }
            ParamTy::TypedObject(path) => {
                let obj = format_ident!("arg{}_obj", index);
                pops.push(quote! {
                    let #obj = stack.pop_object()?;
                    let #local = #obj.expect_cast::<#path>()?;
                });
                call_args.push(quote!(#local));
            }
            ParamTy::Out(value, inner) => {
                let push = value.push_method();
                pops.push(quote! {
                    let mut #local: #inner = ::core::default::Default::default();
                });
                call_args.push(quote!(&mut #local));
                out_pushes.push(quote! { stack.#push(#local); });
            }
        }
    }

    // out-parameters land under the return value, declaration order top-down
    out_pushes.reverse();

    let call = match parsed.target {
        TargetKind::Static => quote! { <#self_ty>::#name(#(#call_args),*) },
        TargetKind::Instance => quote! { __this.#name(#(#call_args),*) },
        TargetKind::Extension => quote! { <#self_ty>::#name(__this, #(#call_args),*) },
    };

    let resolve_target = match parsed.target {
        TargetKind::Static => TokenStream2::new(),
        TargetKind::Instance | TargetKind::Extension => quote! {
            let __target = target
                .ok_or(::nodegraph_core::DispatchError::NullTarget(#qualified))?;
            let __this = __target.expect_cast::<#target_ty>()?;
        },
    };

    let invoke = match parsed.ret {
        Some(value) => {
            let push = value.push_method();
            quote! {
                let __ret = #call;
                #(#out_pushes)*
                stack.#push(__ret);
            }
        }
        None => quote! {
            #call;
            #(#out_pushes)*
        },
    };

    let target_pat = if matches!(parsed.target, TargetKind::Static) {
        quote!(_target)
    } else {
        quote!(target)
    };

    Ok(quote! {
        #[doc(hidden)]
        #[allow(non_snake_case)]
        pub fn #thunk_ident(
            #target_pat: ::core::option::Option<&::nodegraph_core::ObjRef>,
            stack: &mut ::nodegraph_core::ValueStack,
        ) -> ::core::result::Result<(), ::nodegraph_core::DispatchError> {
            #(#pops)*
            #resolve_target
            #invoke
            ::core::result::Result::Ok(())
        }
    })
}

// ============================================================================
// Manifest entries
// ============================================================================

fn flags_expr(hide_in_ui: bool, force_flow_node: bool) -> TokenStream2 {
    let mut expr = quote!(::nodegraph_core::ExposeFlags::empty());
    if hide_in_ui {
        expr = quote!(#expr.union(::nodegraph_core::ExposeFlags::HIDE_IN_UI));
    }
    if force_flow_node {
        expr = quote!(#expr.union(::nodegraph_core::ExposeFlags::FORCE_FLOW_NODE));
    }
    expr
}

fn conceptual_expr(
    member: Option<Conceptual>,
    type_level: Option<Conceptual>,
    force_flow_node: bool,
    has_return_values: bool,
) -> TokenStream2 {
    match member.or(type_level) {
        Some(Conceptual::Getter) => quote!(::nodegraph_core::ConceptualType::Getter),
        Some(Conceptual::Function) => quote!(::nodegraph_core::ConceptualType::Function),
        None if force_flow_node => quote!(::nodegraph_core::ConceptualType::Function),
        None if has_return_values => quote!(::nodegraph_core::ConceptualType::Getter),
        None => quote!(::nodegraph_core::ConceptualType::Function),
    }
}

fn category_expr(member: Option<&String>, type_level: Option<&String>) -> TokenStream2 {
    match member.or(type_level) {
        Some(category) => quote!(::core::option::Option::Some(#category)),
        None => quote!(::core::option::Option::None),
    }
}

fn common_tokens(
    name: &str,
    target_ty: &syn::Type,
    is_static: bool,
    flags: TokenStream2,
    conceptual: TokenStream2,
    category: TokenStream2,
    description: &str,
) -> TokenStream2 {
    quote! {
        ::nodegraph_core::BindingCommon {
            name: #name,
            target_type: <#target_ty as ::nodegraph_core::NodeType>::INFO,
            declaring_type: <Self as ::nodegraph_core::NodeType>::INFO,
            is_static: #is_static,
            flags: #flags,
            conceptual_type: #conceptual,
            category: #category,
            description: #description,
        }
    }
}

fn method_entry(
    parsed: &ExposedMethod,
    type_attrs: &TypeAttrs,
    _self_ty: &syn::Type,
    target_ty: &syn::Type,
) -> TokenStream2 {
    let name = parsed.ident.to_string();
    let thunk_ident = format_ident!("CALL_{}", parsed.ident);
    let thunk_name = thunk_ident.to_string();
    let is_static = matches!(parsed.target, TargetKind::Static);
    let has_return_values = parsed.ret.is_some()
        || parsed.params.iter().any(|p| matches!(p.ty, ParamTy::Out(..)));

    let flags = flags_expr(
        parsed.attrs.hide_in_ui || type_attrs.hide_in_ui,
        parsed.attrs.force_flow_node,
    );
    let conceptual = conceptual_expr(
        parsed.attrs.conceptual,
        type_attrs.conceptual,
        parsed.attrs.force_flow_node,
        has_return_values,
    );
    let category = category_expr(parsed.attrs.category.as_ref(), type_attrs.category.as_ref());
    let description = parsed
        .attrs
        .description
        .clone()
        .or_else(|| type_attrs.description.clone())
        .unwrap_or_default();

    let kind = match parsed.kind {
        BoundKind::Function => quote!(::nodegraph_core::MethodKind::Function),
        BoundKind::PropertyGet => quote!(::nodegraph_core::MethodKind::PropertyGet),
        BoundKind::PropertySet => quote!(::nodegraph_core::MethodKind::PropertySet),
    };

    let params: Vec<TokenStream2> = parsed
        .params
        .iter()
        .map(|param| {
            let param_name = &param.name;
            match &param.ty {
                ParamTy::Value(value) => {
                    let kind = value.kind();
                    quote!(::nodegraph_core::ParamInfo::new(#param_name, #kind))
                }
                ParamTy::Out(value, _) => {
                    let kind = value.kind();
                    quote!(::nodegraph_core::ParamInfo::out(#param_name, #kind))
                }
                ParamTy::TypedObject(path) => quote! {
                    ::nodegraph_core::ParamInfo::object(
                        #param_name,
                        <#path as ::nodegraph_core::NodeType>::INFO.hash,
                    )
                },
            }
        })
        .collect();

    let common = common_tokens(
        &name,
        target_ty,
        is_static,
        flags,
        conceptual,
        category,
        &description,
    );

    quote! {
        .binding(::nodegraph_core::Binding::Method(::nodegraph_core::MethodBinding {
            common: #common,
            kind: #kind,
            params: ::std::vec![#(#params),*],
            has_return_values: #has_return_values,
            thunk: Self::#thunk_ident,
            thunk_name: #thunk_name,
        }))
    }
}

fn custom_entry(
    name: &syn::Ident,
    attrs: &MemberAttrs,
    type_attrs: &TypeAttrs,
    _self_ty: &syn::Type,
    target_ty: &syn::Type,
) -> TokenStream2 {
    let name_str = name.to_string();
    let flags = flags_expr(attrs.hide_in_ui || type_attrs.hide_in_ui, attrs.force_flow_node);
    // a custom thunk's signature is opaque, so without an override the
    // conceptual type stays undefined instead of taking a structural default
    let conceptual = match attrs.conceptual.or(type_attrs.conceptual) {
        Some(Conceptual::Getter) => quote!(::nodegraph_core::ConceptualType::Getter),
        Some(Conceptual::Function) => quote!(::nodegraph_core::ConceptualType::Function),
        None => quote!(::nodegraph_core::ConceptualType::Undefined),
    };
    let category = category_expr(attrs.category.as_ref(), type_attrs.category.as_ref());
    let description = attrs
        .description
        .clone()
        .or_else(|| type_attrs.description.clone())
        .unwrap_or_default();
    let common = common_tokens(
        &name_str,
        target_ty,
        true,
        flags,
        conceptual,
        category,
        &description,
    );

    quote! {
        .binding(::nodegraph_core::Binding::Custom(
            ::nodegraph_core::CustomMethodBinding {
                common: #common,
                thunk: Self::#name,
                thunk_name: #name_str,
            },
        ))
    }
}

// ============================================================================
// Events
// ============================================================================

fn gen_event(
    event: &EventDecl,
    type_attrs: &TypeAttrs,
    module: &str,
) -> syn::Result<(TokenStream2, TokenStream2)> {
    let name = &event.name;
    let name_str = name.to_string();

    let mut kinds = Vec::new();
    for ty in &event.args {
        let value = ValueTy::from_type(ty).ok_or_else(|| {
            syn::Error::new_spanned(ty, format!("unsupported event argument type; {SUPPORTED}"))
        })?;
        kinds.push(value);
    }

    let raw_id = event_id::allocate(module).ok_or_else(|| {
        syn::Error::new_spanned(
            name,
            format!(
                "module '{module}' declares more than {} events",
                event_id::MAX_EVENTS_PER_MODULE
            ),
        )
    })?;

    let get_ident = format_ident!("GET_EVENTID_{}", name);
    let handle_ident = format_ident!("HANDLE_{}", name);
    let subscribe_ident = format_ident!("SUBSCRIBE_{}", name);
    let unsubscribe_ident = format_ident!("UNSUBSCRIBE_{}", name);
    let handler_name = handle_ident.to_string();
    let arg_tys = &event.args;

    let fns = quote! {
        #[doc(hidden)]
        #[allow(non_snake_case)]
        pub fn #get_ident() -> ::nodegraph_core::EventId {
            ::nodegraph_core::EventId::from_raw(#raw_id)
        }

        #[doc(hidden)]
        #[allow(non_snake_case)]
        pub fn #handle_ident(
            sender: &::nodegraph_core::ObjRef,
            args: &( #(#arg_tys,)* ),
        ) {
            ::nodegraph_core::raise_to_hook(sender, Self::#get_ident(), args);
        }

        #[doc(hidden)]
        #[allow(non_snake_case)]
        pub fn #subscribe_ident(
            target: &::nodegraph_core::ObjRef,
        ) -> ::core::result::Result<
            ::nodegraph_core::HandlerToken,
            ::nodegraph_core::DispatchError,
        > {
            let __this = target.expect_cast::<Self>()?;
            ::core::result::Result::Ok(__this.#name.add(Self::#handle_ident))
        }

        #[doc(hidden)]
        #[allow(non_snake_case)]
        pub fn #unsubscribe_ident(
            target: &::nodegraph_core::ObjRef,
            token: ::nodegraph_core::HandlerToken,
        ) -> ::core::result::Result<(), ::nodegraph_core::DispatchError> {
            let __this = target.expect_cast::<Self>()?;
            __this.#name.remove(token);
            ::core::result::Result::Ok(())
        }
    };

    let flags = flags_expr(type_attrs.hide_in_ui, false);
    let conceptual = match type_attrs.conceptual {
        Some(Conceptual::Getter) => quote!(::nodegraph_core::ConceptualType::Getter),
        Some(Conceptual::Function) => quote!(::nodegraph_core::ConceptualType::Function),
        None => quote!(::nodegraph_core::ConceptualType::Undefined),
    };
    let category = category_expr(None, type_attrs.category.as_ref());

    let params: Vec<TokenStream2> = kinds
        .iter()
        .enumerate()
        .map(|(index, value)| {
            let param_name = format!("arg{index}");
            let kind = value.kind();
            quote!(::nodegraph_core::ParamInfo::new(#param_name, #kind))
        })
        .collect();

    let entry = quote! {
        .binding(::nodegraph_core::Binding::Event(::nodegraph_core::EventBinding {
            common: ::nodegraph_core::BindingCommon {
                name: #name_str,
                target_type: <Self as ::nodegraph_core::NodeType>::INFO,
                declaring_type: <Self as ::nodegraph_core::NodeType>::INFO,
                is_static: false,
                flags: #flags,
                conceptual_type: #conceptual,
                category: #category,
                description: "",
            },
            event_id: Self::#get_ident(),
            params: ::std::vec![#(#params),*],
            handler_name: #handler_name,
            subscribe: Self::#subscribe_ident,
            unsubscribe: Self::#unsubscribe_ident,
        }))
    };

    Ok((fns, entry))
}
