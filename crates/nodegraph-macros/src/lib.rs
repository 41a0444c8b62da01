//! Procedural macros generating nodegraph binding thunks and type identity.
//!
//! Two macros make up the exposure surface:
//!
//! - [`macro@exposed_api`] on an inherent impl block synthesizes `CALL_*`
//!   thunks for `#[expose]`-annotated methods, event accessors and handlers
//!   for declared events, and a `__exposed_bindings()` manifest constructor.
//! - [`macro@NodeType`] derives the type-identity traits
//!   (`NodeType`/`NodeObject`) with optional single inheritance.
//!
//! Everything that can go wrong at generation time (unsupported signature
//! shapes, duplicate members, event counter overflow) is a compile error;
//! nothing is deferred to runtime discovery.
//!
//! # Examples
//!
//! ```ignore
//! #[derive(NodeType)]
//! struct Counter {
//!     value: AtomicI32,
//!     on_changed: EventSource<(i32,)>,
//! }
//!
//! #[exposed_api(category = "Demo", events(on_changed(i32)))]
//! impl Counter {
//!     #[expose("Adds two numbers")]
//!     pub fn add(a: i32, b: i32) -> i32 {
//!         a + b
//!     }
//!
//!     #[expose(property)]
//!     pub fn value(&self) -> i32 {
//!         self.value.load(Ordering::SeqCst)
//!     }
//! }
//! ```

use proc_macro::TokenStream;
use syn::parse_macro_input;

mod attrs;
mod derive_node;
mod event_id;
mod exposed_api;

/// Expose an impl block's annotated members to the graph runtime.
#[proc_macro_attribute]
pub fn exposed_api(args: TokenStream, item: TokenStream) -> TokenStream {
    exposed_api::exposed_api_impl(args.into(), item.into())
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}

/// Derive graph type identity for a host struct.
#[proc_macro_derive(NodeType, attributes(node))]
pub fn derive_node_type(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as syn::DeriveInput);
    derive_node::derive_node_type_impl(input)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}
