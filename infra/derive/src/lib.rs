#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by the registry workspace.
//!
//! * [`freg_error`] turns an enum into the workspace error shape.
//! * [`freg_slice`] wraps feature state into a cloneable slice handle.
//! * [`api_model`] / [`api_handler`] keep HTTP DTOs and handlers consistent.
//! * [`main`] boots the Tokio runtime with a named profile.
//!
//! Examples are `ignore`d because they need the consuming crates in scope.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, ItemStruct, parse_macro_input};

/// Attribute macro to bootstrap the Tokio runtime with a profile.
///
/// Transforms an `async fn main` returning a `Result` into a blocking `fn main`
/// that builds the runtime through `freg_runtime::build_runtime_with_config`.
///
/// # Arguments
///
/// * `high_performance` - Server preset.
/// * `memory_efficient` - CLI/edge preset.
/// * `default` - Worker threads auto-detected.
///
/// # Examples
///
/// ```rust,ignore
/// #[freg_runtime::main(memory_efficient)]
/// async fn main() -> anyhow::Result<()> {
///     Ok(())
/// }
/// ```
#[proc_macro_attribute]
pub fn main(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::runtime::expand_main(args.into(), input).into()
}

/// Attribute macro to define an API data model.
///
/// # Injected Behaviors
///
/// * **Derives**: `Debug`, `Serialize`, and `Deserialize` if missing.
/// * **`OpenAPI`**: `utoipa::ToSchema` when the consuming crate enables `server`.
/// * **Serde Policy**: `rename_all = "camelCase"` and `deny_unknown_fields` by default.
///
/// # Example
///
/// ```rust,ignore
/// #[freg_derive::api_model]
/// pub struct RegisterFacilityRequest {
///     pub name: String,
///     pub contact_phone: String,
/// }
/// ```
#[proc_macro_attribute]
pub fn api_model(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::api::expand_api_model(attr.into(), input).into()
}

/// Attribute macro to bridge Axum handlers with `OpenAPI` documentation.
///
/// Accepts standard `utoipa::path` arguments and forwards them when the
/// consuming crate enables its `server` feature.
///
/// # Example
///
/// ```rust,ignore
/// #[freg_derive::api_handler(get, path = "/facilities/count", tag = "Facilities")]
/// pub async fn count_handler(State(slice): State<Facilities>) -> Json<CountResponse> {
///     Json(CountResponse { count: slice.registry.facility_count().await? })
/// }
/// ```
#[proc_macro_attribute]
pub fn api_handler(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::api::expand_api_handler(args.into(), input).into()
}

/// Attribute macro for domain-specific error enums.
///
/// # Generated Items
///
/// * `#[derive(Debug, thiserror::Error)]` unless already present.
/// * `fn kind(&self) -> &'static str` returning the `snake_case` variant name,
///   used as the stable error code on external surfaces.
/// * `fn with_context(self, ...) -> Self` replacing the context note.
/// * `From<SourceError>` for variants holding exactly a source and a context.
/// * `<ErrorName>Ext` trait with `.context(...)` for any `Result<T, E>` whose
///   `E` converts into the enum.
///
/// # Requirements
///
/// Variants must use named fields and every variant carries
/// `context: Option<Cow<'static, str>>`. Two variants cannot wrap the same
/// source type.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[freg_derive::freg_error]
/// pub enum StoreError {
///     #[error("IO error{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal fault{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// let err = std::fs::read("missing").context("Reading record").unwrap_err();
/// assert_eq!(err.kind(), "io");
/// ```
#[proc_macro_attribute]
pub fn freg_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}

/// Attribute macro to define a feature slice handle.
///
/// The annotated struct becomes `<Name>Inner`; `<Name>` is generated as an
/// `Arc` wrapper that derefs to the inner state and implements
/// `freg_kernel::domain::registry::FeatureSlice`.
///
/// # Example
/// ```rust,ignore
/// #[freg_derive::freg_slice]
/// pub struct Facilities {
///     pub registry: FacilityRegistry,
/// }
///
/// let slice = Facilities::new(FacilitiesInner { registry });
/// ```
#[proc_macro_attribute]
pub fn freg_slice(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(item as ItemStruct);
    macros::slice::expand_slice(input).into()
}
