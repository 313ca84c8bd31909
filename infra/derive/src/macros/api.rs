use super::derived_traits;
use fxhash::FxHashSet;
use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::parse::Parser;
use syn::{Attribute, Expr, ItemFn, ItemStruct, Lit, LitBool, LitStr, MetaNameValue, Token};

/// Options accepted by `#[api_model(...)]`.
struct ModelOptions {
    rename_all: LitStr,
    deny_unknown_fields: bool,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self { rename_all: LitStr::new("camelCase", Span::call_site()), deny_unknown_fields: true }
    }
}

/// Serde settings already present on the struct.
#[derive(Default)]
struct ExistingSerde {
    rename_all: Option<LitStr>,
    deny_unknown_fields: bool,
}

/// Expands the `#[api_model]` attribute macro.
pub fn expand_api_model(args: TokenStream, input: ItemStruct) -> TokenStream {
    let options = match parse_model_options(args) {
        Ok(options) => options,
        Err(err) => return err.to_compile_error(),
    };
    let existing = match existing_serde(&input.attrs) {
        Ok(existing) => existing,
        Err(err) => return err.to_compile_error(),
    };
    let derives = derived_traits(&input.attrs);

    let mut missing = Vec::new();
    if !derives.contains("Debug") {
        missing.push(quote! { Debug });
    }
    if !derives.contains("Serialize") {
        missing.push(quote! { ::serde::Serialize });
    }
    if !derives.contains("Deserialize") {
        missing.push(quote! { ::serde::Deserialize });
    }
    let derive_attr =
        if missing.is_empty() { quote! {} } else { quote! { #[derive(#(#missing),*)] } };

    let schema_attr = if derives.contains("ToSchema") {
        quote! {}
    } else {
        quote! { #[cfg_attr(feature = "server", derive(::utoipa::ToSchema))] }
    };

    let rename_attr = match &existing.rename_all {
        Some(current) if current.value() != options.rename_all.value() => {
            return syn::Error::new_spanned(
                current,
                "Conflicting serde rename_all; align it with api_model(rename_all = \"...\")",
            )
            .to_compile_error();
        },
        Some(_) => quote! {},
        None => {
            let rename_all = &options.rename_all;
            quote! { #[serde(rename_all = #rename_all)] }
        },
    };

    let deny_attr = match (existing.deny_unknown_fields, options.deny_unknown_fields) {
        (true, false) => {
            return syn::Error::new_spanned(
                &input.ident,
                "deny_unknown_fields is already set via serde; remove it before disabling",
            )
            .to_compile_error();
        },
        (false, true) => quote! { #[serde(deny_unknown_fields)] },
        _ => quote! {},
    };

    quote! {
        #derive_attr
        #schema_attr
        #rename_attr
        #deny_attr
        #input
    }
}

/// Expands the `#[api_handler]` attribute macro.
pub fn expand_api_handler(args: TokenStream, input: ItemFn) -> TokenStream {
    let ItemFn { attrs, vis, sig, block } = input;

    quote! {
        #(#attrs)*
        #[allow(clippy::unused_async)]
        #[cfg_attr(feature = "server", ::utoipa::path(#args))]
        #vis #sig #block
    }
}

fn parse_model_options(args: TokenStream) -> syn::Result<ModelOptions> {
    let pairs =
        syn::punctuated::Punctuated::<MetaNameValue, Token![,]>::parse_terminated.parse2(args)?;

    let mut options = ModelOptions::default();
    let mut seen = FxHashSet::default();

    for pair in pairs {
        let Some(key) = pair.path.get_ident().map(ToString::to_string) else {
            return Err(syn::Error::new_spanned(&pair.path, "Expected a plain identifier"));
        };
        if !seen.insert(key.clone()) {
            return Err(syn::Error::new_spanned(&pair, "Duplicate argument"));
        }

        match key.as_str() {
            "rename_all" => options.rename_all = literal::<LitStr>(&pair.value, "rename_all")?,
            "deny_unknown_fields" => {
                options.deny_unknown_fields =
                    literal::<LitBool>(&pair.value, "deny_unknown_fields")?.value;
            },
            _ => {
                return Err(syn::Error::new_spanned(
                    &pair.path,
                    "Unsupported argument; expected rename_all or deny_unknown_fields",
                ));
            },
        }
    }

    Ok(options)
}

fn literal<L: syn::parse::Parse>(value: &Expr, label: &str) -> syn::Result<L> {
    let Expr::Lit(expr_lit) = value else {
        return Err(syn::Error::new_spanned(value, format!("{label} expects a literal")));
    };
    let tokens = match &expr_lit.lit {
        lit @ (Lit::Str(_) | Lit::Bool(_)) => quote! { #lit },
        other => {
            return Err(syn::Error::new_spanned(other, format!("{label} has an invalid literal")));
        },
    };
    syn::parse2(tokens)
        .map_err(|_| syn::Error::new_spanned(value, format!("{label} has the wrong literal type")))
}

fn existing_serde(attrs: &[Attribute]) -> syn::Result<ExistingSerde> {
    let mut existing = ExistingSerde::default();

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                existing.rename_all = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("deny_unknown_fields") {
                existing.deny_unknown_fields = true;
            } else if meta.input.peek(Token![=]) {
                // Skip values of serde options this macro does not manage.
                let _: Expr = meta.value()?.parse()?;
            }
            Ok(())
        })?;
    }

    Ok(existing)
}
