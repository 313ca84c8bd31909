//! Expansion of `#[freg_error]`.
//!
//! Every variant has the shape `{ message | source, context: Option<Cow<'static, str>> }`.
//! The expansion adds `kind()`, `with_context()`, one `From` impl per source type
//! and a blanket `<Name>Ext::context` for any `Result` whose error converts into
//! the enum.

use super::derived_traits;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Attribute, Data, DeriveInput, Field, Fields, Ident, Type, Variant};

/// A `source` field whose type gets a `From` impl.
struct Source<'a> {
    field: &'a Ident,
    ty: &'a Type,
}

struct ErrorVariant<'a> {
    ident: &'a Ident,
    cfg: Vec<&'a Attribute>,
    /// `None` when the variant carries a message, or fields besides source and context.
    source: Option<Source<'a>>,
}

impl<'a> ErrorVariant<'a> {
    fn parse(variant: &'a Variant) -> syn::Result<Self> {
        let Fields::Named(fields) = &variant.fields else {
            return Err(syn::Error::new_spanned(
                variant,
                "freg_error variants need named fields: `{ message | source, context }`",
            ));
        };

        let context = fields.named.iter().find(|f| named(f, "context")).ok_or_else(|| {
            syn::Error::new_spanned(
                &variant.ident,
                "freg_error variants need a `context: Option<Cow<'static, str>>` field",
            )
        })?;
        if !is_context_type(&context.ty) {
            return Err(syn::Error::new_spanned(
                &context.ty,
                "`context` must be `Option<Cow<'static, str>>`",
            ));
        }

        let source = fields
            .named
            .iter()
            .find(|f| named(f, "source") || has_attr(f, "source") || has_attr(f, "from"))
            .filter(|_| fields.named.len() == 2)
            .and_then(|f| f.ident.as_ref().map(|field| Source { field, ty: &f.ty }));

        Ok(Self {
            ident: &variant.ident,
            cfg: variant.attrs.iter().filter(|a| a.path().is_ident("cfg")).collect(),
            source,
        })
    }
}

pub fn expand_derive(input: DeriveInput) -> TokenStream {
    expand(&input).unwrap_or_else(syn::Error::into_compile_error)
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let Data::Enum(data) = &input.data else {
        return Err(syn::Error::new_spanned(&input.ident, "freg_error only applies to enums"));
    };
    let variants =
        data.variants.iter().map(ErrorVariant::parse).collect::<syn::Result<Vec<_>>>()?;
    reject_shared_sources(&variants)?;

    let name = &input.ident;
    let ext = format_ident!("{name}Ext");

    let derived = derived_traits(&input.attrs);
    let missing: Vec<TokenStream> = [("Debug", quote!(Debug)), ("Error", quote!(::thiserror::Error))]
        .into_iter()
        .filter(|(trait_name, _)| !derived.contains(*trait_name))
        .map(|(_, path)| path)
        .collect();
    let derives = (!missing.is_empty()).then(|| quote! { #[derive(#(#missing),*)] });

    let kind_arms = variants.iter().map(|v| {
        let (ident, cfg) = (v.ident, &v.cfg);
        let kind = snake_case(&ident.to_string());
        quote! { #(#cfg)* Self::#ident { .. } => #kind, }
    });
    let context_arms = variants.iter().map(|v| {
        let (ident, cfg) = (v.ident, &v.cfg);
        quote! { #(#cfg)* Self::#ident { context: slot, .. } => *slot = Some(context.into()), }
    });
    let from_impls = variants.iter().filter_map(|v| {
        let Source { field, ty } = v.source.as_ref()?;
        let (ident, cfg) = (v.ident, &v.cfg);
        Some(quote! {
            #(#cfg)*
            #[automatically_derived]
            impl From<#ty> for #name {
                fn from(#field: #ty) -> Self {
                    Self::#ident { #field, context: None }
                }
            }
        })
    });

    Ok(quote! {
        #derives
        #input

        impl #name {
            /// `snake_case` variant name; the stable error code on external surfaces.
            #[must_use]
            pub const fn kind(&self) -> &'static str {
                match self {
                    #(#kind_arms)*
                }
            }

            /// Replaces the context note shown after the error title.
            #[must_use]
            pub fn with_context(mut self, context: impl Into<std::borrow::Cow<'static, str>>) -> Self {
                match &mut self {
                    #(#context_arms)*
                }
                self
            }
        }

        #(#from_impls)*

        /// Converts the error of a `Result` and attaches a context note.
        pub trait #ext<T> {
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> Result<T, #name>;
        }

        impl<T, E: Into<#name>> #ext<T> for Result<T, E> {
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> Result<T, #name> {
                self.map_err(|err| err.into().with_context(context))
            }
        }

        #[allow(dead_code)]
        fn format_context(context: &Option<std::borrow::Cow<'static, str>>) -> String {
            context.as_deref().map(|c| format!(" ({c})")).unwrap_or_default()
        }
    })
}

/// Two variants wrapping the same source type would need two `From` impls.
fn reject_shared_sources(variants: &[ErrorVariant<'_>]) -> syn::Result<()> {
    let mut seen = Vec::new();
    for source in variants.iter().filter_map(|v| v.source.as_ref()) {
        let ty = source.ty;
        let key = quote!(#ty).to_string();
        if seen.contains(&key) {
            return Err(syn::Error::new_spanned(
                ty,
                "another variant already wraps this source type",
            ));
        }
        seen.push(key);
    }
    Ok(())
}

fn named(field: &Field, name: &str) -> bool {
    field.ident.as_ref().is_some_and(|ident| ident == name)
}

fn has_attr(field: &Field, name: &str) -> bool {
    field.attrs.iter().any(|attr| attr.path().is_ident(name))
}

/// Accepts `Option<Cow<'static, str>>` with or without a `std::borrow::` prefix.
fn is_context_type(ty: &Type) -> bool {
    let rendered: String = quote!(#ty).to_string().split_whitespace().collect();
    matches!(
        rendered.as_str(),
        "Option<Cow<'staticstr>>"
            | "Option<Cow<'static,str>>"
            | "Option<std::borrow::Cow<'static,str>>"
            | "std::option::Option<std::borrow::Cow<'static,str>>"
    )
}

fn snake_case(ident: &str) -> String {
    ident.chars().enumerate().fold(String::new(), |mut out, (i, ch)| {
        if ch.is_ascii_uppercase() && i > 0 {
            out.push('_');
        }
        out.push(ch.to_ascii_lowercase());
        out
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_snake_case() {
        assert_eq!(snake_case("NotFound"), "not_found");
        assert_eq!(snake_case("PathTraversalAttempt"), "path_traversal_attempt");
        assert_eq!(snake_case("Io"), "io");
    }

    #[test]
    fn context_type_spellings() {
        let ok: Type = syn::parse_quote!(Option<Cow<'static, str>>);
        let qualified: Type = syn::parse_quote!(Option<std::borrow::Cow<'static, str>>);
        let wrong: Type = syn::parse_quote!(Option<String>);
        assert!(is_context_type(&ok));
        assert!(is_context_type(&qualified));
        assert!(!is_context_type(&wrong));
    }

    #[test]
    fn shared_source_types_are_rejected() {
        let input: DeriveInput = syn::parse_quote! {
            enum Twice {
                A { source: std::io::Error, context: Option<Cow<'static, str>> },
                B { source: std::io::Error, context: Option<Cow<'static, str>> },
            }
        };
        let err = expand(&input).unwrap_err();
        assert!(err.to_string().contains("already wraps"));
    }

    #[test]
    fn missing_context_is_rejected() {
        let input: DeriveInput = syn::parse_quote! {
            enum Bare {
                A { message: Cow<'static, str> },
            }
        };
        assert!(expand(&input).is_err());
    }

    #[test]
    fn message_variants_get_no_from_impl() {
        let input: DeriveInput = syn::parse_quote! {
            enum Mixed {
                Io { source: std::io::Error, context: Option<Cow<'static, str>> },
                Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
            }
        };
        let rendered = expand(&input).unwrap().to_string();
        assert_eq!(rendered.matches("impl From <").count(), 1);
        assert!(rendered.contains("\"internal\""));
    }
}
