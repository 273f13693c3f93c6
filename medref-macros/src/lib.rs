//! Proc macros for medref content schemas.
//!
//! Provides `#[derive(Searchable)]`, which turns `#[search(...)]` field
//! attributes into the list of designated search fields a repository scans.
//!
//! # Example
//!
//! ```ignore
//! #[derive(Searchable)]
//! struct LabTest {
//!     #[search(weight = weights::IDENTIFIER)]
//!     id: String,
//!     /// Display name
//!     #[search(weight = weights::NAME)]
//!     name: String,
//!     #[search(weight = weights::LIST, rename = "abbrev")]
//!     abbreviations: Vec<String>,
//!     #[search(flatten)]
//!     interpretation: Interpretation,
//!     // Not searched
//!     unit: String,
//! }
//! ```

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, DeriveInput, Expr, Field, LitStr};

/// Derive macro for generating `Searchable` implementations.
///
/// # Attributes
///
/// - `#[search(weight = EXPR)]` - Designate the field, scored with `EXPR` (a `u32`)
/// - `#[search]` - Designate the field with the description weight
/// - `#[search(rename = "...")]` - Override the field name used by field-scoped search
/// - `#[search(flatten)]` - Splice in the designated fields of a nested `Searchable`
#[proc_macro_derive(Searchable, attributes(search))]
pub fn derive_searchable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_searchable(input)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}

/// How a single struct field takes part in search.
enum FieldSpec {
    Designated { name: String, weight: Option<Expr> },
    Flatten,
}

fn expand_searchable(input: DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        syn::Data::Struct(data) => match &data.fields {
            syn::Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Searchable derive only supports structs with named fields",
                ))
            }
        },
        _ => return Err(syn::Error::new_spanned(&input, "Searchable derive only supports structs")),
    };

    let mut field_tokens = Vec::new();

    for field in fields {
        let Some(spec) = parse_field_spec(field)? else {
            continue;
        };
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };

        match spec {
            FieldSpec::Designated { name, weight } => {
                let weight = match weight {
                    Some(expr) => quote! { #expr },
                    None => quote! { ::medref_core::search::weights::DESCRIPTION },
                };
                field_tokens.push(quote! {
                    fields.push(::medref_core::search::SearchField::new(
                        #name,
                        #weight,
                        ::medref_core::search::AsFieldValue::as_field_value(&self.#ident),
                    ));
                });
            }
            FieldSpec::Flatten => {
                field_tokens.push(quote! {
                    fields.extend(::medref_core::search::Searchable::search_fields(&self.#ident));
                });
            }
        }
    }

    Ok(quote! {
        impl #impl_generics ::medref_core::search::Searchable for #struct_name #ty_generics #where_clause {
            fn search_fields(&self) -> ::std::vec::Vec<::medref_core::search::SearchField<'_>> {
                let mut fields = ::std::vec::Vec::new();
                #(#field_tokens)*
                fields
            }
        }
    })
}

fn parse_field_spec(field: &Field) -> syn::Result<Option<FieldSpec>> {
    let mut spec = None;

    for attr in &field.attrs {
        if !attr.path().is_ident("search") {
            continue;
        }

        let mut name = field_name(field);
        let mut weight = None;
        let mut flatten = false;

        // Bare `#[search]` designates with defaults.
        if !matches!(attr.meta, syn::Meta::Path(_)) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("weight") {
                    weight = Some(meta.value()?.parse::<Expr>()?);
                    Ok(())
                } else if meta.path.is_ident("rename") {
                    name = meta.value()?.parse::<LitStr>()?.value();
                    Ok(())
                } else if meta.path.is_ident("flatten") {
                    flatten = true;
                    Ok(())
                } else {
                    Err(meta.error("expected `weight`, `rename`, or `flatten`"))
                }
            })?;
        }

        if flatten && weight.is_some() {
            return Err(syn::Error::new_spanned(
                attr,
                "`flatten` fields take their weights from the nested type",
            ));
        }

        spec = Some(if flatten {
            FieldSpec::Flatten
        } else {
            FieldSpec::Designated { name, weight }
        });
    }

    Ok(spec)
}

fn field_name(field: &Field) -> String {
    field
        .ident
        .as_ref()
        .map(|ident| ident.to_string().trim_start_matches("r#").to_string())
        .unwrap_or_default()
}
