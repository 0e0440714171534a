//! Derive macros for storefront stores
//!
//! # Available Macros
//!
//! - `#[derive(Action)]` - implements `storefront_core::action::Action` for an
//!   action enum, classifying variants as commands or events
//!
//! # Example
//!
//! ```ignore
//! use storefront_macros::Action;
//!
//! #[derive(Action, Clone, Debug)]
//! enum CartAction {
//!     #[command]
//!     AddProduct { product_id: ProductId },
//!
//!     #[event]
//!     CartLoaded { lines: Vec<CartLine> },
//! }
//!
//! // Generated via the Action trait:
//! assert_eq!(CartAction::AddProduct { product_id }.name(), "AddProduct");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, Variant};

/// Derive macro for action enums
///
/// Implements `storefront_core::action::Action`:
/// - `name()` - the variant name, for every variant
/// - `is_command()` - true for variants marked `#[command]`
/// - `is_event()` - true for variants marked `#[event]`
///
/// # Attributes
///
/// - `#[command]` - an intent sent by the UI
/// - `#[event]` - an outcome fed back by an effect
///
/// Produces a compile error when applied to a non-enum type or when a
/// variant carries both attributes.
#[proc_macro_derive(Action, attributes(command, event))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let Data::Enum(data_enum) = &input.data else {
        return syn::Error::new_spanned(
            input,
            "#[derive(Action)] can only be used on enums"
        )
        .to_compile_error()
        .into();
    };

    let mut name_arms = Vec::new();
    let mut command_arms = Vec::new();
    let mut event_arms = Vec::new();

    for variant in &data_enum.variants {
        let is_command = has_attribute(&variant.attrs, "command");
        let is_event = has_attribute(&variant.attrs, "event");

        if is_command && is_event {
            return syn::Error::new_spanned(
                variant,
                "Variant cannot be both #[command] and #[event]"
            )
            .to_compile_error()
            .into();
        }

        let pattern = variant_pattern(variant);
        let variant_name = variant.ident.to_string();
        name_arms.push(quote! { #pattern => #variant_name, });

        if is_command {
            command_arms.push(quote! { #pattern => true, });
        }
        if is_event {
            event_arms.push(quote! { #pattern => true, });
        }
    }

    let expanded = quote! {
        impl #impl_generics ::storefront_core::action::Action for #name #ty_generics #where_clause {
            fn name(&self) -> &'static str {
                match self {
                    #(#name_arms)*
                }
            }

            #[allow(unreachable_patterns)]
            fn is_command(&self) -> bool {
                match self {
                    #(#command_arms)*
                    _ => false,
                }
            }

            #[allow(unreachable_patterns)]
            fn is_event(&self) -> bool {
                match self {
                    #(#event_arms)*
                    _ => false,
                }
            }
        }
    };

    TokenStream::from(expanded)
}

/// Match pattern ignoring the variant's fields
fn variant_pattern(variant: &Variant) -> proc_macro2::TokenStream {
    let ident = &variant.ident;
    match &variant.fields {
        Fields::Named(_) => quote! { Self::#ident { .. } },
        Fields::Unnamed(_) => quote! { Self::#ident(..) },
        Fields::Unit => quote! { Self::#ident },
    }
}

/// Helper function to check if an attribute list contains a specific attribute
fn has_attribute(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| {
        attr.path().is_ident(name)
    })
}
