//! Derive macro for generic-factory
//!
//! `#[derive(Autowire)]` implements `generic_factory::Autowire` for a struct
//! with named fields, resolving each marked field from the container.
//!
//! # Example
//!
//! ```rust,ignore
//! use generic_factory::{Autowire, GenericFactory};
//! use std::sync::Arc;
//!
//! trait Clock: Send + Sync {
//!     fn now(&self) -> u64;
//! }
//!
//! struct Settings {
//!     region: String,
//! }
//!
//! #[derive(Autowire)]
//! struct Billing {
//!     #[inject]
//!     clock: Arc<dyn Clock>,
//!     #[inject(optional)]
//!     settings: Option<Arc<Settings>>,
//!     // Non-injected fields use Default
//!     invoices_sent: u64,
//! }
//!
//! let mut factory = GenericFactory::new();
//! // register a clock, then:
//! let billing = factory.create_instance::<Billing>().unwrap();
//! ```

use proc_macro::TokenStream;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Fields, Type, parse_macro_input};

/// Derive macro for field autowiring.
///
/// Generates an `Autowire` implementation that builds the struct from a
/// `Container`.
///
/// # Attributes
///
/// - `#[inject]` - Resolve the field from the container. The field type must
///   be `Arc<T>`; `T` may be a trait object.
/// - `#[inject(optional)]` - Resolve if registered, `None` otherwise. The
///   field type must be `Option<Arc<T>>`.
///
/// Fields without `#[inject]` use `Default::default()`.
///
/// Resolution errors for required fields are returned unchanged.
#[proc_macro_derive(Autowire, attributes(inject))]
pub fn derive_autowire(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let name = &input.ident;
    let generics = &input.generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    // Only support structs with named fields
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            Fields::Unit => {
                let expanded = quote! {
                    impl #impl_generics ::generic_factory::Autowire
                        for #name #ty_generics #where_clause
                    {
                        fn autowire(
                            _container: &::generic_factory::Container
                        ) -> ::generic_factory::Result<Self> {
                            ::std::result::Result::Ok(Self)
                        }
                    }
                };
                return TokenStream::from(expanded);
            }
            Fields::Unnamed(_) => {
                return syn::Error::new_spanned(
                    &input,
                    "Autowire can only be derived for structs with named fields or unit structs",
                )
                .to_compile_error()
                .into();
            }
        },
        _ => {
            return syn::Error::new_spanned(&input, "Autowire can only be derived for structs")
                .to_compile_error()
                .into();
        }
    };

    let mut field_inits: Vec<proc_macro2::TokenStream> = Vec::new();

    for field in fields.iter() {
        let Some(field_name) = field.ident.as_ref() else {
            continue;
        };
        let field_type = &field.ty;

        let inject = match find_inject_attr(&field.attrs) {
            Ok(inject) => inject,
            Err(err) => return err.to_compile_error().into(),
        };

        match inject {
            Some(InjectAttr::Required) => {
                let Some(inner_type) = extract_arc_inner_type(field_type) else {
                    return syn::Error::new_spanned(
                        field_type,
                        "Fields marked with #[inject] must have type Arc<T>",
                    )
                    .to_compile_error()
                    .into();
                };
                field_inits.push(quote! {
                    #field_name: container.resolve::<#inner_type>()?
                });
            }
            Some(InjectAttr::Optional) => {
                let Some(inner_type) = extract_option_arc_inner_type(field_type) else {
                    return syn::Error::new_spanned(
                        field_type,
                        "Fields marked with #[inject(optional)] must have type Option<Arc<T>>",
                    )
                    .to_compile_error()
                    .into();
                };
                field_inits.push(quote! {
                    #field_name: container.try_resolve::<#inner_type>()
                });
            }
            None => {
                field_inits.push(quote! {
                    #field_name: ::std::default::Default::default()
                });
            }
        }
    }

    let expanded = quote! {
        impl #impl_generics ::generic_factory::Autowire for #name #ty_generics #where_clause {
            fn autowire(
                container: &::generic_factory::Container
            ) -> ::generic_factory::Result<Self> {
                ::std::result::Result::Ok(Self {
                    #(#field_inits),*
                })
            }
        }
    };

    TokenStream::from(expanded)
}

enum InjectAttr {
    Required,
    Optional,
}

/// Find and parse the #[inject] attribute
///
/// `#[inject]` and `#[inject(optional)]` are the only accepted forms.
fn find_inject_attr(attrs: &[Attribute]) -> syn::Result<Option<InjectAttr>> {
    let Some(attr) = attrs.iter().find(|attr| attr.path().is_ident("inject")) else {
        return Ok(None);
    };

    if attr.meta.require_path_only().is_ok() {
        return Ok(Some(InjectAttr::Required));
    }

    match attr.parse_args::<syn::Ident>() {
        Ok(nested) if nested == "optional" => Ok(Some(InjectAttr::Optional)),
        _ => Err(syn::Error::new_spanned(attr, "unknown inject option")),
    }
}

/// Extract T from Arc<T>
fn extract_arc_inner_type(ty: &Type) -> Option<&Type> {
    if let Type::Path(type_path) = ty {
        let segment = type_path.path.segments.last()?;
        if segment.ident == "Arc" {
            if let syn::PathArguments::AngleBracketed(args) = &segment.arguments {
                if let Some(syn::GenericArgument::Type(inner)) = args.args.first() {
                    return Some(inner);
                }
            }
        }
    }
    None
}

/// Extract T from Option<Arc<T>>
fn extract_option_arc_inner_type(ty: &Type) -> Option<&Type> {
    if let Type::Path(type_path) = ty {
        let segment = type_path.path.segments.last()?;
        if segment.ident == "Option" {
            if let syn::PathArguments::AngleBracketed(args) = &segment.arguments {
                if let Some(syn::GenericArgument::Type(inner)) = args.args.first() {
                    return extract_arc_inner_type(inner);
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_arc_inner() {
        let ty: Type = syn::parse_quote!(Arc<dyn Clock + Send + Sync>);
        let inner = extract_arc_inner_type(&ty).unwrap();
        assert_eq!(quote!(#inner).to_string(), quote!(dyn Clock + Send + Sync).to_string());
    }

    #[test]
    fn test_extract_option_arc_inner() {
        let ty: Type = syn::parse_quote!(Option<std::sync::Arc<Settings>>);
        let inner = extract_option_arc_inner_type(&ty).unwrap();
        assert_eq!(quote!(#inner).to_string(), "Settings");

        let plain: Type = syn::parse_quote!(Arc<Settings>);
        assert!(extract_option_arc_inner_type(&plain).is_none());
    }

    #[test]
    fn test_inject_attr_forms() {
        let required: syn::Field = syn::parse_quote!(#[inject] a: Arc<A>);
        let optional: syn::Field = syn::parse_quote!(#[inject(optional)] b: Option<Arc<B>>);
        let plain: syn::Field = syn::parse_quote!(c: u64);

        assert!(matches!(
            find_inject_attr(&required.attrs),
            Ok(Some(InjectAttr::Required))
        ));
        assert!(matches!(
            find_inject_attr(&optional.attrs),
            Ok(Some(InjectAttr::Optional))
        ));
        assert!(matches!(find_inject_attr(&plain.attrs), Ok(None)));
    }

    #[test]
    fn test_unknown_inject_option_is_rejected() {
        let misspelled: syn::Field = syn::parse_quote!(#[inject(optinal)] b: Option<Arc<B>>);
        let list: syn::Field = syn::parse_quote!(#[inject(optional, lazy)] b: Option<Arc<B>>);
        let value: syn::Field = syn::parse_quote!(#[inject = "optional"] b: Option<Arc<B>>);

        for field in [misspelled, list, value] {
            let err = find_inject_attr(&field.attrs).err().unwrap();
            assert_eq!(err.to_string(), "unknown inject option");
        }
    }
}
