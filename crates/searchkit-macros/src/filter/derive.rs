//! Implementation of the `#[derive(Filter)]` macro.
//!
//! Generates `searchkit::Fields` (positional field access) and
//! `searchkit::Filter` (the shape descriptor) for a struct with named fields.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{
    ext::IdentExt, spanned::Spanned, Data, DeriveInput, Error, Fields, GenericArgument,
    PathArguments, Result, Type,
};

use super::attrs::{parse_search_attrs, FieldRole};

/// Main implementation of the Filter derive macro.
pub fn filter_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "Filter can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Filter can only be derived for structs",
            ))
        }
    };

    let mut field_defs: Vec<TokenStream> = Vec::new();
    let mut field_arms: Vec<TokenStream> = Vec::new();

    for (index, field) in fields.iter().enumerate() {
        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;
        let name = ident.unraw().to_string();
        let attr = parse_search_attrs(&field.attrs)?;
        let annotation = match attr.text() {
            Some(text) => quote! { ::core::option::Option::Some(#text) },
            None => quote! { ::core::option::Option::None },
        };

        match attr.role() {
            FieldRole::Ignore => {
                field_defs.push(quote! {
                    ::searchkit::FieldDef::ignored(#name)
                });
                field_arms.push(quote! {
                    #index => ::searchkit::Field::Opaque,
                });
            }
            FieldRole::Dive => {
                let (record_ty, optional) = match option_inner(&field.ty) {
                    Some(inner) => (inner, true),
                    None => (&field.ty, false),
                };
                field_defs.push(quote! {
                    ::searchkit::FieldDef::record(
                        #name,
                        #annotation,
                        <#record_ty as ::searchkit::Filter>::shape,
                    )
                });
                let access = if optional {
                    quote! {
                        self.#ident
                            .as_ref()
                            .map(|record| record as &dyn ::searchkit::Fields)
                    }
                } else {
                    quote! {
                        ::core::option::Option::Some(&self.#ident as &dyn ::searchkit::Fields)
                    }
                };
                field_arms.push(quote! {
                    #index => ::searchkit::Field::Record(#access),
                });
            }
            FieldRole::Leaf => {
                field_defs.push(quote! {
                    ::searchkit::FieldDef::leaf(#name, #annotation)
                });
                field_arms.push(quote! {
                    #index => ::searchkit::Field::Value(
                        ::searchkit::FilterValue::filter_value(&self.#ident)
                    ),
                });
            }
        }
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics ::searchkit::Fields for #struct_name #ty_generics #where_clause {
            fn field(&self, index: usize) -> ::searchkit::Field<'_> {
                match index {
                    #(#field_arms)*
                    _ => ::searchkit::Field::Opaque,
                }
            }
        }

        impl #impl_generics ::searchkit::Filter for #struct_name #ty_generics #where_clause {
            fn shape() -> ::searchkit::Shape {
                ::searchkit::Shape::Record(::std::vec![#(#field_defs),*])
            }
        }
    };

    Ok(expanded)
}

/// Returns `T` for an `Option<T>` field type.
fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    match &segment.arguments {
        PathArguments::AngleBracketed(args) => match args.args.first() {
            Some(GenericArgument::Type(inner)) => Some(inner),
            _ => None,
        },
        _ => None,
    }
}
