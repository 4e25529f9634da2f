//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
extern crate proc_macro;
extern crate proc_macro2;
extern crate syn;
#[macro_use]
extern crate quote;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use syn::{parse_macro_input, Data, DeriveInput, Fields, Ident, LitStr};

/// Derive macro to specify a struct that can be written directly into, and read directly from, a
/// table item.
///
/// Each named field becomes one attribute of the item. The `dynamo` attribute can be used to
/// rename a field using the `column` key, either as a string or as a bare identifier:
/// `#[dynamo(column = "yearsOld")]` or `#[dynamo(column = yearsOld)]`.
///
/// Every field type must convert to and from a field value (numbers, strings, `bool`,
/// `Vec`, `Option`, maps, and other structs deriving `DynamoRow`). The struct must also
/// implement `Default` so it can be nested inside other rows.
///
/// See the documentation of [`PutRequest::put()`](../dynamodb_client/struct.PutRequest.html#method.put) for
/// example usage of this macro.
#[proc_macro_derive(DynamoRow, attributes(dynamo))]
pub fn to_from_map_value(input: TokenStream) -> TokenStream {
    // Parse input tokens into a syntax tree
    let input = parse_macro_input!(input as DeriveInput);

    // Build the trait implementation
    match impl_to_from_map_value(input) {
        Ok(ts) => ts.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

struct FieldNameAlias {
    fname: Ident,
    column: String,
}

fn column_alias(attrs: &[syn::Attribute]) -> syn::Result<Option<String>> {
    let mut alias: Option<String> = None;
    for a in attrs {
        if !a.path().is_ident("dynamo") {
            continue;
        }
        a.parse_nested_meta(|meta| {
            if meta.path.is_ident("column") {
                let value = meta.value()?;
                if value.peek(LitStr) {
                    alias = Some(value.parse::<LitStr>()?.value());
                } else {
                    alias = Some(value.parse::<Ident>()?.to_string());
                }
                Ok(())
            } else {
                Err(meta.error("unsupported dynamo attribute, expected `column`"))
            }
        })?;
    }
    Ok(alias)
}

fn impl_to_from_map_value(input: DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let name_string = name.to_string();

    // only structs with named fields map onto items
    let fields = match &input.data {
        Data::Struct(d) => match &d.fields {
            Fields::Named(n) => &n.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "DynamoRow requires a struct with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "DynamoRow only supports Struct datatypes",
            ))
        }
    };

    let mut fnames: Vec<FieldNameAlias> = Vec::new();
    for field in fields {
        let fname = match &field.ident {
            Some(id) => id.clone(),
            None => return Err(syn::Error::new_spanned(field, "Field in DynamoRow is missing ident")),
        };
        let column = column_alias(&field.attrs)?.unwrap_or_else(|| fname.to_string());
        fnames.push(FieldNameAlias { fname, column });
    }

    let mut tbody = TokenStream2::default();
    let mut fbody = TokenStream2::default();
    for f in fnames {
        let fname = f.fname;
        let column = f.column;
        tbody.extend(quote! {
            m.put(#column, &self.#fname);
        });
        fbody.extend(quote! {
            self.#fname = ::dynamodb_client::types::DynamoColumnFromMapValue::from_map(&self.#fname, #column, value)?;
        });
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::dynamodb_client::types::DynamoRow for #name #ty_generics #where_clause {
            fn to_map_value(&self) -> ::std::result::Result<::dynamodb_client::types::MapValue, ::dynamodb_client::DynamoError> {
                let mut m = ::dynamodb_client::types::MapValue::new();
                #tbody
                Ok(m)
            }

            fn from_map_value(&mut self, value: &::dynamodb_client::types::MapValue) -> ::std::result::Result<(), ::dynamodb_client::DynamoError> {
                #fbody
                Ok(())
            }
        }

        impl #impl_generics ::dynamodb_client::types::DynamoColumnToFieldValue for #name #ty_generics #where_clause {
            fn to_field_value(&self) -> ::dynamodb_client::types::FieldValue {
                match ::dynamodb_client::types::DynamoRow::to_map_value(self) {
                    Ok(mv) => ::dynamodb_client::types::FieldValue::Map(mv),
                    Err(_) => ::dynamodb_client::types::FieldValue::Null,
                }
            }
        }

        impl #impl_generics ::dynamodb_client::types::DynamoColumnFromFieldValue for #name #ty_generics #where_clause {
            fn from_field(fv: &::dynamodb_client::types::FieldValue) -> ::std::result::Result<Self, ::dynamodb_client::DynamoError> {
                if let ::dynamodb_client::types::FieldValue::Map(v) = fv {
                    let mut s: Self = ::std::default::Default::default();
                    ::dynamodb_client::types::DynamoRow::from_map_value(&mut s, v)?;
                    return Ok(s);
                }
                Err(::dynamodb_client::DynamoError::new(
                    ::dynamodb_client::DynamoErrorCode::Deserialization,
                    &format!("error converting attribute into {}: expected Map, actual: {:?}", #name_string, fv)))
            }
        }
    })
}
