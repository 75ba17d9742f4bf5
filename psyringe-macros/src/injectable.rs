mod attr;

use proc_macro2::TokenStream;
use quote::{quote, quote_spanned};
use syn::{spanned::Spanned as _, Data, DeriveInput, Error, Fields, Index, LitStr, Member};

use crate::injectable::attr::parse_field_attrs;

pub(crate) fn expand(input: DeriveInput) -> syn::Result<TokenStream> {
    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        Data::Enum(data) => {
            return Err(Error::new_spanned(data.enum_token, "`Injectable` can only be derived for structs"));
        }
        Data::Union(data) => {
            return Err(Error::new_spanned(data.union_token, "`Injectable` can only be derived for structs"));
        }
    };

    let members = match fields {
        Fields::Named(named) => named
            .named
            .iter()
            .map(|field| {
                let ident = field.ident.clone().ok_or_else(|| Error::new_spanned(field, "expected a named field"))?;
                let name = LitStr::new(&ident.to_string(), ident.span());
                Ok((field, Member::Named(ident), name))
            })
            .collect::<syn::Result<Vec<_>>>()?,
        Fields::Unnamed(unnamed) => unnamed
            .unnamed
            .iter()
            .enumerate()
            .map(|(position, field)| {
                let index = Index {
                    index: u32::try_from(position).map_err(|_| Error::new_spanned(field, "too many fields"))?,
                    span: field.span(),
                };
                let name = LitStr::new(&position.to_string(), field.span());
                Ok((field, Member::Unnamed(index), name))
            })
            .collect::<syn::Result<Vec<_>>>()?,
        Fields::Unit => Vec::new(),
    };

    let mut field_quotes = Vec::with_capacity(members.len());
    for (field, member, name) in members {
        if parse_field_attrs(&field.attrs)?.skip.is_some() {
            continue;
        }
        field_quotes.push(quote_spanned! { field.span() =>
            ::psyringe::Field::new(#name, &mut self.#member)
        });
    }

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::psyringe::Injectable for #ident #ty_generics #where_clause {
            fn fields(&mut self) -> ::std::vec::Vec<::psyringe::Field<'_>> {
                ::std::vec![ #( #field_quotes ),* ]
            }
        }
    })
}
