use syn::{
    parse::{Parse, ParseStream},
    Attribute, Token,
};

use crate::attr_parsing::{combine_flag, parse_attrs, parse_flag_attribute, Combine};

pub(crate) mod kw {
    syn::custom_keyword!(skip);
}

#[derive(Default)]
pub(crate) struct FieldArgs {
    pub(super) skip: Option<kw::skip>,
}

impl Parse for FieldArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut skip = None;

        while !input.is_empty() {
            let lh = input.lookahead1();
            if lh.peek(kw::skip) {
                parse_flag_attribute(input, &mut skip)?;
            } else {
                return Err(lh.error());
            }

            let _ = input.parse::<Token![,]>();
        }

        Ok(Self { skip })
    }
}

impl Combine for FieldArgs {
    fn combine(mut self, other: Self) -> syn::Result<Self> {
        let Self { skip } = other;
        combine_flag(&mut self.skip, skip)?;
        Ok(self)
    }
}

pub(crate) fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldArgs> {
    match parse_attrs("inject", attrs) {
        Some(result) => result.map_err(|(err, attr)| syn::Error::new_spanned(attr, err)),
        None => Ok(FieldArgs::default()),
    }
}
