use proc_macro::TokenStream;
use quote::quote;
use syn::{spanned::Spanned, Data, DeriveInput, Fields, LitStr};

pub fn derive_account_record(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let prefix = match extract_prefix(&input) {
        Ok(prefix) => prefix,
        Err(err) => return err.to_compile_error().into(),
    };

    let owner_field = match extract_owner_field(&input) {
        Ok(field) => field,
        Err(err) => return err.to_compile_error().into(),
    };

    let expanded = quote! {
        impl hive_reviews::AccountRecord for #name {
            const PREFIX: &'static str = #prefix;

            fn owner(&self) -> &hive_reviews::UserId {
                &self.#owner_field
            }
        }
    };

    TokenStream::from(expanded)
}

fn extract_prefix(input: &DeriveInput) -> syn::Result<String> {
    for attr in &input.attrs {
        if !attr.path().is_ident("record") {
            continue;
        }

        let mut prefix = None;
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("prefix") {
                let value: LitStr = meta.value()?.parse()?;
                if value.value().is_empty() {
                    return Err(meta.error("record prefix must not be empty"));
                }
                prefix = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unsupported struct-level record attribute"))
            }
        })?;

        if let Some(p) = prefix {
            return Ok(p);
        }
    }

    Ok(format!("user{}", input.ident))
}

fn extract_owner_field(input: &DeriveInput) -> syn::Result<syn::Ident> {
    let fields = match &input.data {
        Data::Struct(data_struct) => match &data_struct.fields {
            Fields::Named(fields) => fields,
            _ => {
                return Err(syn::Error::new(
                    input.span(),
                    "AccountRecord derive requires a struct with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new(
                input.span(),
                "AccountRecord derive only supports structs",
            ))
        }
    };

    for field in &fields.named {
        for attr in &field.attrs {
            if !attr.path().is_ident("record") {
                continue;
            }
            let mut is_owner = false;
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("owner") {
                    is_owner = true;
                    Ok(())
                } else {
                    Err(meta.error("unsupported field-level record attribute"))
                }
            })?;
            if is_owner {
                if let Some(ident) = &field.ident {
                    return Ok(ident.clone());
                }
            }
        }
    }

    // Default: a field named "user_id"
    fields
        .named
        .iter()
        .filter_map(|field| field.ident.as_ref())
        .find(|ident| *ident == "user_id")
        .cloned()
        .ok_or_else(|| {
            syn::Error::new(
                input.ident.span(),
                "AccountRecord derive: no field marked with #[record(owner)] and no field named `user_id`",
            )
        })
}
