mod decode_field;

use decode_field::{FieldMetadata, decode_field, serde_string};
use proc_macro::TokenStream;
use quote::{ToTokens, quote};
use std::collections::HashSet;
use syn::{ItemStruct, parse_macro_input};

/// Struct level `#[jdb(computed_keys)]`.
fn computed_keys(item: &ItemStruct) -> bool {
    let mut computed = false;
    for attr in &item.attrs {
        let meta = &attr.meta;
        if !meta.path().is_ident("jdb") {
            continue;
        }
        let Ok(list) = meta.require_list() else {
            panic!("Error while parsing `jdb`, use it like: `#[jdb(computed_keys)]`");
        };
        let parsed = list.parse_nested_meta(|arg| {
            if arg.path.is_ident("computed_keys") {
                computed = true;
            } else {
                panic!(
                    "Unknown attribute `{}` on a document struct, use it like: `#[jdb(computed_keys)]`",
                    arg.path.to_token_stream()
                );
            }
            Ok(())
        });
        if let Err(error) = parsed {
            panic!("Error while parsing `jdb`: {error}, use it like: `#[jdb(computed_keys)]`");
        }
    }
    computed
}

/// Implements `jdb::Document` from the `#[jdb(...)]` field roles.
///
/// Role fields: `kind`, `id`, `parent_kind`, `parent_id`, `create_time`, `update_time` are
/// metadata and never part of the payload. `unique_string_key`, `string_key`, `numeric_key`,
/// `time_key` are keys, they stay in the payload unless `skip_data` is given and do not claim
/// the key when zero if `omit_empty` is given. `#[jdb(computed_keys)]` on the struct uses its
/// `jdb::ComputedKeys` implementation. Kind, id and parent fields must implement
/// `jdb::TextRole`.
#[proc_macro_derive(Document, attributes(jdb))]
pub fn derive_document(input: TokenStream) -> TokenStream {
    let item: ItemStruct = parse_macro_input!(input as ItemStruct);
    let name = &item.ident;
    let (impl_generics, ty_generics, where_clause) = item.generics.split_for_impl();
    let rename_rule = serde_string(&item.attrs, "rename_all");
    let fields: Vec<FieldMetadata> = item
        .fields
        .iter()
        .map(|f| decode_field(f, rename_rule.as_deref()))
        .filter(|f| f.role.is_some())
        .collect();
    let mut metadata = HashSet::new();
    for field in fields.iter().filter(|f| !f.is_key()) {
        if let Some(role) = field.role {
            if !metadata.insert(role) {
                panic!("Role `{role}` is declared on more than one field of `{name}`");
            }
        }
    }
    let text_types: Vec<_> = fields.iter().filter(|f| f.is_text()).map(|f| &f.ty).collect();
    let text_roles = if text_types.is_empty() {
        quote!()
    } else {
        quote! {
            fn text_role<T: ::jdb::TextRole>() {}
            #(text_role::<#text_types>();)*
        }
    };
    let count = fields.len();
    let roles = fields.iter().map(|f| {
        let key = &f.name;
        let role = f.role_variant();
        let omit_empty = f.omit_empty;
        let in_data = f.is_key() && !f.skip_data;
        quote! {
            ::jdb::FieldRole {
                name: #key,
                role: #role,
                omit_empty: #omit_empty,
                in_data: #in_data,
            }
        }
    });
    let values = fields.iter().map(|f| {
        let field = &f.ident;
        quote!(::jdb::AsValue::as_value(::std::clone::Clone::clone(&self.#field)))
    });
    let assignments = fields.iter().enumerate().map(|(i, f)| {
        let field = &f.ident;
        quote! {
            #i => {
                self.#field = ::jdb::AsValue::try_from_value(value)?;
                ::std::result::Result::Ok(())
            }
        }
    });
    let computed = if computed_keys(&item) {
        quote! {
            fn computed_keys(&self) -> ::jdb::KeySet {
                ::jdb::KeySet::from_computed(self)
            }
        }
    } else {
        quote!()
    };
    quote! {
        impl #impl_generics ::jdb::Document for #name #ty_generics #where_clause {
            fn roles() -> &'static [::jdb::FieldRole] {
                #text_roles
                static ROLES: [::jdb::FieldRole; #count] = [#(#roles),*];
                &ROLES
            }

            fn role_values(&self) -> ::std::vec::Vec<::jdb::Value> {
                ::std::vec![#(#values),*]
            }

            fn set_role(&mut self, index: usize, value: ::jdb::Value) -> ::jdb::Result<()> {
                match index {
                    #(#assignments)*
                    _ => ::std::result::Result::Err(::jdb::Error::msg(::std::format!(
                        "Document {} has no role field at index {} to assign {:?}",
                        ::std::stringify!(#name),
                        index,
                        value,
                    ))),
                }
            }

            #computed
        }
    }
    .into()
}
