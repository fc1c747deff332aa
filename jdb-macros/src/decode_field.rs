use convert_case::{Case, Casing};
use proc_macro2::{Ident, TokenStream};
use quote::{ToTokens, quote};
use syn::{Expr, ExprLit, Field, Lit, Meta, Token, Type, punctuated::Punctuated};

pub(crate) const ROLES: &[(&str, &str, bool)] = &[
    ("kind", "Kind", false),
    ("id", "Id", false),
    ("parent_kind", "ParentKind", false),
    ("parent_id", "ParentId", false),
    ("create_time", "CreateTime", false),
    ("update_time", "UpdateTime", false),
    ("unique_string_key", "UniqueStringKey", true),
    ("string_key", "StringKey", true),
    ("numeric_key", "NumericKey", true),
    ("time_key", "TimeKey", true),
];

pub(crate) struct FieldMetadata {
    pub(crate) ident: Ident,
    pub(crate) ty: Type,
    /// Key of the field in the serialized payload.
    pub(crate) name: String,
    /// Attribute name of the role, `None` for plain payload fields.
    pub(crate) role: Option<&'static str>,
    pub(crate) omit_empty: bool,
    pub(crate) skip_data: bool,
}

impl FieldMetadata {
    pub(crate) fn role_variant(&self) -> TokenStream {
        let Some((_, variant, _)) = ROLES.iter().find(|(name, ..)| Some(*name) == self.role) else {
            return quote!();
        };
        let variant = Ident::new(variant, proc_macro2::Span::call_site());
        quote!(::jdb::Role::#variant)
    }

    /// Kind, id and parent roles, stored as text.
    pub(crate) fn is_text(&self) -> bool {
        matches!(
            self.role,
            Some("kind" | "id" | "parent_kind" | "parent_id")
        )
    }

    pub(crate) fn is_key(&self) -> bool {
        ROLES
            .iter()
            .any(|(name, _, key)| *key && Some(*name) == self.role)
    }
}

/// Renames a snake case field the way `#[serde(rename_all = "...")]` does.
pub(crate) fn rename_all(name: &str, rule: &str) -> String {
    match rule {
        "lowercase" => name.to_lowercase(),
        "UPPERCASE" => name.to_uppercase(),
        "PascalCase" => name.to_case(Case::Pascal),
        "camelCase" => name.to_case(Case::Camel),
        "snake_case" => name.to_case(Case::Snake),
        "SCREAMING_SNAKE_CASE" => name.to_case(Case::Constant),
        "kebab-case" => name.to_case(Case::Kebab),
        "SCREAMING-KEBAB-CASE" => name.to_case(Case::Cobol),
        _ => panic!(
            "Unknown serde rename_all rule `{rule}`, jdb cannot compute the payload keys"
        ),
    }
}

/// Looks for `key = "value"` inside the `#[serde(...)]` attributes.
pub(crate) fn serde_string(attrs: &[syn::Attribute], key: &str) -> Option<String> {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("serde"))
        .filter_map(|attr| {
            attr.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)
                .ok()
        })
        .flatten()
        .find_map(|meta| match meta {
            Meta::NameValue(v) if v.path.is_ident(key) => match v.value {
                Expr::Lit(ExprLit {
                    lit: Lit::Str(v), ..
                }) => Some(v.value()),
                _ => None,
            },
            _ => None,
        })
}

pub(crate) fn decode_field(field: &Field, rename_rule: Option<&str>) -> FieldMetadata {
    let ident = field
        .ident
        .clone()
        .expect("Document fields are expected to have a name");
    let ident_name = ident.to_string().trim_start_matches("r#").to_string();
    let name = serde_string(&field.attrs, "rename").unwrap_or_else(|| match rename_rule {
        Some(rule) => rename_all(&ident_name, rule),
        None => ident_name.clone(),
    });
    let mut metadata = FieldMetadata {
        ident,
        ty: field.ty.clone(),
        name,
        role: None,
        omit_empty: false,
        skip_data: false,
    };
    for attr in &field.attrs {
        let meta = &attr.meta;
        if !meta.path().is_ident("jdb") {
            continue;
        }
        let Ok(list) = meta.require_list() else {
            panic!("Error while parsing `jdb`, use it like: `#[jdb(string_key, omit_empty)]`");
        };
        let parsed = list.parse_nested_meta(|arg| {
            let Err(..) = arg.value() else {
                // value() is Err for Meta::Path
                panic!(
                    "Error while parsing `{}`, jdb attributes take no value: `#[jdb(id)]`",
                    arg.path.to_token_stream()
                );
            };
            if arg.path.is_ident("omit_empty") {
                metadata.omit_empty = true;
            } else if arg.path.is_ident("skip_data") {
                metadata.skip_data = true;
            } else if let Some((role, ..)) = ROLES.iter().find(|(name, ..)| arg.path.is_ident(name))
            {
                if let Some(previous) = metadata.role {
                    panic!(
                        "Field `{}` cannot be both `{previous}` and `{role}`",
                        metadata.ident
                    );
                }
                metadata.role = Some(*role);
            } else {
                panic!(
                    "Unknown attribute `{}` inside jdb macro",
                    arg.path.to_token_stream()
                );
            }
            Ok(())
        });
        if let Err(error) = parsed {
            panic!(
                "Error while parsing `jdb` on field `{}`: {error}, use it like: `#[jdb(string_key, omit_empty)]`",
                metadata.ident
            );
        }
    }
    if metadata.role.is_none() && (metadata.omit_empty || metadata.skip_data) {
        panic!(
            "Field `{}` uses `omit_empty` or `skip_data` without a role, use it like: `#[jdb(string_key, omit_empty)]`",
            metadata.ident
        );
    }
    if metadata.skip_data && !metadata.is_key() {
        panic!(
            "Field `{}` is metadata and never part of the payload, `skip_data` only applies to keys",
            metadata.ident
        );
    }
    metadata
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::{ItemStruct, parse_quote};

    #[test]
    fn field_roles() {
        let item: ItemStruct = parse_quote! {
            #[serde(rename_all = "camelCase")]
            struct Person {
                #[jdb(id)]
                person_id: String,
                #[jdb(string_key, omit_empty)]
                #[serde(default, rename = "mail")]
                email: String,
                first_name: String,
            }
        };
        let rule = serde_string(&item.attrs, "rename_all");
        let fields: Vec<_> = item
            .fields
            .iter()
            .map(|f| decode_field(f, rule.as_deref()))
            .collect();
        assert_eq!(fields[0].name, "personId");
        assert_eq!(fields[0].role, Some("id"));
        assert!(!fields[0].is_key());
        assert_eq!(fields[1].name, "mail");
        assert_eq!(fields[1].role, Some("string_key"));
        assert!(fields[1].omit_empty);
        assert!(fields[1].is_key());
        assert_eq!(fields[2].name, "firstName");
        assert_eq!(fields[2].role, None);
        assert!(!fields[1].is_text());
        assert!(fields[0].is_text());
    }

    #[test]
    #[should_panic(expected = "Error while parsing `jdb` on field `email`")]
    fn missing_comma() {
        let item: ItemStruct = parse_quote! {
            struct Person {
                #[jdb(string_key omit_empty)]
                email: String,
            }
        };
        decode_field(item.fields.iter().next().expect("One field"), None);
    }

    #[test]
    #[should_panic(expected = "Unknown attribute `primary_key` inside jdb macro")]
    fn unknown_attribute() {
        let item: ItemStruct = parse_quote! {
            struct Person {
                #[jdb(primary_key)]
                id: String,
            }
        };
        decode_field(item.fields.iter().next().expect("One field"), None);
    }
}
