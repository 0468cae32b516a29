//! Procedural macros for quill

use darling::{FromDeriveInput, FromField, FromVariant};
use proc_macro::TokenStream;
use proc_macro2::Ident;
use quote::{format_ident, quote};
use std::collections::BTreeMap;
use syn::{parse_macro_input, DeriveInput};

/// Container-level attributes for #[derive(Action)]
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(action), supports(enum_any))]
struct ActionOpts {
    ident: syn::Ident,
    data: darling::ast::Data<ActionVariant, ()>,

    /// Group variants into categories by their name prefix
    #[darling(default)]
    infer_categories: bool,
}

/// Variant-level attributes
#[derive(Debug, FromVariant)]
#[darling(attributes(action))]
struct ActionVariant {
    ident: syn::Ident,
    fields: darling::ast::Fields<()>,

    /// Explicit category override
    #[darling(default)]
    category: Option<String>,

    /// Exclude from category inference
    #[darling(default)]
    skip_category: bool,
}

// Verbs that end the subject part of an intent name. Nouns such as
// "Dialog", "Timeline" or "Form" must not appear here.
const INTENT_VERBS: &[&str] = &[
    "Set", "Receive", "Request", "Select", "Toggle", "Open", "Close", "Confirm", "Cancel",
    "Clear", "Dismiss", "Mark", "Add", "Remove", "Update", "Load", "Save", "Delete", "Create",
    "Focus", "Blur", "Next", "Prev", "Navigate", "Show", "Hide", "Enable", "Disable", "Start",
    "Reset", "Send", "Submit", "Choose", "Leave",
];

fn split_pascal_case(s: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    for ch in s.chars() {
        if ch.is_uppercase() && !current.is_empty() {
            parts.push(std::mem::take(&mut current));
        }
        current.push(ch);
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

fn to_snake_case(s: &str) -> String {
    split_pascal_case(s)
        .iter()
        .map(|part| part.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

fn to_pascal_case(s: &str) -> String {
    s.split('_')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            }
        })
        .collect()
}

/// Category of an intent name: the words before the first verb or `Did`
///
/// `PostTrashConfirm` and `PostTrashDidFail` give `post_trash`;
/// `HappychatTimelineReceive` gives `happychat_timeline`. Names that start
/// with a verb, or contain none, are uncategorized.
fn infer_category(name: &str) -> Option<String> {
    let parts = split_pascal_case(name);
    let first = parts.first()?;
    if first == "Did" || INTENT_VERBS.contains(&first.as_str()) {
        return None;
    }

    let subject_end = parts
        .iter()
        .skip(1)
        .position(|part| part == "Did" || INTENT_VERBS.contains(&part.as_str()))?
        + 1;

    Some(to_snake_case(&parts[..subject_end].concat()))
}

/// Derive macro for the Action trait
///
/// Generates `name()` returning the variant name.
///
/// With `#[action(infer_categories)]`, also generates:
/// - `{Name}Category` enum with every discovered category
/// - `category()` and `category_enum()`, plus the `ActionCategory` impl
/// - `is_{category}()` predicates
///
/// # Example
/// ```ignore
/// #[derive(Action, Clone, Debug)]
/// #[action(infer_categories)]
/// enum Intent {
///     PostTrashConfirm { site_id: u64, post_id: u64 },
///     PostTrashDidFail { site_id: u64, post_id: u64 },
///     #[action(category = "post_revisions")]
///     PostRevisionsDialogToggle,
///     Quit, // uncategorized
/// }
///
/// assert_eq!(Intent::Quit.name(), "Quit");
/// assert!(Intent::PostRevisionsDialogToggle.is_post_revisions());
/// ```
#[proc_macro_derive(Action, attributes(action))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let opts = match ActionOpts::from_derive_input(&input) {
        Ok(opts) => opts,
        Err(e) => return e.write_errors().into(),
    };

    let name = &opts.ident;

    let variants = match &opts.data {
        darling::ast::Data::Enum(variants) => variants,
        _ => {
            return syn::Error::new_spanned(&input, "Action can only be derived for enums")
                .to_compile_error()
                .into();
        }
    };

    let name_arms = variants.iter().map(|v| {
        let variant_name = &v.ident;
        let variant_str = variant_name.to_string();
        match &v.fields.style {
            darling::ast::Style::Unit => quote! { #name::#variant_name => #variant_str },
            darling::ast::Style::Tuple => quote! { #name::#variant_name(..) => #variant_str },
            darling::ast::Style::Struct => quote! { #name::#variant_name { .. } => #variant_str },
        }
    });

    let mut expanded = quote! {
        impl ::quill::Action for #name {
            fn name(&self) -> &'static str {
                match self {
                    #(#name_arms),*
                }
            }
        }
    };

    if opts.infer_categories {
        let mut categories: BTreeMap<String, Vec<&Ident>> = BTreeMap::new();
        let mut variant_categories: Vec<(&Ident, Option<String>)> = Vec::new();

        for v in variants.iter() {
            let category = if v.skip_category {
                None
            } else {
                v.category
                    .clone()
                    .or_else(|| infer_category(&v.ident.to_string()))
            };
            if let Some(category) = &category {
                categories.entry(category.clone()).or_default().push(&v.ident);
            }
            variant_categories.push((&v.ident, category));
        }

        let category_enum_name = format_ident!("{}Category", name);
        let category_names: Vec<&String> = categories.keys().collect();
        let category_variants: Vec<Ident> = category_names
            .iter()
            .map(|c| format_ident!("{}", to_pascal_case(c)))
            .collect();

        let category_arms = variant_categories.iter().map(|(variant, category)| {
            let value = match category {
                Some(c) => quote! { ::core::option::Option::Some(#c) },
                None => quote! { ::core::option::Option::None },
            };
            quote! { #name::#variant { .. } => #value }
        });

        let category_enum_arms = variant_categories.iter().map(|(variant, category)| {
            let cat_variant = match category {
                Some(c) => format_ident!("{}", to_pascal_case(c)),
                None => format_ident!("Uncategorized"),
            };
            quote! { #name::#variant { .. } => #category_enum_name::#cat_variant }
        });

        let predicates = categories.iter().map(|(category, members)| {
            let predicate = format_ident!("is_{}", category);
            let doc = format!("Whether this intent belongs to the `{}` category.", category);
            quote! {
                #[doc = #doc]
                pub fn #predicate(&self) -> bool {
                    matches!(self, #(#name::#members { .. })|*)
                }
            }
        });

        let category_enum_doc = format!("Intent categories for [`{}`].", name);

        expanded = quote! {
            #expanded

            #[doc = #category_enum_doc]
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
            pub enum #category_enum_name {
                #(#category_variants,)*
                /// Intents outside any category.
                Uncategorized,
            }

            impl #category_enum_name {
                pub fn all() -> &'static [Self] {
                    &[#(Self::#category_variants,)* Self::Uncategorized]
                }

                pub fn name(&self) -> &'static str {
                    match self {
                        #(Self::#category_variants => #category_names,)*
                        Self::Uncategorized => "uncategorized",
                    }
                }
            }

            impl #name {
                /// The intent's category, if any
                pub fn category(&self) -> ::core::option::Option<&'static str> {
                    match self {
                        #(#category_arms,)*
                    }
                }

                pub fn category_enum(&self) -> #category_enum_name {
                    match self {
                        #(#category_enum_arms,)*
                    }
                }

                #(#predicates)*
            }

            impl ::quill::ActionCategory for #name {
                type Category = #category_enum_name;

                fn category(&self) -> ::core::option::Option<&'static str> {
                    #name::category(self)
                }

                fn category_enum(&self) -> Self::Category {
                    #name::category_enum(self)
                }
            }
        };
    }

    TokenStream::from(expanded)
}

/// Derive macro for the BindingContext trait
///
/// Context names are the variant names in snake_case.
///
/// # Example
/// ```ignore
/// #[derive(BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Screen {
///     Editor,
///     RevisionsDialog,
/// }
///
/// assert_eq!(Screen::RevisionsDialog.name(), "revisions_dialog");
/// ```
#[proc_macro_derive(BindingContext)]
pub fn derive_binding_context(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let data = match &input.data {
        syn::Data::Enum(data) => data,
        _ => {
            return syn::Error::new_spanned(&input, "BindingContext can only be derived for enums")
                .to_compile_error()
                .into();
        }
    };

    if let Some(variant) = data
        .variants
        .iter()
        .find(|v| !matches!(v.fields, syn::Fields::Unit))
    {
        return syn::Error::new_spanned(
            variant,
            "BindingContext can only be derived for enums with unit variants",
        )
        .to_compile_error()
        .into();
    }

    let variant_names: Vec<&Ident> = data.variants.iter().map(|v| &v.ident).collect();
    let variant_strings: Vec<String> = variant_names
        .iter()
        .map(|v| to_snake_case(&v.to_string()))
        .collect();

    let expanded = quote! {
        impl ::quill::BindingContext for #name {
            fn name(&self) -> &'static str {
                match self {
                    #(#name::#variant_names => #variant_strings),*
                }
            }

            fn from_name(name: &str) -> ::core::option::Option<Self> {
                match name {
                    #(#variant_strings => ::core::option::Option::Some(#name::#variant_names),)*
                    _ => ::core::option::Option::None,
                }
            }

            fn all() -> &'static [Self] {
                static ALL: &[#name] = &[#(#name::#variant_names),*];
                ALL
            }
        }
    };

    TokenStream::from(expanded)
}

#[derive(Debug, FromDeriveInput)]
#[darling(attributes(flag), supports(struct_named))]
struct FeatureFlagsOpts {
    ident: syn::Ident,
    data: darling::ast::Data<(), FlagField>,
}

#[derive(Debug, FromField)]
#[darling(attributes(flag))]
struct FlagField {
    ident: Option<syn::Ident>,
    ty: syn::Type,

    /// Name used in configuration, defaults to the field name
    #[darling(default)]
    name: Option<String>,

    #[darling(default)]
    default: bool,
}

/// Derive macro for the FeatureFlags trait
///
/// Every field must be a `bool`. Also generates `Default` from the
/// per-field defaults.
///
/// # Example
/// ```ignore
/// #[derive(FeatureFlags)]
/// struct Features {
///     #[flag(name = "jetpack/happychat")]
///     jetpack_happychat: bool,
///
///     #[flag(default = true)]
///     oauth: bool,
/// }
///
/// let features = Features::default();
/// assert_eq!(features.is_enabled("jetpack/happychat"), Some(false));
/// assert!(features.oauth);
/// ```
#[proc_macro_derive(FeatureFlags, attributes(flag))]
pub fn derive_feature_flags(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let opts = match FeatureFlagsOpts::from_derive_input(&input) {
        Ok(opts) => opts,
        Err(e) => return e.write_errors().into(),
    };

    let name = &opts.ident;
    let fields = match opts.data {
        darling::ast::Data::Struct(fields) => fields.fields,
        darling::ast::Data::Enum(_) => {
            return syn::Error::new_spanned(&input, "FeatureFlags can only be derived for structs")
                .to_compile_error()
                .into();
        }
    };

    let mut idents = Vec::new();
    let mut flag_names = Vec::new();
    let mut defaults = Vec::new();
    for field in &fields {
        let is_bool = matches!(&field.ty, syn::Type::Path(p) if p.path.is_ident("bool"));
        let Some(ident) = field.ident.clone() else {
            continue;
        };
        if !is_bool {
            return syn::Error::new_spanned(&field.ty, "feature flags must be `bool` fields")
                .to_compile_error()
                .into();
        }
        flag_names.push(field.name.clone().unwrap_or_else(|| ident.to_string()));
        defaults.push(field.default);
        idents.push(ident);
    }

    let expanded = quote! {
        impl ::core::default::Default for #name {
            fn default() -> Self {
                Self {
                    #(#idents: #defaults,)*
                }
            }
        }

        impl ::quill::FeatureFlags for #name {
            fn is_enabled(&self, name: &str) -> ::core::option::Option<bool> {
                match name {
                    #(#flag_names => ::core::option::Option::Some(self.#idents),)*
                    _ => ::core::option::Option::None,
                }
            }

            fn set(&mut self, name: &str, enabled: bool) -> bool {
                match name {
                    #(#flag_names => {
                        self.#idents = enabled;
                        true
                    })*
                    _ => false,
                }
            }

            fn all_flags() -> &'static [&'static str] {
                &[#(#flag_names),*]
            }
        }
    };

    TokenStream::from(expanded)
}
