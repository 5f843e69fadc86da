use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::parse::Parser;

/// Generate a color model struct from a definition with exactly three
/// component fields.
///
/// Adds `Clone`/`Debug`, phantom fields for every generic type parameter,
/// a `new` constructor, conversion to and from `Components` and an
/// implementation of `crate::models::Model` for models that carry a space.
#[proc_macro]
pub fn gen_model(input: TokenStream) -> TokenStream {
    let mut input = syn::parse_macro_input!(input as syn::ItemStruct);

    if input.fields.len() != 3 {
        return quote! {
            compile_error!("Models must have exactly 3 fields, one for each component of the color.");
        }
        .into();
    }

    let field_names = input
        .fields
        .iter()
        .filter_map(|f| f.ident.clone())
        .collect::<Vec<_>>();
    if field_names.len() != 3 {
        return quote! {
            compile_error!("Model fields must be named.");
        }
        .into();
    }

    let field1 = &field_names[0];
    let field2 = &field_names[1];
    let field3 = &field_names[2];

    // Component fields are always public.
    input.fields.iter_mut().for_each(|f| {
        f.vis = syn::Visibility::Public(Default::default());
    });

    input.attrs.push(syn::parse_quote! {
        #[derive(Clone, Debug)]
    });

    let type_params = input
        .generics
        .params
        .iter()
        .filter_map(|g| match g {
            syn::GenericParam::Type(type_param) => Some(type_param.ident.clone()),
            _ => None,
        })
        .collect::<Vec<_>>();

    let mut phantom_fields: Vec<syn::Ident> = vec![];

    if let syn::Fields::Named(ref mut named) = input.fields {
        for ident in &type_params {
            let field_name = format!("_{}", ident.to_string().to_lowercase());
            let field_name = syn::Ident::new(field_name.as_str(), Span::call_site());

            let field = match syn::Field::parse_named.parse2(quote! {
                #field_name: std::marker::PhantomData<#ident>
            }) {
                Ok(field) => field,
                Err(err) => return err.to_compile_error().into(),
            };

            phantom_fields.push(field_name);
            named.named.push(field);
        }
    }

    let struct_name = input.ident.clone();
    let (impl_gen, type_gen, where_clause) = input.generics.split_for_impl();

    let model_where = match where_clause {
        Some(where_clause) => {
            let predicates = &where_clause.predicates;
            quote! { where Self: crate::color::HasSpace, #predicates }
        }
        None => quote! { where Self: crate::color::HasSpace },
    };

    let generated = quote! {
        impl #impl_gen #struct_name #type_gen #where_clause {
            /// Create a new color having this color space.
            pub fn new(
                #field1: crate::color::Component,
                #field2: crate::color::Component,
                #field3: crate::color::Component,
            ) -> Self {
                Self {
                    #field1,
                    #field2,
                    #field3,
                    #(#phantom_fields: std::marker::PhantomData,)*
                }
            }

            /// Convert this model into generic components.
            pub fn to_components(&self) -> crate::color::Components {
                crate::color::Components(self.#field1, self.#field2, self.#field3)
            }
        }

        impl #impl_gen From<crate::color::Components> for #struct_name #type_gen #where_clause {
            fn from(value: crate::color::Components) -> Self {
                Self::new(value.0, value.1, value.2)
            }
        }

        impl #impl_gen crate::models::Model for #struct_name #type_gen #model_where {
            fn to_color(&self, alpha: Option<crate::color::Component>) -> crate::color::Color {
                crate::color::Color::new(
                    <Self as crate::color::HasSpace>::SPACE,
                    if self.#field1.is_nan() { None } else { Some(self.#field1) },
                    if self.#field2.is_nan() { None } else { Some(self.#field2) },
                    if self.#field3.is_nan() { None } else { Some(self.#field3) },
                    alpha,
                )
            }

            fn from_color(color: &crate::color::Color) -> Self {
                Self::new(color.components.0, color.components.1, color.components.2)
            }
        }
    };

    quote! {
        #input
        #generated
    }
    .into()
}
