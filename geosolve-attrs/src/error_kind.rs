use proc_macro2::TokenStream as TokenStream2;
use quote::{quote, quote_spanned, ToTokens};
use syn::{meta::ParseNestedMeta, Attribute, DeriveInput, Data, Expr, Fields, Ident, Result};

/// The tags of the `error` attribute.
#[derive(Debug, Default)]
struct ErrorTags {
    message: Option<Expr>,
    labels: Option<Expr>,
    help: Option<Expr>,
}

impl ErrorTags {
    /// Reads the tags from every `error` attribute in the list. A tag given twice is an error.
    fn from_attributes(attrs: &[Attribute]) -> Result<Self> {
        let mut tags = Self::default();
        for attr in attrs.iter().filter(|attr| attr.path().is_ident("error")) {
            attr.parse_nested_meta(|meta| tags.parse_tag(meta))?;
        }
        Ok(tags)
    }

    fn parse_tag(&mut self, meta: ParseNestedMeta) -> Result<()> {
        let slot = if meta.path.is_ident("message") {
            &mut self.message
        } else if meta.path.is_ident("labels") {
            &mut self.labels
        } else if meta.path.is_ident("help") {
            &mut self.help
        } else {
            return Err(meta.error("unknown tag; expected `message`, `labels` or `help`"));
        };

        if slot.is_some() {
            return Err(meta.error("duplicate tag"));
        }
        *slot = Some(meta.value()?.parse()?);
        Ok(())
    }
}

/// Brings the named fields of `self` into scope as local variables.
fn bind_fields(name: &Ident, fields: &Fields) -> TokenStream2 {
    match fields {
        Fields::Named(fields) => {
            let names = fields.named.iter().map(|field| &field.ident);
            quote! {
                #[allow(unused_variables)]
                let #name { #(#names),* } = self;
            }
        },
        Fields::Unnamed(_) => quote_spanned! {
            name.span() => compile_error!("`ErrorKind` cannot be derived for tuple structs");
        },
        Fields::Unit => TokenStream2::new(),
    }
}

/// The struct to derive `ErrorKind` for.
#[derive(Debug)]
pub struct ErrorKindTarget {
    pub name: Ident,
    fields: Fields,
    tags: ErrorTags,
}

impl TryFrom<DeriveInput> for ErrorKindTarget {
    type Error = syn::Error;

    fn try_from(input: DeriveInput) -> Result<Self> {
        let Data::Struct(data) = input.data else {
            return Err(syn::Error::new(input.ident.span(), "`ErrorKind` can only be derived for structs"));
        };

        let tags = ErrorTags::from_attributes(&input.attrs)?;
        if tags.message.is_none() {
            return Err(syn::Error::new(input.ident.span(), "missing `message` tag in `error` attribute"));
        }

        Ok(Self { name: input.ident, fields: data.fields, tags })
    }
}

impl ToTokens for ErrorKindTarget {
    fn to_tokens(&self, tokens: &mut TokenStream2) {
        let bind = bind_fields(&self.name, &self.fields);
        let message = &self.tags.message;

        // without labels, every span is highlighted with no text
        let labels = match &self.tags.labels {
            Some(labels) => quote! {
                (#labels).into_iter().map(|text| text.to_string()).chain(std::iter::repeat(String::new()))
            },
            None => quote! { std::iter::repeat(String::new()) },
        };
        let help = self.tags.help.as_ref().map(|help| quote! { builder.set_help(#help); });

        tokens.extend(quote! {
            fn message(&self) -> String {
                #bind
                (#message).to_string()
            }

            fn build_report<'a>(
                &self,
                src_id: &'a str,
                spans: &[std::ops::Range<usize>],
            ) -> ariadne::Report<(&'a str, std::ops::Range<usize>)> {
                #bind
                let offset = spans.first().map_or(0, |span| span.start);
                let labels = spans
                    .iter()
                    .zip(#labels)
                    .map(|(span, text)| {
                        let label = ariadne::Label::new((src_id, span.clone()))
                            .with_color(geosolve_error::EXPR);
                        if text.is_empty() { label } else { label.with_message(text) }
                    })
                    .collect::<Vec<_>>();

                #[allow(unused_mut)]
                let mut builder = ariadne::Report::build(ariadne::ReportKind::Error, src_id, offset)
                    .with_message((#message).to_string())
                    .with_labels(labels);
                #help
                builder.finish()
            }
        });
    }
}
