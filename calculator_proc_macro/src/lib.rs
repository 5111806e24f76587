use proc_macro2::TokenStream;
use quote::quote;
use syn::{parse2, spanned::Spanned, Data, DeriveInput, Fields, Ident, LitChar, LitInt, Variant};

/// Generates `ALL`, `symbol`, `precedence` and `from_symbol` for a fieldless
/// enum whose variants are tagged `#[operator(symbol = '+', precedence = 1)]`.
#[proc_macro_derive(OperatorTable, attributes(operator))]
pub fn operator_table_macro(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    operator_table(input.into()).into()
}

struct OperatorVariant {
    ident: Ident,
    symbol: char,
    precedence: u8,
}

fn operator_table(input: TokenStream) -> TokenStream {
    match expand(input) {
        Ok(tokens) => tokens,
        Err(error) => error.to_compile_error(),
    }
}

fn expand(input: TokenStream) -> syn::Result<TokenStream> {
    let input: DeriveInput = parse2(input)?;

    let name = input.ident;

    let variants = match input.data {
        Data::Enum(en) => en.variants,
        _ => {
            return Err(syn::Error::new(
                name.span(),
                "OperatorTable is only supported for enums",
            ))
        }
    };

    let mut operators: Vec<OperatorVariant> = Vec::new();

    for variant in &variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new(
                variant.span(),
                "operator variants cannot carry fields",
            ));
        }

        let operator = parse_operator(variant)?;

        if let Some(clash) = operators.iter().find(|o| o.symbol == operator.symbol) {
            return Err(syn::Error::new(
                variant.span(),
                format!(
                    "symbol `{}` is already used by `{}`",
                    operator.symbol, clash.ident
                ),
            ));
        }

        operators.push(operator);
    }

    let count = operators.len();
    let idents: Vec<&Ident> = operators.iter().map(|o| &o.ident).collect();
    let symbols: Vec<char> = operators.iter().map(|o| o.symbol).collect();
    let precedences: Vec<u8> = operators.iter().map(|o| o.precedence).collect();

    Ok(quote! {
        impl #name {
            pub const ALL: [Self; #count] = [#(Self::#idents),*];

            pub const fn symbol(self) -> char {
                match self {
                    #(Self::#idents => #symbols,)*
                }
            }

            pub const fn precedence(self) -> u8 {
                match self {
                    #(Self::#idents => #precedences,)*
                }
            }

            pub fn from_symbol(symbol: char) -> Option<Self> {
                match symbol {
                    #(#symbols => Some(Self::#idents),)*
                    _ => None,
                }
            }
        }
    })
}

fn parse_operator(variant: &Variant) -> syn::Result<OperatorVariant> {
    let mut symbol = None;
    let mut precedence = None;

    for attr in variant.attrs.iter().filter(|a| a.path().is_ident("operator")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("symbol") {
                let lit: LitChar = meta.value()?.parse()?;
                symbol = Some(lit.value());
                Ok(())
            } else if meta.path.is_ident("precedence") {
                let lit: LitInt = meta.value()?.parse()?;
                precedence = Some(lit.base10_parse::<u8>()?);
                Ok(())
            } else {
                Err(meta.error("expected `symbol` or `precedence`"))
            }
        })?;
    }

    match (symbol, precedence) {
        (Some(symbol), Some(precedence)) => Ok(OperatorVariant {
            ident: variant.ident.clone(),
            symbol,
            precedence,
        }),
        _ => Err(syn::Error::new(
            variant.span(),
            "expected `#[operator(symbol = '..', precedence = ..)]`",
        )),
    }
}
