use proc_macro2::{Ident, Span, TokenStream};
use quote::{quote, ToTokens};
use std::collections::BTreeSet;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{parse, parse2, Attribute, FnArg, Item, ItemFn, Lit, Meta, NestedMeta, Token};
use walkdir::WalkDir;

/// Expands a test function taking one file per `#[suffix = "..."]`
/// parameter into one `#[test]` per stem found under `dir`.
///
/// ```ignore
/// #[test_files(dir = "tests/parse")]
/// fn test_parser(#[suffix = ".vcf"] input: InputFile, #[suffix = ".json"] output: OutputFile) {}
/// ```
///
/// `rs` names the file holding the test. It defaults to the invoking file
/// and gets touched when the set of test cases changed since expansion.
#[proc_macro_attribute]
pub fn test_files(
    raw_args: proc_macro::TokenStream,
    raw_item: proc_macro::TokenStream,
) -> proc_macro::TokenStream {
    match expand(raw_args.into(), raw_item.into()) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(raw_args: TokenStream, raw_item: TokenStream) -> Result<TokenStream, syn::Error> {
    let args_meta: Punctuated<NestedMeta, Token![,]> =
        parse::Parser::parse2(Punctuated::parse_terminated, raw_args)?;
    let args = Args::parse(&args_meta)?;

    let item = match parse2::<Item>(raw_item)? {
        Item::Fn(item) => item,
        item => return Err(syn::Error::new(item.span(), "expected function")),
    };

    let mut suffixes = Vec::new();
    for arg in &item.sig.inputs {
        let suffix = find_suffix(arg_attrs(arg))?
            .ok_or_else(|| syn::Error::new(arg.span(), "Missing argument: #[suffix = ...]"))?;
        suffixes.push(suffix);
    }

    let mut matched_file_names = BTreeSet::new();
    let mut stems = BTreeSet::new();
    for entry in WalkDir::new(&args.dir).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            syn::Error::new(args_meta.span(), format_args!("error during walkdir: {}", e))
        })?;
        let file_name = entry
            .path()
            .strip_prefix(&args.dir)
            .ok()
            .and_then(|file_name| file_name.to_str())
            .ok_or_else(|| {
                syn::Error::new(
                    args_meta.span(),
                    format_args!("invalid file name: {}", entry.path().display()),
                )
            })?;
        for suffix in &suffixes {
            if let Some(stem) = file_name.strip_suffix(suffix.as_str()) {
                stems.insert(stem.to_owned());
                matched_file_names.insert(file_name.to_owned());
            }
        }
    }

    let function_name = &item.sig.ident;
    let test_functions = stems.iter().map(|stem| {
        let test_function_ident =
            Ident::new(&format!("test_{}", stem.replace('/', "_")), Span::call_site());
        let arguments = suffixes
            .iter()
            .map(|suffix| format!("{}/{}{}", args.dir, stem, suffix));
        quote! {
            #[test]
            fn #test_function_ident() {
                super::#function_name(#(#arguments.into(),)*);
            }
        }
    });

    let rs = match &args.rs {
        Some(rs) => quote! { String::from(#rs) },
        None => quote! { String::from(file!()) },
    };
    let dir = &args.dir;
    let matched_file_names = matched_file_names.iter();
    let check_testcases_function = quote! {
        #[test]
        fn __check_testcases() {
            testfiles::__rt::check(
                &testfiles::__rt::WalkConfig {
                    rs: #rs,
                    dir: String::from(#dir),
                    suffixes: vec![#(String::from(#suffixes),)*],
                },
                vec![#(String::from(#matched_file_names),)*],
            );
        }
    };

    let base_function = strip_test_attrs(item.clone());
    Ok(quote! {
        #[cfg(test)]
        #base_function

        #[cfg(test)]
        mod #function_name {
            #check_testcases_function
            #(#test_functions)*
        }
    })
}

fn arg_attrs(arg: &FnArg) -> &[Attribute] {
    match arg {
        FnArg::Receiver(arg) => &arg.attrs,
        FnArg::Typed(arg) => &arg.attrs,
    }
}

fn find_suffix(attrs: &[Attribute]) -> Result<Option<String>, syn::Error> {
    let mut suffix = None;
    for attr in attrs {
        let meta = match attr.parse_meta() {
            Ok(meta) if meta.path().is_ident("suffix") => meta,
            _ => continue,
        };
        if suffix.is_some() {
            return Err(syn::Error::new(attr.span(), "Duplicate #[suffix] attribute"));
        }
        suffix = Some(string_value(&meta, "Expected #[suffix = ...]")?);
    }
    Ok(suffix)
}

/// The generated tests call the function directly, so it loses `#[test]`
/// and its parameters lose `#[suffix]`.
fn strip_test_attrs(mut item: ItemFn) -> ItemFn {
    let has_ident = |attr: &Attribute, ident: &str| {
        attr.parse_meta().map_or(false, |meta| meta.path().is_ident(ident))
    };
    item.attrs.retain(|attr| !has_ident(attr, "test"));
    for arg in &mut item.sig.inputs {
        let attrs = match arg {
            FnArg::Receiver(arg) => &mut arg.attrs,
            FnArg::Typed(arg) => &mut arg.attrs,
        };
        attrs.retain(|attr| !has_ident(attr, "suffix"));
    }
    item
}

fn string_value(meta: &Meta, message: &str) -> Result<String, syn::Error> {
    match meta {
        Meta::NameValue(meta) => match &meta.lit {
            Lit::Str(lit) => Ok(lit.value()),
            lit => Err(syn::Error::new(lit.span(), "Expected a string literal")),
        },
        meta => Err(syn::Error::new(meta.span(), message)),
    }
}

#[derive(Debug, Clone)]
struct Args {
    rs: Option<String>,
    dir: String,
}

impl Args {
    fn parse(meta: &Punctuated<NestedMeta, Token![,]>) -> Result<Self, syn::Error> {
        let mut rs = None;
        let mut dir = None;
        for arg in meta {
            let arg = match arg {
                NestedMeta::Meta(arg) => arg,
                arg => return Err(syn::Error::new(arg.span(), "invalid argument")),
            };
            let slot = if arg.path().is_ident("dir") {
                &mut dir
            } else if arg.path().is_ident("rs") {
                &mut rs
            } else {
                return Err(syn::Error::new(
                    arg.path().span(),
                    format_args!("unknown argument: {}", arg.path().to_token_stream()),
                ));
            };
            if slot.is_some() {
                return Err(syn::Error::new(arg.path().span(), "duplicate argument"));
            }
            *slot = Some(string_value(arg, "invalid argument value")?);
        }
        let dir = dir.ok_or_else(|| syn::Error::new(meta.span(), "missing argument: dir"))?;
        Ok(Args { rs, dir })
    }
}
