use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Attribute, FnArg, Ident, Item, ItemFn, ReturnType};

/// Generates a differentiable companion of an `f64` function.
///
/// `#[differentiable(diff_name)]` keeps the function as written and adds
/// `diff_name`, whose parameters marked `#[diffvar]` are taken as
/// `&RealForward` and whose result is a `RealForward`. Every other parameter
/// keeps its type and acts as a constant.
#[proc_macro_attribute]
pub fn differentiable(attr: TokenStream, item: TokenStream) -> TokenStream {
    let diff_name = parse_macro_input!(attr as Ident);
    let input = parse_macro_input!(item as Item);

    match input {
        Item::Fn(item_fn) => expand_fn(diff_name, item_fn),
        other => syn::Error::new_spanned(other, "differentiable can only be applied to functions")
            .to_compile_error()
            .into(),
    }
}

fn expand_fn(diff_name: Ident, item_fn: ItemFn) -> TokenStream {
    let vis = item_fn.vis;

    match &item_fn.sig.output {
        ReturnType::Type(_, ty) if is_f64(ty) => {}
        _ => {
            return syn::Error::new_spanned(
                &item_fn.sig.output,
                "differentiable functions must return f64",
            )
            .to_compile_error()
            .into();
        }
    }

    let mut original_sig = item_fn.sig.clone();
    let mut diff_sig = item_fn.sig;
    let mut diffvars = 0usize;

    for (original_arg, diff_arg) in original_sig.inputs.iter_mut().zip(diff_sig.inputs.iter_mut()) {
        if let (FnArg::Typed(original_pat), FnArg::Typed(diff_pat)) = (original_arg, diff_arg) {
            let is_diffvar = original_pat.attrs.iter().any(is_diffvar_attr);

            let filtered_attrs: Vec<Attribute> = original_pat
                .attrs
                .iter()
                .filter(|attr| !is_diffvar_attr(attr))
                .cloned()
                .collect();

            original_pat.attrs = filtered_attrs.clone();
            diff_pat.attrs = filtered_attrs;

            if is_diffvar {
                if !is_f64(&original_pat.ty) {
                    return syn::Error::new_spanned(
                        &original_pat.ty,
                        "#[diffvar] parameters must be f64",
                    )
                    .to_compile_error()
                    .into();
                }
                diff_pat.ty = Box::new(syn::parse_quote!(&::codiff::RealForward));
                diffvars += 1;
            }
        }
    }

    if diffvars == 0 {
        return syn::Error::new_spanned(
            &original_sig.ident,
            "differentiable functions need at least one #[diffvar] parameter",
        )
        .to_compile_error()
        .into();
    }

    diff_sig.ident = diff_name;
    diff_sig.output = syn::parse_quote!(-> ::codiff::RealForward);

    let original_block = item_fn.block;
    let diff_block = quote!({
        #[allow(unused_imports)]
        use ::codiff::prelude::*;
        (|| #original_block)().into()
    });

    let attrs = item_fn.attrs;
    let expanded = quote! {
        #(#attrs)*
        #vis #original_sig #original_block

        #vis #diff_sig #diff_block
    };

    expanded.into()
}

fn is_diffvar_attr(attr: &Attribute) -> bool {
    attr.path().is_ident("diffvar")
}

fn is_f64(ty: &syn::Type) -> bool {
    match ty {
        syn::Type::Path(path) => path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "f64"),
        _ => false,
    }
}
