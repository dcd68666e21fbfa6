use proc_macro2::TokenStream;
use quote::quote;

// Quoting helpers

/// Quote an `Option`, applying the transform to the inner value when present.
pub fn quote_option<T, F>(opt: Option<&T>, transform: F) -> TokenStream
where
    F: FnOnce(&T) -> TokenStream,
{
    if let Some(v) = opt {
        let transformed = transform(v);
        quote!(Some(#transformed))
    } else {
        quote!(None)
    }
}

/// Quote a slice by transforming each element and returning a token array.
pub fn quote_slice<T, F>(items: &[T], transform: F) -> TokenStream
where
    F: Fn(&T) -> TokenStream,
{
    let items: Vec<TokenStream> = items.iter().map(transform).collect();

    quote! {
        &[#(#items),*]
    }
}
