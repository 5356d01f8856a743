//! Companion proc macros for the `braid` crate.
//!
//! The macros expand against the `::braid` crate root, so they are meant to
//! be used through `braid`'s own re-exports rather than as a standalone
//! dependency.

use proc_macro::TokenStream;

mod arm;
mod expand;

/// Matches on a `braid` sum by variant-type patterns.
///
/// ```text
/// let area = match_sum!(shape {
///     Circle(r) => PI * r * r,
///     rect @ Rect { .. } => rect.width * rect.height,
///     _ => 0.0,
/// });
/// ```
///
/// Arms dispatch on the type their pattern names: Pascal-case idents, paths
/// and struct/tuple-struct patterns select the variant; `name @ ...` binds
/// the whole variant; guards and refutable subpatterns fall through to later
/// arms; `_` takes whatever is left. The expansion narrows the scrutinee arm
/// by arm and ends on the empty sum, so a variant no arm covers is a compile
/// error, not a panic.
#[proc_macro]
pub fn match_sum(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as expand::SumMatch);
    expand::expand(input).into()
}
