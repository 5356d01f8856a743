use std::iter;

use const_random::const_random;
use either::Either::{Left, Right};
use proc_macro2::{Span, TokenStream};
use quote::{format_ident, quote};
use syn::{
    parse::{Parse, ParseStream},
    spanned::Spanned,
    visit::Visit,
    Expr, Lifetime,
};

use crate::arm::ArmPattern;

pub struct MatchArm {
    pattern: ArmPattern,
    guard: Option<Box<Expr>>,
    body: Box<Expr>,
}

impl Parse for MatchArm {
    fn parse(input: ParseStream<'_>) -> syn::Result<Self> {
        let syn::Arm { attrs, pat, guard, body, .. } = input.parse()?;

        if let Some(first) = attrs.first() {
            return Err(syn::Error::new(
                first.span(),
                "attributes are not supported on match arms",
            ));
        }

        let mut pattern = ArmPattern::default();
        pattern.visit_pat(&pat);

        if let Some(err) = pattern.error.take() {
            return Err(err);
        }

        if pattern.variants.is_empty() && !pattern.is_wildcard {
            return Err(syn::Error::new(
                Span::call_site(),
                "cannot tell which variant types this arm matches; name at least one, e.g. `value @ SomeType`",
            ));
        }

        if guard.is_some() {
            pattern.is_partial = true;
        }

        Ok(MatchArm {
            pattern,
            guard: guard.map(|(_, expr)| expr),
            body,
        })
    }
}

pub struct SumMatch {
    scrutinee: Box<Expr>,
    attrs: Vec<syn::Attribute>,
    arms: Vec<MatchArm>,
}

impl Parse for SumMatch {
    fn parse(input: ParseStream<'_>) -> syn::Result<Self> {
        let scrutinee = Box::new(Expr::parse_without_eager_brace(input)?);

        let content;
        syn::braced!(content in input);

        let attrs = syn::Attribute::parse_inner(&content)?;

        let mut arms = Vec::new();
        while !content.is_empty() {
            arms.push(content.parse()?);
        }

        Ok(SumMatch { scrutinee, attrs, arms })
    }
}

/// Lowers the match into a `try_unwrap` chain.
///
/// Each exhaustive arm peels its variant off the scrutinee type; a partial
/// arm (guard or refutable subpattern) rebuilds the scrutinee on fallthrough
/// so its type survives; the wildcard narrows to the empty sum. The chain
/// ends by ascribing the empty sum, so an unhandled variant is a type
/// mismatch at the last line, with exhaustiveness checked by the compiler.
pub fn expand(input: SumMatch) -> TokenStream {
    let SumMatch { scrutinee, attrs, arms } = input;

    for (index, arm) in arms.iter().enumerate() {
        for earlier in &arms[..index] {
            if let Some(err) = arm.pattern.conflicts_with(&earlier.pattern) {
                return err.to_compile_error();
            }
        }
    }

    let subject = format_ident!("__braid_subject_{}", const_random!(u32));
    let done = Lifetime::new(&format!("'__braid_done_{}", const_random!(u32)), Span::call_site());
    let arm_label = Lifetime::new(&format!("'__braid_arm_{}", const_random!(u32)), Span::call_site());

    let steps = arms.iter().flat_map(|arm| {
        let subject = subject.clone();
        let done = done.clone();
        let arm_label = arm_label.clone();

        let MatchArm { pattern, guard, body } = arm;
        let ArmPattern {
            variants,
            pats,
            is_wildcard,
            is_partial,
            ..
        } = pattern;

        if *is_wildcard {
            return Left(iter::once(quote! {
                let #subject = match #subject.narrow::<(), _>() {
                    #[allow(unreachable_code)]
                    Err(_) => {
                        #[warn(unreachable_code)]
                        let ret = #arm_label: { #body };
                        break #done ret;
                    }
                    Ok(empty) => empty,
                };
            }));
        }

        let pairs = variants.iter().zip(pats).zip(iter::repeat((guard, body)));
        Right(pairs.map(move |((variant, pat), (guard, body))| {
            let success = quote! {{
                #[warn(unreachable_code, clippy::diverging_sub_expression)]
                let ret = #arm_label: { #body };
                break #done ret;
            }};

            match guard {
                Some(guard) => quote! {
                    let mut #subject = #subject;
                    #subject = match #subject.try_unwrap::<#variant, _>() {
                        #[allow(unreachable_code, clippy::diverging_sub_expression)]
                        Ok(#pat) if #guard => #success,
                        #[allow(unreachable_patterns)]
                        Ok(__braid_rest) => ::braid::Sum::new(__braid_rest),
                        Err(__braid_rest) => __braid_rest.broaden(),
                    };
                },
                None if *is_partial => quote! {
                    let mut #subject = #subject;
                    #subject = match #subject.try_unwrap::<#variant, _>() {
                        #[allow(unreachable_code, clippy::diverging_sub_expression)]
                        Ok(#pat) => #success,
                        #[allow(unreachable_patterns)]
                        Ok(__braid_rest) => ::braid::Sum::new(__braid_rest),
                        Err(__braid_rest) => __braid_rest.broaden(),
                    };
                },
                None => quote! {
                    let #subject = match #subject.try_unwrap::<#variant, _>() {
                        #[allow(unreachable_code, clippy::diverging_sub_expression)]
                        Ok(#pat) => #success,
                        Err(__braid_rest) => __braid_rest,
                    };
                },
            }
        }))
    });

    quote! {{
        let #subject = #scrutinee;
        #done: {
            #(#attrs)*
            #(#steps)*
            let #subject: ::braid::Sum<()> = #subject;
            #subject.unreachable()
        }
    }}
}
