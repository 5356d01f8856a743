use convert_case::{Case, Casing};
use quote::ToTokens;
use syn::{visit, visit::Visit, ExprRange, Pat, PatIdent, Type};

/// The variant-type patterns harvested from one match arm.
///
/// An arm names the variant types it dispatches on through its patterns:
/// Pascal-case idents, paths and struct/tuple-struct patterns select a
/// variant, `name @ ...` binds the whole variant, `_` takes whatever is
/// left. A guard or a refutable subpattern makes the arm *partial*: it may
/// decline its variant, so the scrutinee type must survive it unchanged.
#[derive(Default)]
pub struct ArmPattern {
    pub variants: Vec<Type>,
    pub pats: Vec<Pat>,
    pub is_wildcard: bool,
    pub is_partial: bool,

    binding: Option<PatIdent>,
    in_subpat: bool,
    pub error: Option<syn::Error>,
}

impl ArmPattern {
    fn record(&mut self, ty: Type, pat: &Pat) {
        if self.variants.iter().any(|known| known == &ty) {
            self.error = Some(syn::Error::new_spanned(
                ty,
                "the same variant type cannot be split across patterns in one arm",
            ));
            return;
        }

        let bound = match self.binding.take() {
            Some(mut binding) => {
                binding.subpat = Some((<syn::Token![@]>::default(), Box::new(pat.clone())));
                Pat::Ident(binding)
            }
            None => pat.clone(),
        };

        self.variants.push(ty);
        self.pats.push(bound);
    }

    /// An arm is dead if an earlier arm already consumed one of its
    /// variant types for good.
    pub fn conflicts_with(&self, earlier: &ArmPattern) -> Option<syn::Error> {
        if earlier.is_partial {
            return None;
        }
        self.variants.iter().find_map(|ty| {
            let clash = earlier.variants.iter().any(|other| ty == other);
            clash.then(|| {
                syn::Error::new_spanned(
                    ty,
                    "this variant type is already matched exhaustively by an earlier arm",
                )
            })
        })
    }
}

impl Visit<'_> for ArmPattern {
    fn visit_pat(&mut self, pat: &'_ Pat) {
        match pat {
            Pat::Ident(ident) => {
                if !self.in_subpat {
                    let name = ident.ident.to_string();
                    if ident.subpat.is_none() && name.is_case(Case::Pascal) {
                        let ty = Type::Path(syn::TypePath {
                            qself: None,
                            path: syn::Path::from(ident.ident.clone()),
                        });
                        self.record(ty, pat);
                        return;
                    }

                    let mut binding = ident.clone();
                    binding.subpat = None;
                    self.binding = Some(binding);
                    visit::visit_pat(self, pat);
                    return;
                }

                // Inside a variant pattern a Pascal-case ident is most
                // likely a unit enum variant, which can fail to match.
                if ident.subpat.is_none() && ident.ident.to_string().is_case(Case::Pascal) {
                    self.is_partial = true;
                }
                visit::visit_pat(self, pat);
            }

            Pat::Struct(syn::PatStruct { qself, path, .. })
            | Pat::TupleStruct(syn::PatTupleStruct { qself, path, .. })
            | Pat::Path(syn::PatPath { qself, path, .. }) => {
                if self.in_subpat {
                    self.is_partial = true;
                    visit::visit_pat(self, pat);
                    return;
                }

                let ty = Type::Path(syn::TypePath {
                    qself: qself.clone(),
                    path: path.clone(),
                });

                self.in_subpat = true;
                visit::visit_pat(self, pat);
                self.in_subpat = false;

                self.record(ty, pat);
            }

            Pat::Paren(_) => visit::visit_pat(self, pat),

            Pat::Or(_) => {
                if !self.in_subpat {
                    if let Some(binding) = self.binding.take() {
                        self.error = Some(syn::Error::new_spanned(
                            binding,
                            "one binding cannot cover alternatives of different variant types",
                        ));
                        return;
                    }
                }
                visit::visit_pat(self, pat)
            }

            Pat::Wild(_) | Pat::Rest(_) | Pat::Range(ExprRange { start: None, end: None, .. })
                if !self.in_subpat =>
            {
                self.is_wildcard = true;
            }

            Pat::Lit(_) if !self.in_subpat => {
                self.error = Some(syn::Error::new_spanned(
                    pat,
                    "a bare literal does not name a variant type; match it inside one, e.g. `Code(404)`",
                ));
            }

            Pat::Const(_)
            | Pat::Range(_)
            | Pat::Macro(_)
            | Pat::Reference(_)
            | Pat::Slice(_)
            | Pat::Type(_)
            | Pat::Verbatim(_)
            | Pat::Tuple(_)
                if !self.in_subpat =>
            {
                self.error = Some(syn::Error::new_spanned(
                    pat,
                    format_args!("pattern `{}` is not supported here", pat.to_token_stream()),
                ));
            }

            Pat::Const(_) | Pat::Lit(_) => {
                self.is_partial = true;
                visit::visit_pat(self, pat)
            }

            Pat::Range(ExprRange { start, end, .. }) if start.is_some() || end.is_some() => {
                self.is_partial = true;
                visit::visit_pat(self, pat)
            }

            _ => visit::visit_pat(self, pat),
        }
    }
}
