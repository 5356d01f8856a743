//! Subset and superset relations between alternative lists.
//!
//! Two lists naming the same alternatives in different orders are distinct
//! types, but they are freely interconvertible: [`SplitList`] witnesses
//! that every alternative of one list occurs in another, and the tag maps
//! it derives drive [`Sum::broaden`], [`Sum::narrow`] and [`Sum::reorder`].
//! The `UMap` parameter is the per-alternative index map; it is inferred
//! wherever the alternatives are distinct, and spelled out with a
//! [`T!`]-list of [`tag`] indices where they are not.
//!
//! [`Sum::broaden`]: crate::sum::Sum::broaden
//! [`Sum::narrow`]: crate::sum::Sum::narrow
//! [`Sum::reorder`]: crate::sum::Sum::reorder
//! [`tag`]: crate::tag
//! [`T!`]: crate::T

use crate::repr::{Count, Rem, Split, SumList};
use crate::tag::{Tag, UTerm};

/// The leftover list after narrowing `S` down to `S2` under the map `UMap`.
pub type NarrowRem<S, S2, UMap> = <S as SplitList<S2, UMap>>::Remainder;

/// Witnesses that every alternative of `Sub` occurs in `Self`, with `UMap`
/// giving each one's index in `Self`.
pub trait SplitList<Sub: SumList, UMap>: SumList {
    /// The alternatives of `Self` that `Sub` does not name.
    type Remainder: SumList;

    #[doc(hidden)]
    fn broaden_tag(tag: u8) -> u8;

    #[doc(hidden)]
    fn narrow_tag(tag: u8) -> Result<u8, u8>;
}

impl<S: SumList> SplitList<(), ()> for S {
    type Remainder = Self;

    fn broaden_tag(tag: u8) -> u8 {
        unreachable!("no tag {tag} in an empty alternative set")
    }

    fn narrow_tag(tag: u8) -> Result<u8, u8> {
        Err(tag)
    }
}

impl<SubHead, SubTail, SuperHead, SuperTail, HeadIndex, TailIndex>
    SplitList<(SubHead, SubTail), (HeadIndex, TailIndex)> for (SuperHead, SuperTail)
where
    SubTail: SumList,
    SuperTail: SumList,
    HeadIndex: Tag,
    Self: Split<SubHead, HeadIndex>,
    Rem<Self, SubHead, HeadIndex>: SplitList<SubTail, TailIndex>,
{
    type Remainder = NarrowRem<Rem<Self, SubHead, HeadIndex>, SubTail, TailIndex>;

    fn broaden_tag(tag: u8) -> u8 {
        match <(SubHead, SubTail) as Split<SubHead, UTerm>>::try_unwrap(tag) {
            Ok(()) => HeadIndex::VALUE,
            Err(rest) => {
                let mapped = Rem::<Self, SubHead, HeadIndex>::broaden_tag(rest);
                <Self as Split<SubHead, HeadIndex>>::from_remainder(mapped)
            }
        }
    }

    fn narrow_tag(tag: u8) -> Result<u8, u8> {
        Ok(match <Self as Split<SubHead, HeadIndex>>::try_unwrap(tag) {
            Ok(()) => 0,
            Err(rest) => {
                let mapped = Rem::<Self, SubHead, HeadIndex>::narrow_tag(rest)?;
                <(SubHead, SubTail) as Split<SubHead, UTerm>>::from_remainder(mapped)
            }
        })
    }
}

/// `Self` contains every alternative of `Sub`.
///
/// Alias for the [`SplitList`] relation under its set-theoretic name.
pub trait Superset<Sub: SumList, UMap>: SplitList<Sub, UMap> {}

impl<S, Sub, UMap> Superset<Sub, UMap> for S
where
    Sub: SumList,
    S: SplitList<Sub, UMap>,
{
}

/// `Self` and `S2` name the same alternative set, possibly in different
/// orders: each is a superset of the other and they have equal length.
pub trait SameSet<S2: SumList, M1, M2>: SplitList<S2, M1> {}

impl<S, S2, M1, M2> SameSet<S2, M1, M2> for S
where
    S2: SumList + SplitList<S, M2>,
    S: SplitList<S2, M1> + Count<Count = <S2 as Count>::Count>,
{
}

/// Compile-time assertion that `A` and `B` name the same alternative set.
///
/// The index maps are inferred; a missing or duplicated alternative fails
/// to compile.
pub fn same_set<A, B, M1, M2>()
where
    B: SumList,
    A: SameSet<B, M1, M2>,
{
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repr::Nth;
    use crate::tag::U1;
    use crate::T;

    #[test]
    fn same_set_is_order_independent() {
        same_set::<T![u8, bool, i32], T![bool, i32, u8], _, _>();
        same_set::<T![u8], T![u8], _, _>();
        same_set::<T![], T![], _, _>();
    }

    fn assert_superset<Sup, Sub, UMap>()
    where
        Sub: SumList,
        Sup: Superset<Sub, UMap>,
    {
    }

    #[test]
    fn supersets_ignore_declaration_order() {
        assert_superset::<T![u8, bool, i32], T![i32, u8], _>();
        assert_superset::<T![u8, bool], T![], _>();
    }

    #[test]
    fn nth_selects_by_index() {
        let second: Nth<T![u8, bool, i32], U1> = true;
        assert!(second);
    }

    #[test]
    fn tag_maps_round_trip() {
        // (bool, i32) inside (u8, bool, i32): bool is slot 1, i32 is slot 2.
        type Sub = T![bool, i32];
        type Super = T![u8, bool, i32];

        assert_eq!(<Super as SplitList<Sub, _>>::broaden_tag(0), 1);
        assert_eq!(<Super as SplitList<Sub, _>>::broaden_tag(1), 2);

        assert_eq!(<Super as SplitList<Sub, _>>::narrow_tag(1), Ok(0));
        assert_eq!(<Super as SplitList<Sub, _>>::narrow_tag(2), Ok(1));
        // u8 is not in the subset; its tag lands in the remainder list.
        assert_eq!(<Super as SplitList<Sub, _>>::narrow_tag(0), Err(0));
    }
}
