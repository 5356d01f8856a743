//! The join algebra: combining two independent operands into the sum of
//! every pairwise combination of their alternatives.
//!
//! Operand alternatives are first promoted to tuple form: an [`Args`]
//! passes through flat, anything else lifts to a one-field tuple. The
//! promotion marker per alternative ([`Flat`] / [`Lift`]) is inferred for
//! plain alternatives; where an alternative is itself an `Args` both
//! markers apply and the map must be spelled out, `T![Flat, ...]` style
//! (or use [`Sum::join_flat`], which skips promotion of an already-tupled
//! left operand).
//!
//! The product list is built left-major: one block per left alternative,
//! each block pairing it with every right alternative in order. The live
//! pairing's tag is therefore `left * width + right`, where `width` is the
//! right operand's alternative count. Only
//! that one pairing is ever materialized; both payloads are moved exactly
//! once.
//!
//! Left-major blocks also make the join exactly associative: the two ways
//! of bracketing three operands produce the same list in the same order
//! and the same tag, not merely the same set.
//!
//! [`Sum::join_flat`]: crate::sum::Sum::join_flat

use core::mem::{ManuallyDrop, MaybeUninit};

use crate::args::{Args, Concat};
use crate::repr::{Cons, SumList};

/// Promotion marker: the alternative is already an [`Args`] and keeps its
/// fields.
pub struct Flat;

/// Promotion marker: the alternative is a plain value and becomes a
/// one-field tuple.
pub struct Lift;

/// Promotes one alternative to tuple form.
pub trait Promote<M> {
    /// The tuple-form alternative.
    type Output;

    /// Converts the value; a move either way, nothing is copied.
    fn promote(self) -> Self::Output;
}

impl<L> Promote<Flat> for Args<L> {
    type Output = Args<L>;

    fn promote(self) -> Args<L> {
        self
    }
}

impl<T> Promote<Lift> for T {
    type Output = Args<(T, ())>;

    fn promote(self) -> Args<(T, ())> {
        Args((self, ()))
    }
}

/// The list `S` with every alternative promoted under the marker list `M`.
pub type Promoted<S, M> = <S as PromoteList<M>>::Output;

/// Promotes every alternative of a list to tuple form.
pub trait PromoteList<M>: SumList {
    /// The promoted list; all alternatives are [`Args`].
    type Output: SumList;

    #[doc(hidden)]
    unsafe fn promote_repr(
        this: &mut ManuallyDrop<Self::Repr>,
        tag: u8,
    ) -> ManuallyDrop<<Self::Output as SumList>::Repr>;
}

impl PromoteList<()> for () {
    type Output = ();

    unsafe fn promote_repr(
        this: &mut ManuallyDrop<Self::Repr>,
        _: u8,
    ) -> ManuallyDrop<<Self::Output as SumList>::Repr> {
        match (**this).0 {}
    }
}

impl<Head, Tail, MHead, MTail> PromoteList<(MHead, MTail)> for (Head, Tail)
where
    Head: Promote<MHead>,
    Tail: PromoteList<MTail>,
{
    type Output = (Head::Output, Tail::Output);

    unsafe fn promote_repr(
        this: &mut ManuallyDrop<Self::Repr>,
        tag: u8,
    ) -> ManuallyDrop<<Self::Output as SumList>::Repr> {
        if tag == 0 {
            let data = unsafe { ManuallyDrop::take(&mut this.data) };
            ManuallyDrop::new(Cons {
                data: ManuallyDrop::new(data.promote()),
            })
        } else {
            let next = unsafe { Tail::promote_repr(&mut this.next, tag - 1) };
            ManuallyDrop::new(Cons { next })
        }
    }
}

/// Type-level list append.
pub trait Append<R> {
    /// `Self` followed by `R`.
    type Output;
}

impl<R> Append<R> for () {
    type Output = R;
}

impl<Head, Tail, R> Append<R> for (Head, Tail)
where
    Tail: Append<R>,
{
    type Output = (Head, Tail::Output);
}

/// The product list of two promoted operand lists.
pub type Product<S, R> = <S as JoinList<R>>::Product;

/// One block of the product: a fixed left tuple `L` paired with every
/// alternative of `Self` (the promoted right list), in order.
pub trait BlockJoin<L>: SumList {
    /// The block's alternative list.
    type Block: SumList;

    #[doc(hidden)]
    unsafe fn join_block(
        left: L,
        this: &mut ManuallyDrop<Self::Repr>,
        tag: u8,
    ) -> ManuallyDrop<<Self::Block as SumList>::Repr>;
}

impl<L> BlockJoin<L> for () {
    type Block = ();

    unsafe fn join_block(
        _: L,
        this: &mut ManuallyDrop<Self::Repr>,
        _: u8,
    ) -> ManuallyDrop<<Self::Block as SumList>::Repr> {
        match (**this).0 {}
    }
}

impl<L, RHead, RTail> BlockJoin<L> for (Args<RHead>, RTail)
where
    L: Concat<RHead>,
    RTail: BlockJoin<L>,
{
    type Block = (Args<<L as Concat<RHead>>::Output>, RTail::Block);

    unsafe fn join_block(
        left: L,
        this: &mut ManuallyDrop<Self::Repr>,
        tag: u8,
    ) -> ManuallyDrop<<Self::Block as SumList>::Repr> {
        if tag == 0 {
            let right = unsafe { ManuallyDrop::take(&mut this.data) };
            ManuallyDrop::new(Cons {
                data: ManuallyDrop::new(Args(left.concat(right.0))),
            })
        } else {
            let next = unsafe { RTail::join_block(left, &mut this.next, tag - 1) };
            ManuallyDrop::new(Cons { next })
        }
    }
}

/// The full cartesian product: one [`BlockJoin`] block per alternative of
/// `Self` (the promoted left list), appended in order.
pub trait JoinList<R: SumList>: SumList {
    /// The product's alternative list.
    type Product: SumList;

    #[doc(hidden)]
    unsafe fn join_repr(
        this: &mut ManuallyDrop<Self::Repr>,
        ltag: u8,
        other: &mut ManuallyDrop<R::Repr>,
        rtag: u8,
    ) -> ManuallyDrop<<Self::Product as SumList>::Repr>;
}

impl<R: SumList> JoinList<R> for () {
    type Product = ();

    unsafe fn join_repr(
        this: &mut ManuallyDrop<Self::Repr>,
        _: u8,
        _: &mut ManuallyDrop<R::Repr>,
        _: u8,
    ) -> ManuallyDrop<<Self::Product as SumList>::Repr> {
        match (**this).0 {}
    }
}

impl<LHead, LTail, R> JoinList<R> for (Args<LHead>, LTail)
where
    R: BlockJoin<LHead>,
    LTail: JoinList<R>,
    <R as BlockJoin<LHead>>::Block: Append<<LTail as JoinList<R>>::Product>,
    <<R as BlockJoin<LHead>>::Block as Append<<LTail as JoinList<R>>::Product>>::Output: SumList,
{
    type Product =
        <<R as BlockJoin<LHead>>::Block as Append<<LTail as JoinList<R>>::Product>>::Output;

    unsafe fn join_repr(
        this: &mut ManuallyDrop<Self::Repr>,
        ltag: u8,
        other: &mut ManuallyDrop<R::Repr>,
        rtag: u8,
    ) -> ManuallyDrop<<Self::Product as SumList>::Repr> {
        if ltag == 0 {
            let left = unsafe { ManuallyDrop::take(&mut this.data) };
            let block = unsafe { R::join_block(left.0, other, rtag) };
            unsafe { plant(ManuallyDrop::into_inner(block)) }
        } else {
            let rest = unsafe { LTail::join_repr(&mut this.next, ltag - 1, other, rtag) };
            unsafe { plant(ManuallyDrop::into_inner(rest)) }
        }
    }
}

/// Moves a payload (or a smaller storage nest holding it) to the base of a
/// wider storage nest. Sound because every slot of every nesting level sits
/// at offset 0 and the destination is at least as large as the source; the
/// tag is the caller's problem.
unsafe fn plant<V, R>(value: V) -> ManuallyDrop<R> {
    let mut repr = MaybeUninit::<R>::uninit();
    unsafe {
        repr.as_mut_ptr().cast::<V>().write(value);
        ManuallyDrop::new(repr.assume_init())
    }
}

#[cfg(test)]
mod tests {
    use super::{Flat, Lift, Promote};
    use crate::{args, Args, Sum, T};

    #[derive(Debug, Clone, PartialEq)]
    struct Alef(i32);
    #[derive(Debug, Clone, PartialEq)]
    struct Bet(i32);
    #[derive(Debug, Clone, PartialEq)]
    struct Gimel(i32);
    #[derive(Debug, Clone, PartialEq)]
    struct Heh(i32);
    #[derive(Debug, Clone, PartialEq)]
    struct Vav(i32);
    #[derive(Debug, Clone, PartialEq)]
    struct Zayn(i32);

    #[test]
    fn promotion_lifts_values_and_keeps_tuples_flat() {
        assert_eq!(Promote::<Lift>::promote(5u8), args![5u8]);
        assert_eq!(Promote::<Flat>::promote(args![5u8, true]), args![5u8, true]);
    }

    #[test]
    fn cartesian_join_materializes_only_the_live_pairing() {
        let left: Sum![Alef, Bet, Gimel] = Sum::new(Gimel(3));
        let right: Sum![Heh, Vav, Zayn] = Sum::new(Vav(14));

        let joined: Sum![
            Args![Alef, Heh],
            Args![Alef, Vav],
            Args![Alef, Zayn],
            Args![Bet, Heh],
            Args![Bet, Vav],
            Args![Bet, Zayn],
            Args![Gimel, Heh],
            Args![Gimel, Vav],
            Args![Gimel, Zayn],
        ] = left.join(right);

        assert!(joined.has::<Args![Gimel, Vav], _>());
        let Args((g, (v, ()))) = joined.try_unwrap::<Args![Gimel, Vav], _>().unwrap();
        assert_eq!(g.0 + v.0, 17);
    }

    #[test]
    fn joining_a_sum_with_a_plain_value_pairs_every_alternative() {
        let left: Sum![Alef, Bet, Gimel] = Sum::new(Gimel(3));

        let joined: Sum![Args![Alef, Vav], Args![Bet, Vav], Args![Gimel, Vav]] =
            left.join_args(args![Vav(14)]);

        assert!(joined.has::<Args![Gimel, Vav], _>());
        let Args((g, (v, ()))) = joined.try_unwrap::<Args![Gimel, Vav], _>().unwrap();
        assert_eq!(g.0 + v.0, 17);
    }

    #[test]
    fn joining_a_value_with_a_sum_keeps_it_on_the_left() {
        let right: Sum![Heh, Vav] = Sum::new(Vav(2));
        let joined: Sum![Args![Gimel, Heh], Args![Gimel, Vav]] =
            args![Gimel(40)].join_sum(right);

        assert_eq!(
            joined.get::<Args![Gimel, Vav], _>(),
            Some(&args![Gimel(40), Vav(2)])
        );
    }

    #[test]
    fn product_tags_are_left_major() {
        let left: Sum![u8, bool] = Sum::new(true);
        let right: Sum![i8, i16, i32] = Sum::new(7i16);

        let joined = left.join(right);
        assert!(joined.has::<Args![bool, i16], _>());
        assert_eq!(joined.get::<Args![bool, i16], _>(), Some(&args![true, 7i16]));
    }

    #[test]
    fn join_is_exactly_associative() {
        let a: Sum![u8, bool] = Sum::new(7u8);
        let b: Sum![char] = Sum::new('x');
        let c: Sum![i32, f64] = Sum::new(1.5f64);

        let left = a.clone().join(b.clone()).join_flat(c.clone());
        let right = a.join::<_, _, T![Flat, Flat]>(b.join(c));

        // Bracketing either way yields the same type, tag and fields.
        assert_eq!(left, right);
        assert_eq!(
            left.get::<Args![u8, char, f64], _>(),
            Some(&args![7u8, 'x', 1.5f64])
        );
    }
}
