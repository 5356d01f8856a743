//! The sum entity: storage plus the tag that names the live alternative.

use core::{
    any::{Any, TypeId},
    fmt,
    hash::{Hash, Hasher},
    mem::{self, ManuallyDrop, MaybeUninit},
    ops::{Deref, DerefMut},
    ptr,
};

use crate::args::Args;
use crate::derive;
use crate::join::{Flat, JoinList, Product, PromoteList, Promoted};
use crate::repr::{self, Count, Rem, Split, Substitute, SumList};
use crate::set::{NarrowRem, SplitList};
use crate::tag::{Tag, UTerm};
use crate::visit::{Fold, FoldCollapse, FoldMut, FoldRef};

/// A value holding exactly one alternative out of the list `S`.
///
/// `S` is a [`T!`]-style list; name the whole type with
/// [`Sum!`](crate::Sum!). The tag is the only record of which slot is
/// live, and every operation dispatches on it at a fixed, compile-time
/// known set of alternatives.
///
/// [`T!`]: crate::T
pub struct Sum<S: repr::SumList> {
    tag: u8,
    data: ManuallyDrop<crate::Repr<S>>,
}

impl<T> From<T> for Sum<(T, ())> {
    /// Constructs a single-alternative sum from its value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use braid::{Sum, T};
    ///
    /// let s: Sum![i32] = 42.into();
    /// assert_eq!(*s, 42);
    /// ```
    fn from(value: T) -> Self {
        Sum::new(value)
    }
}

impl<T> Deref for Sum<(T, ())> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        unsafe { &*<(T, ()) as Split<T, UTerm>>::as_ptr(&self.data) }
    }
}

impl<T> DerefMut for Sum<(T, ())> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        unsafe { &mut *<(T, ()) as Split<T, UTerm>>::as_mut_ptr(&mut self.data) }
    }
}

impl<T: PartialEq> PartialEq<T> for Sum<(T, ())> {
    fn eq(&self, other: &T) -> bool {
        **self == *other
    }
}

impl<T> Sum<(T, ())> {
    /// Unwraps the single alternative.
    pub fn into_inner(self) -> T {
        unsafe {
            let this = ManuallyDrop::new(self);
            mem::transmute_copy(&this.data)
        }
    }
}

impl Sum<()> {
    /// An empty sum cannot be constructed, so holding one proves the
    /// surrounding code unreachable.
    pub fn unreachable(self) -> ! {
        match self.data.0 {}
    }
}

impl<S: repr::SumList> Sum<S> {
    /// Constructs a sum holding `value` as the alternative `T`.
    ///
    /// The slot index is inferred; spell the alternative out as a selector
    /// (`Sum::new::<T, _>(value)`) when the value alone does not pick one.
    pub fn new<T, U>(value: T) -> Self
    where
        S: Split<T, U>,
        U: Tag,
    {
        Sum {
            tag: U::VALUE,
            data: ManuallyDrop::new(S::from_data(value)),
        }
    }

    /// Whether the live alternative is exactly `T`.
    pub fn has<T, U>(&self) -> bool
    where
        S: Split<T, U>,
        U: Tag,
    {
        self.tag == U::VALUE
    }

    /// The live value, if its alternative is exactly `T`.
    ///
    /// This is the one runtime-checked accessor: absence is `None`, never a
    /// fault.
    pub fn get<T, U>(&self) -> Option<&T>
    where
        S: Split<T, U>,
        U: Tag,
    {
        (self.tag == U::VALUE).then(|| unsafe { &*S::as_ptr(&self.data) })
    }

    /// Mutable counterpart of [`get`](Sum::get).
    pub fn get_mut<T, U>(&mut self) -> Option<&mut T>
    where
        S: Split<T, U>,
        U: Tag,
    {
        (self.tag == U::VALUE).then(|| unsafe { &mut *S::as_mut_ptr(&mut self.data) })
    }

    /// Whether the live alternative is exactly `T` and equals `value`.
    pub fn value_eq<T, U>(&self, value: &T) -> bool
    where
        S: Split<T, U>,
        U: Tag,
        T: PartialEq,
    {
        matches!(self.get::<T, U>(), Some(live) if live == value)
    }

    /// Peeks at the live value if it is a `T`, then yields the sum back.
    pub fn inspect<T, U, F>(self, f: F) -> Self
    where
        S: Split<T, U>,
        U: Tag,
        F: FnOnce(&T),
    {
        if let Some(value) = self.get() {
            f(value);
        }
        self
    }

    /// Mutable counterpart of [`inspect`](Sum::inspect).
    pub fn inspect_mut<T, U, F>(mut self, f: F) -> Self
    where
        S: Split<T, U>,
        U: Tag,
        F: FnOnce(&mut T),
    {
        if let Some(value) = self.get_mut() {
            f(value);
        }
        self
    }
}

impl<S: repr::SumList> Sum<S> {
    /// Takes the value out if the live alternative is `T`; otherwise
    /// returns the sum renumbered over the remaining alternatives.
    pub fn try_unwrap<T, U>(self) -> Result<T, Sum<Rem<S, T, U>>>
    where
        S: Split<T, U>,
        U: Tag,
    {
        let mut this = ManuallyDrop::new(self);
        match S::try_unwrap(this.tag) {
            Ok(()) => Ok(unsafe { S::into_data_unchecked(ManuallyDrop::take(&mut this.data)) }),
            Err(tag) => unsafe {
                let data = mem::transmute_copy(&this.data);
                Err(Sum { tag, data })
            },
        }
    }

    /// Applies `f` to the live value if its alternative is `T`, replacing
    /// that alternative with `T2` in the type either way.
    pub fn map<T, T2, U>(self, f: impl FnOnce(T) -> T2) -> Sum<Substitute<S, T, T2, U>>
    where
        S: Split<T, U>,
        U: Tag,
    {
        let mut this = ManuallyDrop::new(self);
        let tag = this.tag;
        match S::try_unwrap(tag) {
            Ok(()) => {
                let data = f(unsafe { S::into_data_unchecked(ManuallyDrop::take(&mut this.data)) });
                let data = <Substitute<S, T, T2, U> as Split<T2, U>>::from_data(data);
                Sum {
                    tag,
                    data: ManuallyDrop::new(data),
                }
            }
            Err(_) => unsafe {
                // The live alternative sits in both lists; the two reprs may
                // differ in size, so copy only the bytes both have room for.
                let mut data =
                    MaybeUninit::<ManuallyDrop<crate::Repr<Substitute<S, T, T2, U>>>>::uninit();
                let count = mem::size_of::<crate::Repr<S>>()
                    .min(mem::size_of::<crate::Repr<Substitute<S, T, T2, U>>>());
                ptr::copy_nonoverlapping(
                    ptr::addr_of!(this.data).cast::<u8>(),
                    data.as_mut_ptr().cast::<u8>(),
                    count,
                );
                Sum { tag, data: data.assume_init() }
            },
        }
    }
}

impl<S: repr::SumList> Sum<S> {
    /// Widens into a sum over a superset of alternatives.
    ///
    /// The live alternative never changes, only the set of representable
    /// ones; the payload is moved once and the tag remapped.
    pub fn broaden<S2, UMap>(self) -> Sum<S2>
    where
        S2: SplitList<S, UMap>,
    {
        unsafe {
            let tag = <S2 as SplitList<S, UMap>>::broaden_tag(self.tag);
            let mut data = MaybeUninit::<crate::Repr<S2>>::uninit();
            data.as_mut_ptr()
                .cast::<ManuallyDrop<crate::Repr<S>>>()
                .write(ptr::read(&self.data));

            mem::forget(self);
            let data = data.assume_init();

            Sum {
                tag,
                data: ManuallyDrop::new(data),
            }
        }
    }

    /// Narrows into a sum over a subset of alternatives, or returns the sum
    /// renumbered over the leftover alternatives if the live one is not in
    /// the subset.
    pub fn narrow<S2, UMap>(self) -> Result<Sum<S2>, Sum<NarrowRem<S, S2, UMap>>>
    where
        S2: SumList,
        S: SplitList<S2, UMap>,
    {
        let this = ManuallyDrop::new(self);
        match <S as SplitList<S2, UMap>>::narrow_tag(this.tag) {
            Ok(tag) => unsafe {
                let data = mem::transmute_copy(&this.data);
                Ok(Sum { tag, data })
            },
            Err(tag) => unsafe {
                let data = mem::transmute_copy(&this.data);
                Err(Sum { tag, data })
            },
        }
    }

    /// Converts between sums naming the same alternatives in different
    /// orders. A pure tag remap; the payload moves once.
    ///
    /// Reordering is the library's normal form for "these two declarations
    /// mean the same sum": it is the identity on the declared order,
    /// mutually inverse across orders, and oblivious to the live value.
    pub fn reorder<S2, UMap>(self) -> Sum<S2>
    where
        S2: SplitList<S, UMap> + Count<Count = <S as Count>::Count>,
    {
        self.broaden()
    }
}

impl<S: repr::SumList> Sum<S> {
    /// Consumes the sum, dispatching the live value to `visitor`.
    ///
    /// The visitor must handle every alternative by value and agree on one
    /// output type; see [`visit`](crate::visit).
    pub fn fold<V, Out>(self, visitor: V) -> Out
    where
        S: Fold<V, Out>,
    {
        let mut this = ManuallyDrop::new(self);
        let tag = this.tag;
        unsafe { S::fold(&mut this.data, tag, visitor) }
    }

    /// Dispatches `&T` for the live alternative to `visitor`.
    pub fn fold_ref<'a, V, Out>(&'a self, visitor: V) -> Out
    where
        S: FoldRef<'a, V, Out>,
    {
        unsafe { S::fold_ref(&self.data, self.tag, visitor) }
    }

    /// Dispatches `&mut T` for the live alternative to `visitor`.
    pub fn fold_mut<'a, V, Out>(&'a mut self, visitor: V) -> Out
    where
        S: FoldMut<'a, V, Out>,
    {
        unsafe { S::fold_mut(&mut self.data, self.tag, visitor) }
    }

    /// Consuming dispatch whose branches may return different types: each
    /// branch result is widened into the merged sum `R`.
    ///
    /// `R` is fixed by the call site (annotation or inference from use); a
    /// branch returning a sum contributes all of its alternatives, any
    /// other branch contributes its result type. See
    /// [`Embed`](crate::visit::Embed).
    pub fn collapse<V, R, M>(self, visitor: V) -> Sum<R>
    where
        R: SumList,
        S: FoldCollapse<V, R, M>,
    {
        let mut this = ManuallyDrop::new(self);
        let tag = this.tag;
        unsafe { S::fold_collapse(&mut this.data, tag, visitor) }
    }
}

impl<S: repr::SumList> Sum<S> {
    /// Joins with another sum: the result holds the pairing of the two live
    /// alternatives, typed as the sum of every pairwise combination.
    ///
    /// Alternatives are promoted to argument tuples first ([`Lift`] for
    /// plain values, [`Flat`] for existing [`Args`]); the marker lists `M1`
    /// and `M2` are inferred for plain alternatives and spelled out where
    /// an alternative is already an `Args` (see [`join_flat`] for the
    /// common chained case).
    ///
    /// [`Lift`]: crate::join::Lift
    /// [`Flat`]: crate::join::Flat
    /// [`join_flat`]: Sum::join_flat
    pub fn join<S2, M1, M2>(self, other: Sum<S2>) -> Sum<Product<Promoted<S, M1>, Promoted<S2, M2>>>
    where
        S: PromoteList<M1>,
        S2: PromoteList<M2>,
        Promoted<S, M1>: JoinList<Promoted<S2, M2>>,
    {
        let mut this = ManuallyDrop::new(self);
        let mut that = ManuallyDrop::new(other);
        let (ltag, rtag) = (this.tag, that.tag);
        unsafe {
            let mut left = S::promote_repr(&mut this.data, ltag);
            let mut right = S2::promote_repr(&mut that.data, rtag);
            let data = <Promoted<S, M1> as JoinList<Promoted<S2, M2>>>::join_repr(
                &mut left, ltag, &mut right, rtag,
            );
            let width = <<Promoted<S2, M2> as Count>::Count as Tag>::VALUE;
            Sum { tag: ltag * width + rtag, data }
        }
    }

    /// [`join`](Sum::join) for a left operand whose alternatives are
    /// already argument tuples (the usual shape when chaining joins), so
    /// no promotion markers are needed for it.
    pub fn join_flat<S2, M2>(self, other: Sum<S2>) -> Sum<Product<S, Promoted<S2, M2>>>
    where
        S2: PromoteList<M2>,
        S: JoinList<Promoted<S2, M2>>,
    {
        let mut this = ManuallyDrop::new(self);
        let mut that = ManuallyDrop::new(other);
        let (ltag, rtag) = (this.tag, that.tag);
        unsafe {
            let mut right = S2::promote_repr(&mut that.data, rtag);
            let data =
                <S as JoinList<Promoted<S2, M2>>>::join_repr(&mut this.data, ltag, &mut right, rtag);
            let width = <<Promoted<S2, M2> as Count>::Count as Tag>::VALUE;
            Sum { tag: ltag * width + rtag, data }
        }
    }

    /// Joins with a plain tuple: every alternative gets `other`'s fields
    /// appended on the right.
    pub fn join_args<R, M1>(self, other: Args<R>) -> Sum<Product<Promoted<S, M1>, (Args<R>, ())>>
    where
        S: PromoteList<M1>,
        Promoted<S, M1>: JoinList<(Args<R>, ())>,
    {
        self.join::<(Args<R>, ()), M1, (Flat, ())>(Sum::from(other))
    }
}

impl<S: repr::SumList> Sum<S> {
    /// The [`TypeId`] of the live alternative.
    pub fn type_id(&self) -> TypeId
    where
        S: derive::TypeMeta,
    {
        S::type_id(self.tag)
    }

    /// The type name of the live alternative, for diagnostics only.
    pub fn type_name(&self) -> &'static str
    where
        S: derive::TypeMeta,
    {
        S::type_name(self.tag)
    }

    /// The live value, type-erased.
    pub fn as_any(&self) -> &dyn Any
    where
        S: derive::TypeMeta,
    {
        unsafe { S::as_any(&self.data, self.tag) }
    }

    /// Mutable counterpart of [`as_any`](Sum::as_any).
    pub fn as_any_mut(&mut self) -> &mut dyn Any
    where
        S: derive::TypeMeta,
    {
        unsafe { S::as_any_mut(&mut self.data, self.tag) }
    }
}

impl<S: repr::SumList> Drop for Sum<S> {
    fn drop(&mut self) {
        unsafe { S::drop(&mut self.data, self.tag) }
    }
}

impl<S: derive::SumClone> Clone for Sum<S> {
    fn clone(&self) -> Self {
        Sum {
            tag: self.tag,
            data: unsafe { S::clone(&self.data, self.tag) },
        }
    }
}

impl<S: derive::SumPartialEq> PartialEq for Sum<S> {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag && unsafe { S::eq(&self.data, &other.data, self.tag) }
    }
}

impl<S: derive::SumPartialEq + Eq> Eq for Sum<S> {}

impl<S: derive::SumPartialOrd> PartialOrd for Sum<S> {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        match self.tag.cmp(&other.tag) {
            core::cmp::Ordering::Equal => unsafe {
                S::partial_cmp(&self.data, &other.data, self.tag)
            },
            other => Some(other),
        }
    }
}

impl<S: derive::SumOrd + Eq> Ord for Sum<S> {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.tag
            .cmp(&other.tag)
            .then_with(|| unsafe { S::cmp(&self.data, &other.data, self.tag) })
    }
}

impl<S: derive::SumHash> Hash for Sum<S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tag.hash(state);
        unsafe { S::hash(&self.data, self.tag, state) }
    }
}

impl<S: derive::SumDebug> fmt::Debug for Sum<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", unsafe { S::debug(&self.data, self.tag) })
    }
}

impl<S: derive::SumDisplay> fmt::Display for Sum<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", unsafe { S::display(&self.data, self.tag) })
    }
}

#[cfg(test)]
mod tests {
    use core::sync::atomic::{AtomicI64, Ordering::Relaxed};
    use std::format;
    use std::string::{String, ToString};

    use crate::{Sum, T};

    #[test]
    fn identity_round_trip() {
        let s: Sum![i32] = Sum::new(42);
        assert!(s.has::<i32, _>());
        assert_eq!(s.get::<i32, _>(), Some(&42));
        assert_eq!(s.fold(|v: i32| v), 42);
    }

    #[test]
    fn single_alternative_conveniences() {
        let mut s: Sum![i32] = 42.into();
        assert_eq!(*s, 42);
        assert_eq!(s, 42);
        *s -= 1;
        assert_eq!(s.into_inner(), 41);
    }

    #[test]
    fn equality_compares_live_alternative_and_value() {
        let a: Sum![bool, i32] = Sum::new(42);
        let b: Sum![bool, i32] = Sum::new(42);
        let c: Sum![bool, i32] = Sum::new(41);
        let d: Sum![bool, i32] = Sum::new(true);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);

        assert!(a.value_eq(&42i32));
        assert!(!a.value_eq(&41i32));
        assert!(!a.value_eq(&true));
        assert!(!d.value_eq(&42i32));
    }

    #[test]
    fn broaden_and_narrow_round_trip() {
        let sum: Sum![u32] = 12345.into();
        assert_eq!(sum.get(), Some(&12345));

        let mut sum: Sum![u32, String] = sum.broaden();
        assert_eq!(sum.get::<u32, _>(), Some(&12345));
        assert_eq!(sum.get::<String, _>(), None);

        sum = Sum::new("Hello World!".to_string());
        let sum: Sum![bool, u32, String] = sum.broaden();
        assert_eq!(sum.get::<String, _>(), Some(&"Hello World!".to_string()));

        let sum: Sum![u32, String] = sum.narrow().unwrap();
        let sum: Sum![String] = sum.narrow::<T![u32], _>().unwrap_err();
        assert_eq!(*sum, "Hello World!");
    }

    #[test]
    fn reorder_is_order_independent_and_idempotent() {
        let a: Sum![u32, bool] = Sum::new(7u32);

        let b: Sum![bool, u32] = a.clone().reorder();
        assert!(b.has::<u32, _>());
        assert_eq!(b.get::<u32, _>(), Some(&7));

        let c: Sum![u32, bool] = b.reorder();
        assert_eq!(a, c);

        // Reordering to the declared order is the identity.
        let d: Sum![u32, bool] = c.reorder();
        assert_eq!(a, d);
    }

    #[test]
    fn map_substitutes_one_alternative() {
        let s: Sum![u8, bool] = Sum::new(7u8);
        let mapped: Sum![i32, bool] = s.map(|v: u8| i32::from(v) * 6);
        assert_eq!(mapped.get::<i32, _>(), Some(&42));

        let s: Sum![u8, bool] = Sum::new(true);
        let mapped: Sum![i32, bool] = s.map(|v: u8| i32::from(v));
        assert_eq!(mapped.get::<bool, _>(), Some(&true));
    }

    #[test]
    fn try_unwrap_renumbers_the_leftovers() {
        let s: Sum![u8, bool, u32] = Sum::new(99u32);
        let rest: Sum![u8, u32] = s.try_unwrap::<bool, _>().unwrap_err();
        assert_eq!(rest.try_unwrap::<u32, _>(), Ok(99));
    }

    #[test]
    fn inspection_does_not_disturb_the_value() {
        let mut seen = 0;
        let s: Sum![i32, bool] = Sum::new(5i32);
        let s = s.inspect(|v: &i32| seen = *v);
        assert_eq!(seen, 5);
        let s = s.inspect_mut(|v: &mut i32| *v *= 2);
        assert_eq!(s.get::<i32, _>(), Some(&10));
    }

    #[test]
    fn ordering_is_tag_major() {
        let a: Sum![u8, i32] = Sum::new(200u8);
        let b: Sum![u8, i32] = Sum::new(-5i32);
        let c: Sum![u8, i32] = Sum::new(100u8);

        assert!(a < b);
        assert!(c < a);
        assert_eq!(c.cmp(&a), core::cmp::Ordering::Less);
    }

    #[test]
    fn equal_sums_hash_alike() {
        use core::hash::{Hash, Hasher};
        use std::collections::hash_map::DefaultHasher;

        fn digest<H: Hash>(value: &H) -> u64 {
            let mut hasher = DefaultHasher::new();
            value.hash(&mut hasher);
            hasher.finish()
        }

        let a: Sum![bool, i32] = Sum::new(42);
        let b: Sum![bool, i32] = Sum::new(42);
        let c: Sum![bool, i32] = Sum::new(true);

        assert_eq!(digest(&a), digest(&b));
        assert_ne!(digest(&a), digest(&c));
    }

    #[test]
    fn debug_and_display_delegate_to_the_live_alternative() {
        let s: Sum![u8, i32] = Sum::new(7i32);
        assert_eq!(format!("{s:?}"), "7");
        assert_eq!(format!("{s}"), "7");
    }

    #[test]
    fn type_metadata_of_the_live_alternative() {
        let mut s: Sum![u8, bool] = Sum::new(true);
        assert_eq!(s.type_id(), core::any::TypeId::of::<bool>());
        assert!(s.type_name().contains("bool"));
        assert!(s.as_any().downcast_ref::<bool>().is_some());

        *s.as_any_mut().downcast_mut::<bool>().unwrap() = false;
        assert_eq!(s.get::<bool, _>(), Some(&false));
    }

    static LIVE: AtomicI64 = AtomicI64::new(0);

    struct Probe;

    impl Probe {
        fn new() -> Self {
            LIVE.fetch_add(1, Relaxed);
            Probe
        }
    }

    impl Clone for Probe {
        fn clone(&self) -> Self {
            Probe::new()
        }
    }

    impl Drop for Probe {
        fn drop(&mut self) {
            LIVE.fetch_sub(1, Relaxed);
        }
    }

    #[test]
    fn every_construction_path_drops_exactly_once() {
        for _ in 0..16 {
            let s: Sum![Probe, u8] = Sum::new(Probe::new());
            let c = s.clone();

            let wide: Sum![u8, Probe, bool] = c.broaden();
            drop(wide);

            let moved = s;
            let taken = moved.try_unwrap::<Probe, _>().unwrap();
            drop(taken);
        }
        assert_eq!(LIVE.load(Relaxed), 0);
    }
}
