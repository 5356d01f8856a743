//! A restricted sum for duplicate-free alternative lists.
//!
//! [`Union`] is [`Sum`] with the index machinery kept out of sight: its
//! methods are meant for lists where no type occurs twice, so a bare type
//! is always an unambiguous selector and every index parameter is left to
//! inference. Listing a type twice does not make a `Union` malformed, but
//! every type-directed operation on the duplicate becomes ambiguous and
//! fails to compile, which is the invariant enforcing itself.
//!
//! Beyond that discipline it adds nothing over [`Sum`]; [`into_sum`]
//! returns the full-featured entity.
//!
//! [`into_sum`]: Union::into_sum

use core::fmt;
use core::hash::{Hash, Hasher};

use crate::derive;
use crate::repr::{Rem, Split, Substitute, SumList};
use crate::set::{NarrowRem, SplitList};
use crate::sum::Sum;
use crate::tag::Tag;
use crate::visit::{Fold, FoldMut, FoldRef};

/// A sum over a duplicate-free alternative list.
pub struct Union<S: SumList>(Sum<S>);

impl<S: SumList> Union<S> {
    /// Constructs a union from a single value; the alternative is the
    /// value's own type.
    pub fn new<T, U>(value: T) -> Self
    where
        S: Split<T, U>,
        U: Tag,
    {
        Union(Sum::new(value))
    }

    /// Whether the live alternative is `T`.
    pub fn has<T, U>(&self) -> bool
    where
        S: Split<T, U>,
        U: Tag,
    {
        self.0.has::<T, U>()
    }

    /// The live value, if it is a `T`.
    pub fn get<T, U>(&self) -> Option<&T>
    where
        S: Split<T, U>,
        U: Tag,
    {
        self.0.get()
    }

    /// Mutable counterpart of [`get`](Union::get).
    pub fn get_mut<T, U>(&mut self) -> Option<&mut T>
    where
        S: Split<T, U>,
        U: Tag,
    {
        self.0.get_mut()
    }

    /// Takes the value out if it is a `T`, or the union over the remaining
    /// alternatives.
    pub fn try_unwrap<T, U>(self) -> Result<T, Union<Rem<S, T, U>>>
    where
        S: Split<T, U>,
        U: Tag,
    {
        self.0.try_unwrap().map_err(Union)
    }

    /// Applies `f` to the live value if it is a `T`, replacing that
    /// alternative with `T2` in the type either way.
    pub fn map<T, T2, U>(self, f: impl FnOnce(T) -> T2) -> Union<Substitute<S, T, T2, U>>
    where
        S: Split<T, U>,
        U: Tag,
    {
        Union(self.0.map(f))
    }

    /// Widens into a union over a superset of alternatives.
    pub fn broaden<S2, UMap>(self) -> Union<S2>
    where
        S2: SplitList<S, UMap>,
    {
        Union(self.0.broaden())
    }

    /// Narrows into a union over a subset, or the leftover union.
    pub fn narrow<S2, UMap>(self) -> Result<Union<S2>, Union<NarrowRem<S, S2, UMap>>>
    where
        S2: SumList,
        S: SplitList<S2, UMap>,
    {
        self.0.narrow().map(Union).map_err(Union)
    }

    /// Consuming exhaustive dispatch; see [`Sum::fold`].
    pub fn fold<V, Out>(self, visitor: V) -> Out
    where
        S: Fold<V, Out>,
    {
        self.0.fold(visitor)
    }

    /// Borrowing dispatch; see [`Sum::fold_ref`].
    pub fn fold_ref<'a, V, Out>(&'a self, visitor: V) -> Out
    where
        S: FoldRef<'a, V, Out>,
    {
        self.0.fold_ref(visitor)
    }

    /// Mutably borrowing dispatch; see [`Sum::fold_mut`].
    pub fn fold_mut<'a, V, Out>(&'a mut self, visitor: V) -> Out
    where
        S: FoldMut<'a, V, Out>,
    {
        self.0.fold_mut(visitor)
    }

    /// Unwraps into the full-featured sum entity.
    pub fn into_sum(self) -> Sum<S> {
        self.0
    }
}

impl Union<()> {
    /// See [`Sum::unreachable`].
    pub fn unreachable(self) -> ! {
        self.0.unreachable()
    }
}

impl<S: SumList> From<Sum<S>> for Union<S> {
    fn from(sum: Sum<S>) -> Self {
        Union(sum)
    }
}

impl<S: derive::SumClone> Clone for Union<S> {
    fn clone(&self) -> Self {
        Union(self.0.clone())
    }
}

impl<S: derive::SumPartialEq> PartialEq for Union<S> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<S: derive::SumPartialEq + Eq> Eq for Union<S> {}

impl<S: derive::SumHash> Hash for Union<S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state)
    }
}

impl<S: derive::SumDebug> fmt::Debug for Union<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl<S: derive::SumDisplay> fmt::Display for Union<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use crate::Union;

    #[test]
    fn type_directed_surface() {
        let u: Union![u32, bool] = Union::new(7u32);
        assert!(u.has::<u32, _>());
        assert_eq!(u.get::<u32, _>(), Some(&7));
        assert_eq!(u.get::<bool, _>(), None);

        let wide: Union![bool, i8, u32] = u.broaden();
        assert_eq!(wide.get::<u32, _>(), Some(&7));

        let rest = wide.try_unwrap::<i8, _>().unwrap_err();
        assert_eq!(rest.try_unwrap::<u32, _>().ok(), Some(7));
    }

    #[test]
    fn folds_pass_through() {
        let u: Union![i32] = Union::new(20i32);
        assert_eq!(u.fold_ref(|v: &i32| *v + 1), 21);
        assert_eq!(u.fold(|v: i32| v + 22), 42);
    }
}
