//! Tag-dispatched implementations of the standard traits.
//!
//! Each trait here walks the alternative list the same way
//! [`SumList::drop`] does: compare the tag, act on the head slot, or recurse
//! with the tag decremented. [`Sum`] implements the corresponding standard
//! trait exactly when the matching trait here is implemented, which in turn
//! requires it of every alternative.
//!
//! [`Sum`]: crate::sum::Sum
//! [`SumList::drop`]: crate::repr::SumList

use core::{
    any::{Any, TypeId},
    cmp::Ordering,
    fmt,
    hash::Hasher,
    mem::ManuallyDrop,
};

use crate::repr::{Cons, SumList};

/// Clones the live slot. Requires every alternative to be [`Clone`].
pub trait SumClone: SumList {
    #[doc(hidden)]
    unsafe fn clone(this: &ManuallyDrop<Self::Repr>, tag: u8) -> ManuallyDrop<Self::Repr>;
}

impl SumClone for () {
    unsafe fn clone(this: &ManuallyDrop<Self::Repr>, _: u8) -> ManuallyDrop<Self::Repr> {
        match (**this).0 {}
    }
}

impl<Head, Tail> SumClone for (Head, Tail)
where
    Head: Clone,
    Tail: SumClone,
{
    unsafe fn clone(this: &ManuallyDrop<Self::Repr>, tag: u8) -> ManuallyDrop<Self::Repr> {
        if tag == 0 {
            let data = unsafe { &this.data };
            ManuallyDrop::new(Cons {
                data: ManuallyDrop::new((**data).clone()),
            })
        } else {
            let next = unsafe { Tail::clone(&this.next, tag - 1) };
            ManuallyDrop::new(Cons { next })
        }
    }
}

/// Compares live slots of two sums holding the same alternative.
pub trait SumPartialEq: SumList {
    #[doc(hidden)]
    unsafe fn eq(a: &ManuallyDrop<Self::Repr>, b: &ManuallyDrop<Self::Repr>, tag: u8) -> bool;
}

impl SumPartialEq for () {
    unsafe fn eq(a: &ManuallyDrop<Self::Repr>, _: &ManuallyDrop<Self::Repr>, _: u8) -> bool {
        match (**a).0 {}
    }
}

impl<Head, Tail> SumPartialEq for (Head, Tail)
where
    Head: PartialEq,
    Tail: SumPartialEq,
{
    unsafe fn eq(a: &ManuallyDrop<Self::Repr>, b: &ManuallyDrop<Self::Repr>, tag: u8) -> bool {
        if tag == 0 {
            let (x, y) = unsafe { (&a.data, &b.data) };
            **x == **y
        } else {
            unsafe { Tail::eq(&a.next, &b.next, tag - 1) }
        }
    }
}

pub trait SumPartialOrd: SumPartialEq {
    #[doc(hidden)]
    unsafe fn partial_cmp(
        a: &ManuallyDrop<Self::Repr>,
        b: &ManuallyDrop<Self::Repr>,
        tag: u8,
    ) -> Option<Ordering>;
}

impl SumPartialOrd for () {
    unsafe fn partial_cmp(
        a: &ManuallyDrop<Self::Repr>,
        _: &ManuallyDrop<Self::Repr>,
        _: u8,
    ) -> Option<Ordering> {
        match (**a).0 {}
    }
}

impl<Head, Tail> SumPartialOrd for (Head, Tail)
where
    Head: PartialOrd,
    Tail: SumPartialOrd,
{
    unsafe fn partial_cmp(
        a: &ManuallyDrop<Self::Repr>,
        b: &ManuallyDrop<Self::Repr>,
        tag: u8,
    ) -> Option<Ordering> {
        if tag == 0 {
            let (x, y) = unsafe { (&a.data, &b.data) };
            (**x).partial_cmp(&**y)
        } else {
            unsafe { Tail::partial_cmp(&a.next, &b.next, tag - 1) }
        }
    }
}

pub trait SumOrd: SumPartialOrd {
    #[doc(hidden)]
    unsafe fn cmp(a: &ManuallyDrop<Self::Repr>, b: &ManuallyDrop<Self::Repr>, tag: u8) -> Ordering;
}

impl SumOrd for () {
    unsafe fn cmp(a: &ManuallyDrop<Self::Repr>, _: &ManuallyDrop<Self::Repr>, _: u8) -> Ordering {
        match (**a).0 {}
    }
}

impl<Head, Tail> SumOrd for (Head, Tail)
where
    Head: Ord,
    Tail: SumOrd,
{
    unsafe fn cmp(a: &ManuallyDrop<Self::Repr>, b: &ManuallyDrop<Self::Repr>, tag: u8) -> Ordering {
        if tag == 0 {
            let (x, y) = unsafe { (&a.data, &b.data) };
            (**x).cmp(&**y)
        } else {
            unsafe { Tail::cmp(&a.next, &b.next, tag - 1) }
        }
    }
}

pub trait SumHash: SumList {
    #[doc(hidden)]
    unsafe fn hash<H: Hasher>(this: &ManuallyDrop<Self::Repr>, tag: u8, state: &mut H);
}

impl SumHash for () {
    unsafe fn hash<H: Hasher>(this: &ManuallyDrop<Self::Repr>, _: u8, _: &mut H) {
        match (**this).0 {}
    }
}

impl<Head, Tail> SumHash for (Head, Tail)
where
    Head: core::hash::Hash,
    Tail: SumHash,
{
    unsafe fn hash<H: Hasher>(this: &ManuallyDrop<Self::Repr>, tag: u8, state: &mut H) {
        if tag == 0 {
            let data = unsafe { &this.data };
            (**data).hash(state);
        } else {
            unsafe { Tail::hash(&this.next, tag - 1, state) }
        }
    }
}

pub trait SumDebug: SumList {
    #[doc(hidden)]
    unsafe fn debug<'a>(this: &'a ManuallyDrop<Self::Repr>, tag: u8) -> &'a (dyn fmt::Debug + 'a);
}

impl SumDebug for () {
    unsafe fn debug<'a>(this: &'a ManuallyDrop<Self::Repr>, _: u8) -> &'a (dyn fmt::Debug + 'a) {
        match (**this).0 {}
    }
}

impl<Head, Tail> SumDebug for (Head, Tail)
where
    Head: fmt::Debug,
    Tail: SumDebug,
{
    unsafe fn debug<'a>(this: &'a ManuallyDrop<Self::Repr>, tag: u8) -> &'a (dyn fmt::Debug + 'a) {
        if tag == 0 {
            let data = unsafe { &this.data };
            &**data
        } else {
            unsafe { Tail::debug(&this.next, tag - 1) }
        }
    }
}

pub trait SumDisplay: SumList {
    #[doc(hidden)]
    unsafe fn display<'a>(
        this: &'a ManuallyDrop<Self::Repr>,
        tag: u8,
    ) -> &'a (dyn fmt::Display + 'a);
}

impl SumDisplay for () {
    unsafe fn display<'a>(
        this: &'a ManuallyDrop<Self::Repr>,
        _: u8,
    ) -> &'a (dyn fmt::Display + 'a) {
        match (**this).0 {}
    }
}

impl<Head, Tail> SumDisplay for (Head, Tail)
where
    Head: fmt::Display,
    Tail: SumDisplay,
{
    unsafe fn display<'a>(
        this: &'a ManuallyDrop<Self::Repr>,
        tag: u8,
    ) -> &'a (dyn fmt::Display + 'a) {
        if tag == 0 {
            let data = unsafe { &this.data };
            &**data
        } else {
            unsafe { Tail::display(&this.next, tag - 1) }
        }
    }
}

/// Runtime type identity of the live slot. The library's only type-erased
/// escape hatch, for interop with `Any`-based code.
pub trait TypeMeta: SumList {
    #[doc(hidden)]
    fn type_id(tag: u8) -> TypeId;

    #[doc(hidden)]
    fn type_name(tag: u8) -> &'static str;

    #[doc(hidden)]
    unsafe fn as_any(this: &ManuallyDrop<Self::Repr>, tag: u8) -> &dyn Any;

    #[doc(hidden)]
    unsafe fn as_any_mut(this: &mut ManuallyDrop<Self::Repr>, tag: u8) -> &mut dyn Any;
}

impl TypeMeta for () {
    fn type_id(tag: u8) -> TypeId {
        unreachable!("no alternative for tag {tag}")
    }

    fn type_name(tag: u8) -> &'static str {
        unreachable!("no alternative for tag {tag}")
    }

    unsafe fn as_any(this: &ManuallyDrop<Self::Repr>, _: u8) -> &dyn Any {
        match (**this).0 {}
    }

    unsafe fn as_any_mut(this: &mut ManuallyDrop<Self::Repr>, _: u8) -> &mut dyn Any {
        match (**this).0 {}
    }
}

impl<Head, Tail> TypeMeta for (Head, Tail)
where
    Head: Any,
    Tail: TypeMeta,
{
    fn type_id(tag: u8) -> TypeId {
        if tag == 0 {
            TypeId::of::<Head>()
        } else {
            Tail::type_id(tag - 1)
        }
    }

    fn type_name(tag: u8) -> &'static str {
        if tag == 0 {
            core::any::type_name::<Head>()
        } else {
            Tail::type_name(tag - 1)
        }
    }

    unsafe fn as_any(this: &ManuallyDrop<Self::Repr>, tag: u8) -> &dyn Any {
        if tag == 0 {
            let data = unsafe { &this.data };
            &**data
        } else {
            unsafe { Tail::as_any(&this.next, tag - 1) }
        }
    }

    unsafe fn as_any_mut(this: &mut ManuallyDrop<Self::Repr>, tag: u8) -> &mut dyn Any {
        if tag == 0 {
            let data = unsafe { &mut this.data };
            &mut **data
        } else {
            unsafe { Tail::as_any_mut(&mut this.next, tag - 1) }
        }
    }
}
