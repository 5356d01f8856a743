//! Raw tagged-union storage underlying [`Sum`].
//!
//! An alternative list is a nested pair list built with [`T!`]:
//! `T![A, B, C]` is `(A, (B, (C, ())))`. Its storage is a matching nest of
//! untagged unions:
//!
//! ```rust,no_run
//! # use core::convert::Infallible;
//! # use core::mem::ManuallyDrop;
//! struct Nil(Infallible);
//! #[repr(C)]
//! union Cons<T, Next> {
//!     data: ManuallyDrop<T>,
//!     next: ManuallyDrop<Next>,
//! }
//! ```
//!
//! Every slot of every nesting level sits at offset 0, so converting a sum
//! into another sum over a compatible list is tag arithmetic plus a single
//! payload move.
//!
//! The discriminating tag lives outside this module, in [`Sum`]; nothing
//! here tracks which slot is live. Every operation takes the tag as an
//! argument, and the caller guarantees it names the live slot; there is no
//! runtime check to fall back on.
//!
//! [`Sum`]: crate::sum::Sum
//! [`T!`]: crate::T

use core::{convert::Infallible, mem::ManuallyDrop, ptr};

use crate::tag::{Tag, UInt, UTerm};

/// Terminator of the storage recursion. Uninhabited, like the empty sum.
pub struct Nil(pub(crate) Infallible);

/// One storage level: this level's alternative, or everything after it.
#[repr(C)]
pub union Cons<T, U> {
    pub(crate) data: ManuallyDrop<T>,
    pub(crate) next: ManuallyDrop<U>,
}

/// Implemented by every alternative list; ties the list to its raw storage.
pub trait SumList: Count {
    /// The raw union storage for this list.
    type Repr;

    #[doc(hidden)]
    unsafe fn drop(this: &mut ManuallyDrop<Self::Repr>, tag: u8);
}

impl SumList for () {
    type Repr = Nil;

    unsafe fn drop(_: &mut ManuallyDrop<Nil>, _: u8) {}
}

impl<Head, Tail> SumList for (Head, Tail)
where
    Tail: SumList,
{
    type Repr = Cons<Head, Tail::Repr>;

    unsafe fn drop(this: &mut ManuallyDrop<Self::Repr>, tag: u8) {
        if tag == 0 {
            unsafe { ManuallyDrop::drop(&mut this.data) };
        } else {
            unsafe { Tail::drop(&mut this.next, tag - 1) }
        }
    }
}

/// The length of an alternative list, as a type-level index.
pub trait Count {
    /// The number of alternatives in the list.
    type Count: Tag;
}

impl Count for () {
    type Count = UTerm;
}

impl<Head, Tail> Count for (Head, Tail)
where
    Tail: Count,
{
    type Count = UInt<Tail::Count>;
}

/// Compile-time lookup of the `U`-th alternative.
pub trait At<U: Tag>: SumList {
    /// The alternative at index `U`.
    type Output;
}

impl<Head, Tail> At<UTerm> for (Head, Tail)
where
    Tail: SumList,
{
    type Output = Head;
}

impl<Head, Tail, U> At<UInt<U>> for (Head, Tail)
where
    U: Tag,
    Tail: At<U>,
{
    type Output = Tail::Output;
}

/// The `U`-th alternative of the list `S`.
pub type Nth<S, U> = <S as At<U>>::Output;

/// The remainder list after taking `T` (at index `U`) out of `S`.
pub type Rem<S, T, U> = <S as Split<T, U>>::Remainder;

/// The list `S` with `T` (at index `U`) replaced by `T2`.
pub type Substitute<S, T, T2, U> = <S as Split<T, U>>::Substitute<T2>;

/// Manipulates the alternative `T` at index `U` within the list.
///
/// The index parameter is what keeps this coherent when the same type could
/// occur more than once: callers normally leave it to inference, and
/// inference succeeding is exactly the guarantee that the choice of slot is
/// unambiguous.
pub trait Split<T, U: Tag>: SumList {
    #[doc(hidden)]
    fn from_data(data: T) -> Self::Repr;

    #[doc(hidden)]
    unsafe fn into_data_unchecked(this: Self::Repr) -> T;

    #[doc(hidden)]
    fn as_ptr(this: &Self::Repr) -> *const T;

    #[doc(hidden)]
    fn as_mut_ptr(this: &mut Self::Repr) -> *mut T;

    /// The remainder list after taking `T` out of `Self`.
    type Remainder: SumList;

    /// The list with `T` replaced by `T2` in place.
    type Substitute<T2>: Split<T2, U>;

    /// Maps a tag over the remainder list back into `Self`'s numbering.
    #[doc(hidden)]
    fn from_remainder(tag: u8) -> u8;

    /// Whether `tag` names the `U`-th slot; on mismatch, the tag renumbered
    /// into the remainder list.
    #[doc(hidden)]
    fn try_unwrap(tag: u8) -> Result<(), u8>;
}

impl<Head, Tail> Split<Head, UTerm> for (Head, Tail)
where
    Tail: SumList,
{
    fn from_data(data: Head) -> Self::Repr {
        Cons { data: ManuallyDrop::new(data) }
    }

    unsafe fn into_data_unchecked(this: Self::Repr) -> Head {
        unsafe { ManuallyDrop::into_inner(this.data) }
    }

    fn as_ptr(this: &Self::Repr) -> *const Head {
        let ptr = ptr::addr_of!(this.data).cast::<Head>();
        debug_assert_eq!(ptr.cast(), this as _);
        ptr
    }

    fn as_mut_ptr(this: &mut Self::Repr) -> *mut Head {
        let ptr = ptr::addr_of_mut!(this.data).cast::<Head>();
        debug_assert_eq!(ptr.cast(), this as _);
        ptr
    }

    type Remainder = Tail;
    type Substitute<T2> = (T2, Tail);

    fn from_remainder(tag: u8) -> u8 {
        tag + 1
    }

    fn try_unwrap(tag: u8) -> Result<(), u8> {
        match tag.checked_sub(1) {
            None => Ok(()),
            Some(tag) => Err(tag),
        }
    }
}

impl<Head, Tail, T, U: Tag> Split<T, UInt<U>> for (Head, Tail)
where
    Tail: Split<T, U>,
{
    fn from_data(data: T) -> Self::Repr {
        Cons {
            next: ManuallyDrop::new(Tail::from_data(data)),
        }
    }

    unsafe fn into_data_unchecked(this: Self::Repr) -> T {
        unsafe { Tail::into_data_unchecked(ManuallyDrop::into_inner(this.next)) }
    }

    fn as_ptr(this: &Self::Repr) -> *const T {
        let ptr = unsafe { Tail::as_ptr(&this.next) };
        debug_assert_eq!(ptr.cast(), this as _);
        ptr
    }

    fn as_mut_ptr(this: &mut Self::Repr) -> *mut T {
        let ptr = unsafe { Tail::as_mut_ptr(&mut this.next) };
        debug_assert_eq!(ptr.cast(), this as _);
        ptr
    }

    type Remainder = (Head, <Tail as Split<T, U>>::Remainder);
    type Substitute<T2> = (Head, Tail::Substitute<T2>);

    fn from_remainder(tag: u8) -> u8 {
        if tag < UInt::<U>::VALUE { tag } else { tag + 1 }
    }

    fn try_unwrap(tag: u8) -> Result<(), u8> {
        let cur = UInt::<U>::VALUE;
        match tag.cmp(&cur) {
            core::cmp::Ordering::Equal => Ok(()),
            core::cmp::Ordering::Less => Err(tag),
            core::cmp::Ordering::Greater => Err(tag - 1),
        }
    }
}
