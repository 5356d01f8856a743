#![doc = include_str!("../README.md")]
#![no_std]
#![deny(future_incompatible)]
#![deny(rust_2018_idioms)]

#[cfg(test)]
extern crate std;

mod macros;

pub mod args;
pub mod derive;
pub mod join;
pub mod repr;
pub mod set;
pub mod sum;
pub mod tag;
pub mod union;
pub mod visit;

pub use braid_macros::match_sum;

pub use self::args::Args;
pub use self::repr::{Rem, Substitute};
pub use self::set::NarrowRem;
pub use self::sum::Sum;
pub use self::union::Union;

/// The raw storage behind a sum over the alternative list `S`.
pub type Repr<S> = <S as repr::SumList>::Repr;
