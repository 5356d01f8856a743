/// Names a [`Sum`](crate::Sum) type by its alternative list.
///
/// # Examples
///
/// ```rust
/// use braid::{Sum, T};
///
/// type Reading = Sum![i32, u32, f64];
/// let r: Reading = Sum::new(42u32);
/// ```
#[macro_export]
macro_rules! Sum {
    [$($t:ty),* $(,)?] => [$crate::Sum::<$crate::T![$($t,)*]>];
}

/// Names a [`Union`](crate::Union) type by its alternative list.
#[macro_export]
macro_rules! Union {
    [$($t:ty),* $(,)?] => [$crate::Union::<$crate::T![$($t,)*]>];
}

/// Names an [`Args`](crate::Args) tuple type by its field list.
#[macro_export]
macro_rules! Args {
    [$($t:ty),* $(,)?] => [$crate::Args::<$crate::T![$($t,)*]>];
}

/// Builds an [`Args`](crate::Args) tuple value from its fields.
///
/// The type-level counterpart is [`Args!`].
///
/// # Examples
///
/// ```rust
/// use braid::{args, Args};
///
/// let pair: Args![i32, f64] = args![42, 0.5];
/// assert_eq!(pair.0, (42, (0.5, ())));
/// ```
#[macro_export]
macro_rules! args {
    [$($v:expr),* $(,)?] => [$crate::Args($crate::t![$($v,)*])];
}

/// Builds a nested pair list *type* from a list of types.
///
/// The value counterpart is [`t!`].
///
/// # Examples
///
/// ```rust
/// use braid::T;
///
/// type List = T![i32, u32, f64];
/// let list: List = (42i32, (42u32, (42.0f64, ())));
/// ```
#[macro_export]
macro_rules! T {
    [] => [()];
    [$head:ty $(, $t:ty)* $(,)?] => [($head, $crate::T!($($t,)*))];
}

/// Builds a nested pair list *value* from a list of values.
///
/// The type counterpart is [`T!`].
///
/// # Examples
///
/// ```rust
/// use braid::t;
///
/// let list: (i32, (u32, (f64, ()))) = t![42i32, 42u32, 42.0f64];
/// ```
#[macro_export]
macro_rules! t {
    [] => [()];
    [$head:expr $(, $t:expr)* $(,)?] => [($head, $crate::t!($($t,)*))];
}
