#![allow(non_snake_case)]
use num_traits::{Float, FloatConst, FromPrimitive, NumAssign};
use std::fmt::{Debug, Display, LowerExp};

/// Core traits for internal floating point values.
///
/// This trait defines the arithmetic bounds required of every value handled by
/// the eigensolver.  It is satisfied by the native `f32`/`f64` types and by the
/// 16-bit [`half::f16`] and [`half::bf16`] types.
pub trait CoreFloatT:
    'static
    + Send
    + Float
    + FloatConst
    + NumAssign
    + Default
    + FromPrimitive
    + Display
    + LowerExp
    + Debug
    + Sized
{
}

impl<T> CoreFloatT for T where
    T: 'static
        + Send
        + Float
        + FloatConst
        + NumAssign
        + Default
        + FromPrimitive
        + Display
        + LowerExp
        + Debug
        + Sized
{
}

/// Storage formats understood by the solver.
///
/// The hardware half-float and the IEEE-754 binary16 interchange type share
/// a single bit layout and are both represented by [`half::f16`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatKind {
    /// IEEE-754 binary16 (`half::f16`)
    Binary16,
    /// brain floating point (`half::bf16`)
    BFloat16,
    /// IEEE-754 binary32
    Single,
    /// IEEE-754 binary64
    Double,
}

mod sealed {
    pub trait Sealed {}
}

/// Model parameters of a floating point format.
///
/// Exponents follow the C `FLT_MIN_EXP` / `FLT_MAX_EXP` convention, i.e. a
/// normalized value is `0.d₁d₂…d_t × RADIX^e` with `MIN_EXP <= e <= MAX_EXP`.
/// The derived machine constants are computed from these values by
/// [`MachineParameters`](crate::algebra::MachineParameters).
pub trait FloatFormat: sealed::Sealed {
    const KIND: FormatKind;
    const RADIX: u32;
    /// mantissa digits, including the implicit leading bit
    const DIGITS: u32;
    const MIN_EXP: i32;
    const MAX_EXP: i32;
}

macro_rules! impl_float_format {
    ($ty:ty, $kind:expr, $digits:expr, $emin:expr, $emax:expr) => {
        impl sealed::Sealed for $ty {}
        impl FloatFormat for $ty {
            const KIND: FormatKind = $kind;
            const RADIX: u32 = 2;
            const DIGITS: u32 = $digits;
            const MIN_EXP: i32 = $emin;
            const MAX_EXP: i32 = $emax;
        }
    };
}
impl_float_format!(half::f16, FormatKind::Binary16, 11, -13, 16);
impl_float_format!(half::bf16, FormatKind::BFloat16, 8, -125, 128);
impl_float_format!(f32, FormatKind::Single, 24, -125, 128);
impl_float_format!(f64, FormatKind::Double, 53, -1021, 1024);

/// Main trait for floating point types used by the eigensolver.
///
/// All arithmetic in the crate is written once against `FloatT`.  The format
/// specific constants (epsilon, safe minimum, radix, mantissa bits) are looked
/// up through the type parameter at run time, so the same code serves every
/// supported 16-bit format as well as `f32` and `f64`.
pub trait FloatT: CoreFloatT + FloatFormat {}

impl<T> FloatT for T where T: CoreFloatT + FloatFormat {}

/// Trait for converting Rust primitives to [`FloatT`](crate::algebra::FloatT)
///
/// This convenience trait is implemented on f32/64 and u32/64/usize so that
/// constants can be written as `(0.5).as_T()` rather than
/// `T::from_f64(0.5).unwrap()`.
pub trait AsFloatT<T>: 'static {
    fn as_T(&self) -> T;
}

macro_rules! impl_as_FloatT {
    ($ty:ty, $ident:ident) => {
        impl<T> AsFloatT<T> for $ty
        where
            T: std::ops::Mul<T, Output = T> + FromPrimitive + 'static,
        {
            #[inline]
            fn as_T(&self) -> T {
                T::$ident(*self).unwrap()
            }
        }
    };
}
impl_as_FloatT!(u32, from_u32);
impl_as_FloatT!(u64, from_u64);
impl_as_FloatT!(usize, from_usize);
impl_as_FloatT!(f32, from_f32);
impl_as_FloatT!(f64, from_f64);

#[test]
fn test_format_constants() {
    use half::{bf16, f16};

    assert_eq!(<f16 as FloatFormat>::KIND, FormatKind::Binary16);
    assert_eq!(<bf16 as FloatFormat>::KIND, FormatKind::BFloat16);

    // epsilon is RADIX^(1 - DIGITS) in every format
    fn check<T: FloatT>() {
        let eps = 2f64.powi(1 - T::DIGITS as i32);
        assert_eq!(T::epsilon(), eps.as_T());
    }
    check::<f16>();
    check::<bf16>();
    check::<f32>();
    check::<f64>();
}
