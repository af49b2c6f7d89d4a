//! Leaf diffs: equal means no reversion, different means overwrite.

use crate::lens::Lens;
use crate::reverter::Reverter;
use crate::reversion::Reversion;
use crate::revertible::Revertible;

macro_rules! impl_revertible_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Revertible for $ty {
                fn reversion_to(&self, previous: &Self) -> Option<Reversion<Self>> {
                    if self == previous {
                        None
                    } else {
                        Some(Reversion::overwrite(previous.clone()))
                    }
                }
            }
        )*
    };
}

impl_revertible_scalar!(
    bool, char, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64,
);

/// `Option` is the simplest sum type: same case diffs the payload, a case
/// change overwrites the whole value.
impl<T: Revertible> Revertible for Option<T> {
    fn reversion_to(&self, previous: &Self) -> Option<Reversion<Self>> {
        let mut reverter = Reverter::new();
        match (self, previous) {
            (Some(current), Some(prev)) => {
                reverter.field(
                    current,
                    prev,
                    Lens::case(
                        |o: &Option<T>| o.as_ref(),
                        |o: &mut Option<T>| o.as_mut(),
                    ),
                );
            }
            (None, None) => {}
            _ => reverter.replace(previous),
        }
        reverter.finish()
    }
}

impl<T: Revertible> Revertible for Box<T> {
    fn reversion_to(&self, previous: &Self) -> Option<Reversion<Self>> {
        let lens: Lens<Box<T>, T> = Lens::field(|b| &**b, |b| &mut **b);
        (**self)
            .reversion_to(previous)
            .map(|reversion| reversion.project(&lens))
    }
}
