//! Operator-forwarding macros for integer newtypes.

/// Forwards the standard arithmetic operator traits to the wrapped integer of a tuple newtype.
///
/// * `binary` - implements a binary operator (e.g. `Add`) returning `Self`.
/// * `inplace` - implements an in-place operator (e.g. `SubAssign`).
/// * `unary` - implements a unary operator (e.g. `Neg`) returning `Self`.
#[macro_export]
macro_rules! op {
    (binary $t:ty, $trait:ident, $method:ident) => {
        impl std::ops::$trait for $t {
            type Output = Self;

            fn $method(self, rhs: Self) -> Self::Output {
                Self(std::ops::$trait::$method(self.0, rhs.0))
            }
        }
    };
    (inplace $t:ty, $trait:ident, $method:ident) => {
        impl std::ops::$trait for $t {
            fn $method(&mut self, rhs: Self) {
                std::ops::$trait::$method(&mut self.0, rhs.0);
            }
        }
    };
    (unary $t:ty, $trait:ident, $method:ident) => {
        impl std::ops::$trait for $t {
            type Output = Self;

            fn $method(self) -> Self::Output {
                Self(std::ops::$trait::$method(self.0))
            }
        }
    };
}
