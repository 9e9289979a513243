/// Implements the set operators for a type with a single `bits` field.
///
/// Only the bits in `$mask` are ever set, so `!set` stays a valid set.
macro_rules! bitset_traits {
    ($name:ident, $mask:expr) => {
        $crate::bitset::bitset_traits!(@op $name, BitAnd, bitand, BitAndAssign, bitand_assign, &);
        $crate::bitset::bitset_traits!(@op $name, BitOr, bitor, BitOrAssign, bitor_assign, |);
        $crate::bitset::bitset_traits!(@op $name, BitXor, bitxor, BitXorAssign, bitxor_assign, ^);

        impl std::ops::Not for $name {
            type Output = Self;

            fn not(self) -> Self {
                Self {
                    bits: !self.bits & $mask,
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self { bits: 0 }
            }
        }
    };
    (@op $name:ident, $op:ident, $method:ident, $assign:ident, $assign_method:ident, $sym:tt) => {
        impl std::ops::$op for $name {
            type Output = Self;

            fn $method(self, rhs: Self) -> Self {
                Self {
                    bits: self.bits $sym rhs.bits,
                }
            }
        }

        impl std::ops::$assign for $name {
            fn $assign_method(&mut self, rhs: Self) {
                *self = std::ops::$op::$method(*self, rhs);
            }
        }
    };
}
pub(crate) use bitset_traits;
