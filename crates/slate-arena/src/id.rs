use std::hash::Hash;

/// Position of an item in an [`crate::Arena`].
///
/// Outside this crate ids come from `Arena::alloc`, wrapped in a typed key.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Id(pub(crate) usize);

impl Id {
    /// return raw ID as usize
    pub fn raw(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "%{}", self.0)
    }
}

pub trait Identifier:
    Sized + Clone + Copy + Hash + std::fmt::Debug + PartialEq + Eq + From<Id> + Into<Id>
{
}

/// Declare a typed arena key wrapping [`Id`].
///
/// ```ignore
/// slate_arena::identifier! {
///     /// A node in a function body.
///     struct ExprId
/// }
/// ```
#[macro_export]
macro_rules! identifier {
    ($(#[$attr:meta])* struct $name:ident) => {
        $(#[$attr])*
        #[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
        pub struct $name($crate::Id);

        impl From<$crate::Id> for $name {
            fn from(value: $crate::Id) -> Self {
                Self(value)
            }
        }

        impl From<$name> for $crate::Id {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl $crate::Identifier for $name {}

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Display::fmt(&self.0, f)
            }
        }
    };
}
