/// Implements `as_str`, `FromStr` and `Display` for a fieldless preference
/// enum from its snake_case names. Unknown strings are rejected with
/// `LibraryError::InvalidInput` naming `$field`.
macro_rules! string_enum {
    ($ty:ident, $field:literal { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            /// Stable snake_case name, as stored in preferences.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $name,)+
                }
            }
        }

        impl std::str::FromStr for $ty {
            type Err = $crate::error::LibraryError;

            fn from_str(s: &str) -> $crate::error::Result<Self> {
                match s.trim().to_lowercase().as_str() {
                    $($name => Ok($ty::$variant),)+
                    _ => Err($crate::error::LibraryError::InvalidInput {
                        field: $field.to_string(),
                        message: format!("unknown value '{}'", s),
                    }),
                }
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }
    };
}
