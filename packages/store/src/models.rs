//! # Identifiers, credentials and snapshots
//!
//! The store only ever works with canonical values. Everything that arrives
//! from a caller is converted once, at the store boundary, through
//! [`AsRecipeId`] and [`Credential::new`].
//!
//! ## Types
//!
//! | Type | Represents |
//! |------|-----------|
//! | [`RecipeId`] | A recipe identifier in its canonical integer form. Serialized as a bare number so it matches the backend's `/api/favorites/ids` payload. |
//! | [`AsRecipeId`] | Conversion from whatever a caller holds (`i64`, `u32`, `"5"`, a route parameter `String`) into a [`RecipeId`]. Strings that are not integers have no canonical form. |
//! | [`Credential`] | The bearer token of the logged-in user. Opaque; `Debug` output never contains the token. |
//! | [`FavoritesSnapshot`] | An immutable view of the favorite set handed to subscribers and views. |

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Canonical recipe identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(pub i64);

impl RecipeId {
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for RecipeId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl FromStr for RecipeId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(Self)
    }
}

/// Coerce a caller-supplied identifier into a [`RecipeId`].
///
/// Returns `None` when the value has no integer form (`"abc"`, `2.5`, an
/// out-of-range `u64`).
pub trait AsRecipeId {
    fn as_recipe_id(&self) -> Option<RecipeId>;
}

impl AsRecipeId for RecipeId {
    fn as_recipe_id(&self) -> Option<RecipeId> {
        Some(*self)
    }
}

macro_rules! impl_as_recipe_id_for_int {
    ($($t:ty),*) => {
        $(
            impl AsRecipeId for $t {
                fn as_recipe_id(&self) -> Option<RecipeId> {
                    i64::try_from(*self).ok().map(RecipeId)
                }
            }
        )*
    };
}

impl_as_recipe_id_for_int!(i8, i16, i32, i64, u8, u16, u32, u64, isize, usize);

impl AsRecipeId for f64 {
    fn as_recipe_id(&self) -> Option<RecipeId> {
        // i64::MAX is not representable; 2^63 is the first float out of range.
        let in_range = *self >= i64::MIN as f64 && *self < -(i64::MIN as f64);
        if self.fract() == 0.0 && in_range {
            Some(RecipeId(*self as i64))
        } else {
            None
        }
    }
}

impl AsRecipeId for str {
    fn as_recipe_id(&self) -> Option<RecipeId> {
        self.parse().ok()
    }
}

impl AsRecipeId for String {
    fn as_recipe_id(&self) -> Option<RecipeId> {
        self.as_str().as_recipe_id()
    }
}

impl<T: AsRecipeId + ?Sized> AsRecipeId for &T {
    fn as_recipe_id(&self) -> Option<RecipeId> {
        (**self).as_recipe_id()
    }
}

/// Bearer token of the active session.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Credential(String);

impl Credential {
    /// Wrap a token. Blank tokens count as "not logged in" and yield `None`.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }

    pub fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Read-only view of the favorite set at one point in time.
///
/// Cloning is cheap: the id set is shared, and the store copies it before
/// mutating, so a snapshot never changes after it was taken.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FavoritesSnapshot {
    pub ids: Arc<BTreeSet<RecipeId>>,
    /// Whether an authoritative fetch has completed for the current session.
    pub hydrated: bool,
    /// Incremented on every broadcast.
    pub version: u64,
}

impl FavoritesSnapshot {
    pub fn contains(&self, id: impl AsRecipeId) -> bool {
        id.as_recipe_id().is_some_and(|id| self.ids.contains(&id))
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_and_number_ids_agree() {
        assert_eq!("5".as_recipe_id(), Some(RecipeId(5)));
        assert_eq!(" 42 ".to_string().as_recipe_id(), Some(RecipeId(42)));
        assert_eq!(5u32.as_recipe_id(), 5i64.as_recipe_id());
        assert_eq!(7.0f64.as_recipe_id(), Some(RecipeId(7)));
    }

    #[test]
    fn test_ids_without_integer_form() {
        assert_eq!("abc".as_recipe_id(), None);
        assert_eq!("".as_recipe_id(), None);
        assert_eq!(2.5f64.as_recipe_id(), None);
        assert_eq!(f64::NAN.as_recipe_id(), None);
        assert_eq!(f64::INFINITY.as_recipe_id(), None);
        assert_eq!(9223372036854775808.0f64.as_recipe_id(), None);
        assert_eq!((-9223372036854775808.0f64).as_recipe_id(), Some(RecipeId(i64::MIN)));
        assert_eq!(u64::MAX.as_recipe_id(), None);
    }

    #[test]
    fn test_recipe_id_is_a_bare_number_on_the_wire() {
        let ids: Vec<RecipeId> = serde_json::from_str("[3, 7, 9]").unwrap();
        assert_eq!(ids, vec![RecipeId(3), RecipeId(7), RecipeId(9)]);
        assert_eq!(serde_json::to_string(&RecipeId(12)).unwrap(), "12");
    }

    #[test]
    fn test_blank_credential_is_absent() {
        assert!(Credential::new("").is_none());
        assert!(Credential::new("   ").is_none());
        let cred = Credential::new("secret-token").unwrap();
        assert_eq!(cred.token(), "secret-token");
        assert!(!format!("{cred:?}").contains("secret"));
    }

    #[test]
    fn test_snapshot_contains_coerces() {
        let snapshot = FavoritesSnapshot {
            ids: Arc::new([RecipeId(1), RecipeId(2)].into_iter().collect()),
            hydrated: true,
            version: 1,
        };
        assert!(snapshot.contains("2"));
        assert!(snapshot.contains(1u8));
        assert!(!snapshot.contains("x"));
        assert_eq!(snapshot.len(), 2);
    }
}
