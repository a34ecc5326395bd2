//! Catalog classification enums.
//!
//! Category and age group arrive from the catalog API as short codes
//! (`"dry"`, `"special_care"`, ...). Missing, empty or unrecognized codes map
//! to the `Unset` variant so a single odd record never fails the whole
//! catalog.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    Dry,
    Wet,
    Snack,
    #[default]
    Unset,
}

impl Category {
    /// All filterable categories, in listing order.
    pub const ALL: [Self; 3] = [Self::Dry, Self::Wet, Self::Snack];

    /// Parse a category code, returning `None` for unknown codes.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "dry" => Some(Self::Dry),
            "wet" => Some(Self::Wet),
            "snack" => Some(Self::Snack),
            _ => None,
        }
    }

    /// The wire code, or `None` when unset.
    #[must_use]
    pub const fn code(&self) -> Option<&'static str> {
        match self {
            Self::Dry => Some("dry"),
            Self::Wet => Some("wet"),
            Self::Snack => Some("snack"),
            Self::Unset => None,
        }
    }

    /// Listing heading for this category.
    #[must_use]
    pub const fn heading(&self) -> &'static str {
        match self {
            Self::Dry => "Dry cat food",
            Self::Wet => "Wet cat food",
            Self::Snack => "Cat snacks",
            Self::Unset => "All products",
        }
    }
}

/// Life stage a product is formulated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AgeGroup {
    Kitten,
    Adult,
    SpecialCare,
    #[default]
    Unset,
}

impl AgeGroup {
    /// All selectable age groups, in listing order.
    pub const ALL: [Self; 3] = [Self::Kitten, Self::Adult, Self::SpecialCare];

    /// Parse an age group code, returning `None` for unknown codes.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "kitten" => Some(Self::Kitten),
            "adult" => Some(Self::Adult),
            "special_care" => Some(Self::SpecialCare),
            _ => None,
        }
    }

    /// The wire code, or `None` when unset.
    #[must_use]
    pub const fn code(&self) -> Option<&'static str> {
        match self {
            Self::Kitten => Some("kitten"),
            Self::Adult => Some("adult"),
            Self::SpecialCare => Some("special_care"),
            Self::Unset => None,
        }
    }
}

/// Marker shown on a product tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    New,
}

macro_rules! impl_code_serde {
    ($name:ident) => {
        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                self.code().serialize(serializer)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let code = Option::<String>::deserialize(deserializer)?;
                Ok(code
                    .as_deref()
                    .and_then(Self::from_code)
                    .unwrap_or_default())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.code().unwrap_or(""))
            }
        }
    };
}

impl_code_serde!(Category);
impl_code_serde!(AgeGroup);
