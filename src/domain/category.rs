//! Domain types representing user-defined categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::common::*;

/// Label shown for notes whose category no longer exists.
pub const FALLBACK_CATEGORY_NAME: &str = "Uncategorized";
/// Color used for notes whose category no longer exists.
pub const FALLBACK_CATEGORY_COLOR: &str = "#000000";

/// A user-defined label referenced by notes through its identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomCategory {
    pub id: String,
    pub name: String,
    pub color: String,
    /// Icon name. Kept as text so documents with unknown icons still load.
    pub icon: String,
}

impl CustomCategory {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        color: impl Into<String>,
        icon: CategoryIcon,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
            icon: icon.as_str().to_string(),
        }
    }

    /// Resolved icon, falling back to the default for unknown names.
    pub fn icon(&self) -> CategoryIcon {
        self.icon.parse().unwrap_or_default()
    }
}

impl Identifiable for CustomCategory {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Displayable for CustomCategory {
    fn display_label(&self) -> String {
        format!("{} ({})", self.name, self.icon())
    }
}

/// Fixed set of icons a category can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CategoryIcon {
    #[default]
    ShoppingBag,
    CupSoda,
    Hamburger,
    Utensils,
    Fuel,
    Game,
    Train,
    Coffee,
    Film,
}

impl CategoryIcon {
    pub const ALL: [CategoryIcon; 9] = [
        CategoryIcon::ShoppingBag,
        CategoryIcon::CupSoda,
        CategoryIcon::Hamburger,
        CategoryIcon::Utensils,
        CategoryIcon::Fuel,
        CategoryIcon::Game,
        CategoryIcon::Train,
        CategoryIcon::Coffee,
        CategoryIcon::Film,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryIcon::ShoppingBag => "ShoppingBag",
            CategoryIcon::CupSoda => "CupSoda",
            CategoryIcon::Hamburger => "Hamburger",
            CategoryIcon::Utensils => "Utensils",
            CategoryIcon::Fuel => "Fuel",
            CategoryIcon::Game => "Game",
            CategoryIcon::Train => "Train",
            CategoryIcon::Coffee => "Coffee",
            CategoryIcon::Film => "Film",
        }
    }
}

impl fmt::Display for CategoryIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryIcon {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        CategoryIcon::ALL
            .into_iter()
            .find(|icon| icon.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| format!("unknown icon `{}`", value))
    }
}

/// Display attributes for a category reference, with fallbacks for dangling ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryLabel {
    pub name: String,
    pub color: String,
    pub icon: CategoryIcon,
}

impl CategoryLabel {
    pub fn resolve(categories: &[CustomCategory], id: &str) -> Self {
        match categories.iter().find(|category| category.id == id) {
            Some(category) => Self {
                name: category.name.clone(),
                color: category.color.clone(),
                icon: category.icon(),
            },
            None => Self::fallback(),
        }
    }

    pub fn fallback() -> Self {
        Self {
            name: FALLBACK_CATEGORY_NAME.into(),
            color: FALLBACK_CATEGORY_COLOR.into(),
            icon: CategoryIcon::default(),
        }
    }
}

/// Returns true for `#rgb` and `#rrggbb` color strings.
pub fn is_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(digits) => {
            matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icon_parsing_is_case_insensitive() {
        assert_eq!("coffee".parse::<CategoryIcon>(), Ok(CategoryIcon::Coffee));
        assert_eq!("CupSoda".parse::<CategoryIcon>(), Ok(CategoryIcon::CupSoda));
        assert!("Rocket".parse::<CategoryIcon>().is_err());
    }

    #[test]
    fn unknown_stored_icon_resolves_to_default() {
        let category = CustomCategory {
            id: "1".into(),
            name: "Misc".into(),
            color: "#ffffff".into(),
            icon: "Rocket".into(),
        };
        assert_eq!(category.icon(), CategoryIcon::ShoppingBag);
    }

    #[test]
    fn label_falls_back_for_missing_category() {
        let categories = vec![CustomCategory::new(
            "food",
            "Food",
            "#ff0000",
            CategoryIcon::Utensils,
        )];
        let known = CategoryLabel::resolve(&categories, "food");
        assert_eq!(known.name, "Food");
        assert_eq!(known.icon, CategoryIcon::Utensils);

        let missing = CategoryLabel::resolve(&categories, "gone");
        assert_eq!(missing, CategoryLabel::fallback());
        assert_eq!(missing.name, "Uncategorized");
        assert_eq!(missing.color, "#000000");
    }

    #[test]
    fn hex_colors_are_validated() {
        assert!(is_hex_color("#000000"));
        assert!(is_hex_color("#FfA"));
        assert!(!is_hex_color("000000"));
        assert!(!is_hex_color("#12345"));
        assert!(!is_hex_color("#gggggg"));
    }
}
