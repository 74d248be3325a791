use serde::{Deserialize, Serialize};

/// The six fixed budget categories. Users cannot add or rename them.
///
/// Declaration order is the registry order used by every report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Gifts,
    FoodAndDinner,
    Decorations,
    Travel,
    Charity,
    SantasWorkshop,
}

const RED: &str = "#C41E3A";
const GREEN: &str = "#165B33";
const GOLD: &str = "#FFD700";

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Gifts,
        Category::FoodAndDinner,
        Category::Decorations,
        Category::Travel,
        Category::Charity,
        Category::SantasWorkshop,
    ];

    /// Stable key used in storage and CSV files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Gifts => "gifts",
            Category::FoodAndDinner => "food_and_dinner",
            Category::Decorations => "decorations",
            Category::Travel => "travel",
            Category::Charity => "charity",
            Category::SantasWorkshop => "santas_workshop",
        }
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Category::Gifts => "Gifts",
            Category::FoodAndDinner => "Food & Dinner",
            Category::Decorations => "Decorations",
            Category::Travel => "Travel",
            Category::Charity => "Charity",
            Category::SantasWorkshop => "Santa's Workshop",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Category::Gifts => "Budget allocated for children's presents",
            Category::FoodAndDinner => "Meals for elves, reindeer feed, holiday feasts",
            Category::Decorations => "North Pole decorations, workshop festive setup",
            Category::Travel => "Sleigh maintenance, reindeer transportation costs",
            Category::Charity => "Community giving, support for those in need",
            Category::SantasWorkshop => "Workshop operations, tools, elf salaries, maintenance",
        }
    }

    /// Hex display color used by chart data.
    pub fn color(&self) -> &'static str {
        match self {
            Category::Gifts | Category::Travel => RED,
            Category::FoodAndDinner | Category::Charity => GREEN,
            Category::Decorations | Category::SantasWorkshop => GOLD,
        }
    }

    /// Parse either the storage key or the display name, ignoring case.
    pub fn from_str(s: &str) -> Option<Self> {
        let needle = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == needle || c.name().to_lowercase() == needle)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
