mod entry;
pub use entry::Entry;

mod favorites;
pub use favorites::Favorites;

mod recipes;
pub use recipes::{RecipeCard, Recipes};

mod tab_layout;
pub use tab_layout::TabLayout;
