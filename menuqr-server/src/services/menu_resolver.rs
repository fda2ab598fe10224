//! Current-menu selection and menu tree assembly
//!
//! Both steps are pure so they can be tested without a database; the queries
//! that feed them live in `db::menus`.

use rust_decimal::Decimal;
use shared::models::{Menu, MenuDish, MenuMeta, MenuSection, MenuTree};

/// One row of the sections ⟕ dishes ⟕ dish_images join
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TreeRow {
    pub section_id: i64,
    pub section_name: String,
    pub dish_id: Option<i64>,
    pub dish_name: Option<String>,
    pub dish_description: Option<String>,
    pub dish_price: Option<Decimal>,
    pub image_id: Option<i64>,
    pub image_url: Option<String>,
}

/// Result of current-menu selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<'a> {
    pub menu: &'a Menu,
    pub is_todays_menu: bool,
    pub is_fallback: bool,
}

/// Pick the menu dated `today`, or else the first (newest) menu.
///
/// `menus` must already be ordered newest first. Returns `None` when empty.
pub fn select_current_menu<'a>(menus: &'a [Menu], today: &str) -> Option<Selection<'a>> {
    if let Some(menu) = menus.iter().find(|m| m.date == today) {
        return Some(Selection {
            menu,
            is_todays_menu: true,
            is_fallback: false,
        });
    }
    menus.first().map(|menu| Selection {
        menu,
        is_todays_menu: false,
        is_fallback: true,
    })
}

impl Selection<'_> {
    pub fn meta(&self, server_date: &str) -> MenuMeta {
        MenuMeta {
            is_todays_menu: self.is_todays_menu,
            is_fallback: self.is_fallback,
            server_date: server_date.to_string(),
            menu_date: self.menu.date.clone(),
        }
    }
}

/// Regroup flat join rows into sections → dishes → image URLs.
///
/// Sections and dishes keep first-seen order and appear once per id; a repeated
/// image id inside a dish is ignored.
pub fn assemble_sections(rows: &[TreeRow]) -> Vec<MenuSection> {
    let mut sections: Vec<MenuSection> = Vec::new();
    // image ids seen per (section index, dish index)
    let mut seen_images: Vec<Vec<Vec<i64>>> = Vec::new();

    for row in rows {
        let s_idx = match sections.iter().position(|s| s.id == row.section_id) {
            Some(i) => i,
            None => {
                sections.push(MenuSection {
                    id: row.section_id,
                    name: row.section_name.clone(),
                    dishes: Vec::new(),
                });
                seen_images.push(Vec::new());
                sections.len() - 1
            }
        };

        let Some(dish_id) = row.dish_id else {
            continue;
        };

        let section = &mut sections[s_idx];
        let d_idx = match section.dishes.iter().position(|d| d.id == dish_id) {
            Some(i) => i,
            None => {
                section.dishes.push(MenuDish {
                    id: dish_id,
                    name: row.dish_name.clone().unwrap_or_default(),
                    description: row.dish_description.clone(),
                    price: row.dish_price.unwrap_or_default(),
                    images: Vec::new(),
                });
                seen_images[s_idx].push(Vec::new());
                section.dishes.len() - 1
            }
        };

        if let (Some(image_id), Some(url)) = (row.image_id, &row.image_url) {
            let seen = &mut seen_images[s_idx][d_idx];
            if !seen.contains(&image_id) {
                seen.push(image_id);
                section.dishes[d_idx].images.push(url.clone());
            }
        }
    }

    sections
}

/// Full tree for a menu; `meta` is only set by current-menu resolution.
pub fn build_tree(menu: &Menu, rows: &[TreeRow], meta: Option<MenuMeta>) -> MenuTree {
    MenuTree {
        id: menu.id,
        name: menu.name.clone(),
        date: menu.date.clone(),
        sections: assemble_sections(rows),
        meta,
    }
}
