pub mod html;
pub mod terminal;
pub mod theme;
