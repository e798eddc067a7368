pub mod document;
pub mod html;
pub mod money;
pub mod rates_panel;
