pub mod footer_pages;
pub mod menus;
pub mod pages;
pub mod products;
pub mod site;
