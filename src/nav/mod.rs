//! Navigation view state: the public page menu and the dashboard sidebar

pub mod dashboard;
pub mod menu;

pub use dashboard::{NavItem, dashboard_navigation};
pub use menu::{MenuContext, MenuState, MenuUrls};
