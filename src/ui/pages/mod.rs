pub mod cart;
pub mod catalog;
pub mod orders;
pub mod pricing;
pub mod products;
pub mod settings;
pub mod workspace_select;

pub use cart::CartPage;
pub use catalog::CatalogPage;
pub use orders::OrdersPage;
pub use pricing::PricingPage;
pub use products::ProductsPage;
pub use settings::SettingsPage;
pub use workspace_select::WorkspaceSelectPage;
