pub mod axe_cli;
pub mod command;
pub mod http_client;
pub mod pa11y_cli;
pub mod sitemap;
pub mod static_browser;
