pub mod crypto;
pub mod feed;
pub mod http_client;
pub mod links;
pub mod notes;
pub mod quick_ask;
pub mod quote;
pub mod search;
pub mod settings;
pub mod spotify;
pub mod sports;
pub mod state;
pub mod wallpaper;
pub mod weather;
