pub mod config_download;
pub mod connection;
pub mod health;
pub mod link;
pub mod qr;
pub mod regenerate;
pub mod status;
