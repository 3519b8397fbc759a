pub mod app_settings;
pub mod app_state;
pub mod favorites;
pub mod feed;
pub mod live;
pub mod messages;
pub mod network;
pub mod refresher;
pub mod sources;
pub mod storage;
pub mod view;
