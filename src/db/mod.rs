pub mod categorydb;
pub mod db;
pub mod jobdb;
pub mod messagedb;
pub mod notificationdb;
pub mod reviewdb;
pub mod settingsdb;
pub mod userdb;
pub mod walletdb;
