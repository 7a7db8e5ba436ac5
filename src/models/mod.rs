pub mod chatmodel;
pub mod jobmodel;
pub mod notificationmodel;
pub mod settingsmodel;
pub mod usermodel;
pub mod walletmodels;
