pub mod jobdtos;
pub mod paymentdtos;
pub mod userdtos;
pub mod walletdtos;
