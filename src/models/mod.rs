pub mod common;
pub mod consultation;
pub mod payment;
pub mod subscription;
pub mod views;

pub use common::*;
pub use consultation::*;
pub use payment::*;
pub use subscription::*;
pub use views::*;
