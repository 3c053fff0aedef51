pub mod device;
pub mod reading;

pub use device::{Device, DeviceType};
pub use reading::Reading;
