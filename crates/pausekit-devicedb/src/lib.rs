pub mod error;
pub mod manager;
pub mod model;
pub mod traits;

pub use error::{DeviceError, DeviceResult, ProfileError, ProfileResult};
pub use manager::DeviceManager;
pub use model::{AxisLimits, DeviceProfile, DeviceType};
pub use traits::DeviceProfileProvider;
