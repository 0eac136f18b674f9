use crate::error::{DeviceError, DeviceResult};
use crate::model::{DeviceProfile, DeviceType};

/// Source of printer profiles
pub trait DeviceProfileProvider {
    /// Look a profile up by id, or by name ignoring case
    fn get_profile(&self, id: &str) -> Option<DeviceProfile>;

    /// All known profiles
    fn list_profiles(&self) -> Vec<DeviceProfile>;

    /// Build height of the profile `id`
    ///
    /// Profiles that are not 3D printers still answer, with a warning.
    fn machine_height(&self, id: &str) -> DeviceResult<f64> {
        let profile = self
            .get_profile(id)
            .ok_or_else(|| DeviceError::ProfileNotFound(id.to_string()))?;

        if profile.device_type != DeviceType::ThreeDPrinter {
            tracing::warn!(
                profile = %profile.name,
                device_type = %profile.device_type,
                "profile is not a 3D printer, using its Z travel as build height"
            );
        }

        Ok(profile.machine_height())
    }
}
