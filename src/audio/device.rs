//! Host and output device enumeration.

use cpal::traits::{DeviceTrait, HostTrait};
use tracing::debug;

use crate::error::AudioError;

/// Output device as shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Position in the host's output device list
    pub id: usize,
    pub name: String,
    pub is_default_output: bool,
}

/// Names of the audio hosts compiled into this build
pub fn available_host_names() -> Vec<&'static str> {
    cpal::available_hosts().iter().map(|id| id.name()).collect()
}

/// Default host, or the host whose name matches (case-insensitive)
pub fn select_host(name: Option<&str>) -> Result<cpal::Host, AudioError> {
    let Some(name) = name else {
        return Ok(cpal::default_host());
    };

    let host_id = cpal::available_hosts()
        .into_iter()
        .find(|id| id.name().eq_ignore_ascii_case(name))
        .ok_or_else(|| AudioError::UnknownHost {
            name: name.to_string(),
            available: available_host_names().join(", "),
        })?;

    debug!("Selected audio host {}", host_id.name());
    Ok(cpal::host_from_id(host_id)?)
}

/// Enumerate output devices, ids in enumeration order
pub fn list_output_devices(host: &cpal::Host) -> Result<Vec<DeviceInfo>, AudioError> {
    let default_name = host
        .default_output_device()
        .and_then(|device| device.name().ok());

    let devices = host
        .output_devices()?
        .enumerate()
        .map(|(id, device)| {
            let name = device.name().unwrap_or_else(|_| "Unknown".to_string());
            let is_default_output = default_name.as_deref() == Some(name.as_str());
            DeviceInfo {
                id,
                name,
                is_default_output,
            }
        })
        .collect();

    Ok(devices)
}

/// Output device by id, or the host's default output device
pub fn select_output_device(
    host: &cpal::Host,
    id: Option<usize>,
) -> Result<cpal::Device, AudioError> {
    match id {
        Some(id) => host
            .output_devices()?
            .nth(id)
            .ok_or(AudioError::UnknownDevice(id)),
        None => host
            .default_output_device()
            .ok_or(AudioError::NoDefaultOutputDevice),
    }
}

/// Id of the first device flagged as default output
pub fn default_device_id(devices: &[DeviceInfo]) -> Option<usize> {
    devices
        .iter()
        .find(|device| device.is_default_output)
        .map(|device| device.id)
}
