use std::ffi::CStr;

use ash::extensions::khr;
use ash::vk;

use super::msaa;
use super::VkInstance;
use crate::RendererError;

/// The physical device, the logical device created from it, the window surface and the single
/// queue used for both skia's rendering and presentation.
pub struct VkDevice {
    pub surface_loader: khr::Surface,
    pub surface: vk::SurfaceKHR,
    pub physical_device: vk::PhysicalDevice,
    pub logical_device: ash::Device,
    pub queue_family_index: u32,
    pub queue: vk::Queue,
    /// Sample counts usable for color attachments, smallest first
    pub supported_sample_counts: Vec<u32>,
}

impl VkDevice {
    /// Takes ownership of `surface`, it is destroyed with the device
    pub fn new(
        instance: &VkInstance,
        surface: vk::SurfaceKHR,
    ) -> Result<Self, RendererError> {
        let surface_loader = khr::Surface::new(&instance.entry, &instance.instance);

        let (physical_device, queue_family_index) =
            match Self::choose_physical_device(&instance.instance, &surface_loader, surface) {
                Ok(Some(choice)) => choice,
                Ok(None) => {
                    unsafe { surface_loader.destroy_surface(surface, None) };
                    return Err(RendererError::NoSuitableDevice);
                }
                Err(e) => {
                    unsafe { surface_loader.destroy_surface(surface, None) };
                    return Err(e.into());
                }
            };

        let properties =
            unsafe { instance.instance.get_physical_device_properties(physical_device) };
        let device_name = unsafe { CStr::from_ptr(properties.device_name.as_ptr()) };
        info!(
            "Using physical device {:?} ({:?}), queue family {}",
            device_name, properties.device_type, queue_family_index
        );

        let supported_sample_counts =
            msaa::sample_counts_from_flags(properties.limits.framebuffer_color_sample_counts);
        info!("Supported sample counts: {:?}", supported_sample_counts);

        let logical_device = match Self::create_logical_device(
            &instance.instance,
            physical_device,
            queue_family_index,
        ) {
            Ok(logical_device) => logical_device,
            Err(e) => {
                unsafe { surface_loader.destroy_surface(surface, None) };
                return Err(e.into());
            }
        };

        let queue = unsafe { logical_device.get_device_queue(queue_family_index, 0) };

        Ok(VkDevice {
            surface_loader,
            surface,
            physical_device,
            logical_device,
            queue_family_index,
            queue,
            supported_sample_counts,
        })
    }

    // Picks the highest scoring device that has a queue family able to draw and present
    fn choose_physical_device(
        instance: &ash::Instance,
        surface_loader: &khr::Surface,
        surface: vk::SurfaceKHR,
    ) -> Result<Option<(vk::PhysicalDevice, u32)>, vk::Result> {
        let physical_devices = unsafe { instance.enumerate_physical_devices()? };

        let mut best: Option<(u32, vk::PhysicalDevice, u32)> = None;
        for physical_device in physical_devices {
            let queue_family_index =
                match Self::find_queue_family(instance, surface_loader, surface, physical_device)? {
                    Some(index) => index,
                    None => continue,
                };

            let properties = unsafe { instance.get_physical_device_properties(physical_device) };
            let score = match properties.device_type {
                vk::PhysicalDeviceType::DISCRETE_GPU => 1000,
                vk::PhysicalDeviceType::INTEGRATED_GPU => 100,
                vk::PhysicalDeviceType::VIRTUAL_GPU => 10,
                _ => 1,
            };

            if best.map_or(true, |(best_score, _, _)| score > best_score) {
                best = Some((score, physical_device, queue_family_index));
            }
        }

        Ok(best.map(|(_, physical_device, queue_family_index)| {
            (physical_device, queue_family_index)
        }))
    }

    fn find_queue_family(
        instance: &ash::Instance,
        surface_loader: &khr::Surface,
        surface: vk::SurfaceKHR,
        physical_device: vk::PhysicalDevice,
    ) -> Result<Option<u32>, vk::Result> {
        let queue_families =
            unsafe { instance.get_physical_device_queue_family_properties(physical_device) };

        for (index, queue_family) in queue_families.iter().enumerate() {
            let index = index as u32;
            if !queue_family.queue_flags.contains(vk::QueueFlags::GRAPHICS) {
                continue;
            }

            let supports_present = unsafe {
                surface_loader.get_physical_device_surface_support(physical_device, index, surface)?
            };

            if supports_present {
                return Ok(Some(index));
            }
        }

        Ok(None)
    }

    fn create_logical_device(
        instance: &ash::Instance,
        physical_device: vk::PhysicalDevice,
        queue_family_index: u32,
    ) -> Result<ash::Device, vk::Result> {
        let queue_priorities = [1.0];
        let queue_create_infos = [vk::DeviceQueueCreateInfo::builder()
            .queue_family_index(queue_family_index)
            .queue_priorities(&queue_priorities)
            .build()];

        let extension_names = [khr::Swapchain::name().as_ptr()];
        let features = vk::PhysicalDeviceFeatures::default();

        let device_create_info = vk::DeviceCreateInfo::builder()
            .queue_create_infos(&queue_create_infos)
            .enabled_extension_names(&extension_names)
            .enabled_features(&features);

        unsafe { instance.create_device(physical_device, &device_create_info, None) }
    }
}

impl Drop for VkDevice {
    fn drop(&mut self) {
        debug!("destroying VkDevice");
        unsafe {
            self.logical_device.destroy_device(None);
            self.surface_loader.destroy_surface(self.surface, None);
        }
        debug!("destroyed VkDevice");
    }
}
