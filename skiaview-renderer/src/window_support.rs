//! What the vulkan renderer needs from a window, independent of the windowing library

use std::os::raw::c_char;

use ash::prelude::VkResult;
use ash::vk;

use super::PhysicalSize;

pub trait Window {
    fn physical_size(&self) -> PhysicalSize;

    /// # Safety
    ///
    /// `instance` must have been created with the extensions returned by `extension_names`, and
    /// the window must outlive the returned surface.
    unsafe fn create_vulkan_surface(
        &self,
        entry: &ash::Entry,
        instance: &ash::Instance,
    ) -> VkResult<vk::SurfaceKHR>;

    /// Instance extensions required to create a surface for this window
    fn extension_names(&self) -> VkResult<Vec<*const c_char>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct HeadlessWindow {
        size: PhysicalSize,
    }

    impl Window for HeadlessWindow {
        fn physical_size(&self) -> PhysicalSize {
            self.size
        }

        unsafe fn create_vulkan_surface(
            &self,
            _entry: &ash::Entry,
            _instance: &ash::Instance,
        ) -> VkResult<vk::SurfaceKHR> {
            Err(vk::Result::ERROR_EXTENSION_NOT_PRESENT)
        }

        fn extension_names(&self) -> VkResult<Vec<*const c_char>> {
            Ok(vec![])
        }
    }

    #[test]
    fn usable_as_trait_object() {
        let window = HeadlessWindow {
            size: PhysicalSize::new(640, 480),
        };
        let window: &dyn Window = &window;
        assert_eq!(window.physical_size(), PhysicalSize::new(640, 480));
        assert!(window.extension_names().unwrap().is_empty());
    }
}
