use std::ffi::CStr;
use std::os::raw::c_char;

use ash::extensions::ext::DebugUtils;
use ash::vk;

use super::VkDebugReporter;
use crate::RendererError;

const APP_NAME: &[u8] = b"skiaview\0";
const VALIDATION_LAYER_NAME: &[u8] = b"VK_LAYER_KHRONOS_validation\0";

/// Create one of these at startup. It lives as long as the renderer.
pub struct VkInstance {
    pub entry: ash::Entry,
    pub instance: ash::Instance,
    pub debug_reporter: Option<VkDebugReporter>,
}

impl VkInstance {
    /// Creates a vulkan instance with the extensions the window needs. The validation layer is
    /// only enabled if requested and actually installed.
    pub fn new(
        window_extensions: &[*const c_char],
        use_validation_layer: bool,
    ) -> Result<VkInstance, RendererError> {
        // This loads the dll/so if needed
        info!("Find vulkan entry point");
        let entry = unsafe { ash::Entry::load()? };

        let app_name = cstr(APP_NAME);
        let validation_layer_name = cstr(VALIDATION_LAYER_NAME);

        let validation_available = entry
            .enumerate_instance_layer_properties()?
            .iter()
            .any(|layer| {
                unsafe { CStr::from_ptr(layer.layer_name.as_ptr()) } == validation_layer_name
            });

        let use_validation_layer = if use_validation_layer && !validation_available {
            warn!("Validation requested but {:?} is not installed", validation_layer_name);
            false
        } else {
            use_validation_layer
        };

        // Skia's vulkan backend requires at least 1.1
        let appinfo = vk::ApplicationInfo::builder()
            .application_name(app_name)
            .application_version(0)
            .engine_name(app_name)
            .engine_version(0)
            .api_version(vk::make_api_version(0, 1, 1, 0));

        let mut layer_names = vec![];
        if use_validation_layer {
            layer_names.push(validation_layer_name.as_ptr());
        }

        let mut extension_names = window_extensions.to_vec();
        if use_validation_layer {
            extension_names.push(DebugUtils::name().as_ptr());
        }

        let create_info = vk::InstanceCreateInfo::builder()
            .application_info(&appinfo)
            .enabled_layer_names(&layer_names)
            .enabled_extension_names(&extension_names);

        info!(
            "Create vulkan instance (validation {})",
            if use_validation_layer { "on" } else { "off" }
        );
        let instance: ash::Instance = unsafe { entry.create_instance(&create_info, None)? };

        // Setup the debug callback for the validation layer
        let debug_reporter = if use_validation_layer {
            match VkDebugReporter::new(&entry, &instance) {
                Ok(debug_reporter) => Some(debug_reporter),
                Err(e) => {
                    unsafe { instance.destroy_instance(None) };
                    return Err(e.into());
                }
            }
        } else {
            None
        };

        Ok(VkInstance {
            entry,
            instance,
            debug_reporter,
        })
    }
}

impl Drop for VkInstance {
    fn drop(&mut self) {
        debug!("destroying VkInstance");
        std::mem::drop(self.debug_reporter.take());

        unsafe {
            self.instance.destroy_instance(None);
        }

        debug!("destroyed VkInstance");
    }
}

fn cstr(bytes: &'static [u8]) -> &'static CStr {
    // The constants above are nul terminated with no interior nul
    unsafe { CStr::from_bytes_with_nul_unchecked(bytes) }
}
