use std::borrow::Cow;
use std::ffi::CStr;
use std::os::raw::c_void;

use ash::extensions::ext::DebugUtils;
use ash::vk;

//
// Callback for vulkan validation layer logging
//
unsafe extern "system" fn vulkan_debug_callback(
    message_severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    message_type: vk::DebugUtilsMessageTypeFlagsEXT,
    p_callback_data: *const vk::DebugUtilsMessengerCallbackDataEXT,
    _user_data: *mut c_void,
) -> vk::Bool32 {
    let message = if p_callback_data.is_null() || (*p_callback_data).p_message.is_null() {
        Cow::from("")
    } else {
        CStr::from_ptr((*p_callback_data).p_message).to_string_lossy()
    };

    if message_severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::ERROR) {
        error!("{:?} {}", message_type, message);
    } else if message_severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::WARNING) {
        warn!("{:?} {}", message_type, message);
    } else if message_severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::INFO) {
        debug!("{:?} {}", message_type, message);
    } else {
        trace!("{:?} {}", message_type, message);
    }

    vk::FALSE
}

pub struct VkDebugReporter {
    debug_utils_loader: DebugUtils,
    debug_messenger: vk::DebugUtilsMessengerEXT,
}

impl VkDebugReporter {
    pub fn new(
        entry: &ash::Entry,
        instance: &ash::Instance,
    ) -> Result<Self, vk::Result> {
        info!("Setup vulkan debug callback");
        let debug_info = vk::DebugUtilsMessengerCreateInfoEXT::builder()
            .message_severity(
                vk::DebugUtilsMessageSeverityFlagsEXT::ERROR
                    | vk::DebugUtilsMessageSeverityFlagsEXT::WARNING
                    | vk::DebugUtilsMessageSeverityFlagsEXT::INFO,
            )
            .message_type(
                vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                    | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                    | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE,
            )
            .pfn_user_callback(Some(vulkan_debug_callback));

        let debug_utils_loader = DebugUtils::new(entry, instance);
        let debug_messenger =
            unsafe { debug_utils_loader.create_debug_utils_messenger(&debug_info, None)? };

        Ok(VkDebugReporter {
            debug_utils_loader,
            debug_messenger,
        })
    }
}

impl Drop for VkDebugReporter {
    fn drop(&mut self) {
        unsafe {
            debug!("destroying VkDebugReporter");
            self.debug_utils_loader
                .destroy_debug_utils_messenger(self.debug_messenger, None);
            debug!("destroyed VkDebugReporter");
        }
    }
}
