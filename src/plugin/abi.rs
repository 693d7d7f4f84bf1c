//! Plugin entry points.
//!
//! A plugin library exports two C-linkage symbols:
//!
//! | Symbol                      | Signature                        |
//! |-----------------------------|----------------------------------|
//! | `filterpipe_create_plugin`  | `() -> *mut PluginSlot`          |
//! | `filterpipe_destroy_plugin` | `(*mut PluginSlot) -> bool`      |
//!
//! The slot holds the constructor's `Result`, so a construction error such
//! as [`PluginError::DuplicateFilter`] reaches the host unchanged. Null means
//! the plugin failed without a reason. The slot layout is Rust's, so plugins
//! must be built with the same compiler and the same version of this crate
//! as the host.

use crate::plugin::{Plugin, PluginError};
use tracing::error;

pub const CREATE_PLUGIN_SYMBOL: &[u8] = b"filterpipe_create_plugin\0";
pub const DESTROY_PLUGIN_SYMBOL: &[u8] = b"filterpipe_destroy_plugin\0";

/// What the create entry point hands over.
pub type PluginSlot = Result<Plugin, PluginError>;

#[allow(improper_ctypes_definitions)]
pub type CreatePluginFn = unsafe extern "C" fn() -> *mut PluginSlot;
#[allow(improper_ctypes_definitions)]
pub type DestroyPluginFn = unsafe extern "C" fn(*mut PluginSlot) -> bool;

/// Hand a constructor's result to the host.
pub fn into_raw(slot: PluginSlot) -> *mut PluginSlot {
    if let Err(e) = &slot {
        error!("Plugin construction failed: {}", e);
    }
    Box::into_raw(Box::new(slot))
}

/// Free a slot produced by [`into_raw`]. Returns false for null.
///
/// # Safety
///
/// `slot` must be null or a pointer returned by [`into_raw`] in the same
/// library that has not been freed yet.
pub unsafe fn free_raw(slot: *mut PluginSlot) -> bool {
    if slot.is_null() {
        return false;
    }
    drop(Box::from_raw(slot));
    true
}

/// Export the plugin entry points for a constructor
/// `fn() -> Result<Plugin, PluginError>`.
///
/// ```ignore
/// fn build() -> Result<Plugin, PluginError> {
///     Plugin::builder(MY_PLUGIN_ID, "MyPlugin")
///         .register(|| Box::new(MyFilter))
///         .build()
/// }
///
/// filterpipe_rs::declare_plugin!(build);
/// ```
#[macro_export]
macro_rules! declare_plugin {
    ($ctor:path) => {
        #[no_mangle]
        #[allow(improper_ctypes_definitions)]
        pub extern "C" fn filterpipe_create_plugin() -> *mut $crate::plugin::abi::PluginSlot {
            $crate::plugin::abi::into_raw($ctor())
        }

        /// # Safety
        ///
        /// `plugin` must come from `filterpipe_create_plugin` of this library.
        #[no_mangle]
        #[allow(improper_ctypes_definitions)]
        pub unsafe extern "C" fn filterpipe_destroy_plugin(
            slot: *mut $crate::plugin::abi::PluginSlot,
        ) -> bool {
            $crate::plugin::abi::free_raw(slot)
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_into_raw_round_trip() {
        let raw = into_raw(Plugin::builder(Uuid::from_u128(7), "Empty").build());
        assert!(!raw.is_null());
        unsafe {
            assert_eq!((*raw).as_ref().unwrap().name(), "Empty");
            assert!(free_raw(raw));
        }
    }

    #[test]
    fn test_construction_error_crosses_boundary() {
        let error = PluginError::DuplicateFilter {
            plugin: "Broken".to_string(),
            filter: Uuid::nil(),
        };
        let raw = into_raw(Err(error.clone()));
        assert!(!raw.is_null());
        unsafe {
            assert_eq!((*raw).as_ref().unwrap_err(), &error);
            assert!(free_raw(raw));
        }
        assert!(!unsafe { free_raw(std::ptr::null_mut()) });
    }
}
