// src/utils/windows.rs

use windows::Win32::{
    Foundation::{CloseHandle, HANDLE},
    Security::{GetTokenInformation, TokenElevation, TOKEN_ELEVATION, TOKEN_QUERY},
    System::Threading::{GetCurrentProcess, OpenProcessToken},
};

/// Checks if the current process is running with elevated (administrator)
/// privileges.
pub fn is_elevated() -> bool {
    let mut handle: HANDLE = HANDLE::default();
    if unsafe { OpenProcessToken(GetCurrentProcess(), TOKEN_QUERY, &mut handle).is_ok() } {
        let mut elevation: TOKEN_ELEVATION = unsafe { std::mem::zeroed() };
        let size = std::mem::size_of::<TOKEN_ELEVATION>();
        let mut ret_size = size;
        if unsafe {
            GetTokenInformation(
                handle,
                TokenElevation,
                Some(&mut elevation as *mut _ as *mut _),
                size as u32,
                &mut ret_size as *mut _ as *mut _,
            )
            .is_ok()
        } {
            if handle != HANDLE(std::ptr::null_mut()) && unsafe { CloseHandle(handle).is_err() } {
                return false;
            }
            return elevation.TokenIsElevated != 0;
        }
    }
    if handle != HANDLE(std::ptr::null_mut()) && unsafe { CloseHandle(handle).is_err() } {
        return false;
    }
    false
}
