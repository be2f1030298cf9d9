//! Host operating system description for the session summary.

/// `<system> <release>` of the host, e.g. `Linux 6.8.0-45-generic`.
#[cfg(unix)]
pub fn os_description() -> String {
    use std::ffi::CStr;

    let mut uts: libc::utsname = unsafe { std::mem::zeroed() };
    if unsafe { libc::uname(&mut uts) } != 0 {
        return fallback_description();
    }

    let field = |raw: &[libc::c_char]| {
        unsafe { CStr::from_ptr(raw.as_ptr()) }
            .to_string_lossy()
            .into_owned()
    };
    format!("{} {}", field(&uts.sysname[..]), field(&uts.release[..]))
}

#[cfg(not(unix))]
pub fn os_description() -> String {
    fallback_description()
}

fn fallback_description() -> String {
    let os = std::env::consts::OS;
    let mut chars = os.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Platform tag printed next to the description, e.g. `linux`.
pub fn platform() -> &'static str {
    std::env::consts::OS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_description_is_not_empty() {
        assert!(!os_description().trim().is_empty());
    }

    #[test]
    fn test_fallback_is_capitalized() {
        let desc = fallback_description();
        assert!(desc.chars().next().is_some_and(char::is_uppercase));
    }
}
