use std::time::{SystemTime, UNIX_EPOCH};

fn main() {
    // Compile timestamp, the Rust rendering of __DATE__ " " __TIME__.
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    println!("cargo:rustc-env=CAMCLOCK_BUILD_UNIX={secs}");
    println!("cargo:rerun-if-changed=build.rs");
}
