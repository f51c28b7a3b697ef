//! This build script copies the `memory.x` file from the crate root into a directory where
//! the linker can always find it at build time, and bakes the watch configuration into
//! the binary.

use std::{env, fs::File, io::Write, path::PathBuf};

fn main() {
    // Put memory layout in the output directory and ensure it's on the linker search path.
    let out = &PathBuf::from(env::var_os("OUT_DIR").unwrap());
    File::create(out.join("memory.x"))
        .unwrap()
        .write_all(include_bytes!("memory.x"))
        .unwrap();
    println!("cargo:rustc-link-search={}", out.display());

    // Seconds east of UTC, e.g. `WATCH_UTC_OFFSET=3600` for CET
    let utc_offset: i32 = env::var("WATCH_UTC_OFFSET")
        .ok()
        .map(|v| v.trim().parse().expect("WATCH_UTC_OFFSET must be an integer"))
        .unwrap_or(0);
    // 24-hour clock unless explicitly disabled
    let clock_24h = env::var("WATCH_CLOCK_24H")
        .map(|v| !matches!(v.trim(), "0" | "false" | "no"))
        .unwrap_or(true);

    // The watch has no RTC backup, so it starts counting from the build time
    File::create(out.join("build_config.rs"))
        .unwrap()
        .write_fmt(format_args!(
            "pub const UTC_EPOCH: i64 = {:?};\n\
             pub const UTC_OFFSET: i32 = {:?};\n\
             pub const CLOCK_24H: bool = {:?};\n",
            chrono::Utc::now().timestamp(),
            utc_offset,
            clock_24h,
        ))
        .unwrap();

    // By default, Cargo re-runs a build script whenever any file in the project changes,
    // which keeps `UTC_EPOCH` close to the flashing time. Emitting any `rerun-if-*`
    // directive would disable that, so changing the `WATCH_*` variables needs a touch
    // of a source file to take effect.
}
