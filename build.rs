//! Build script for temp-forecast-pico2
//!
//! - Puts `memory.x` on the linker search path and adds the cortex-m-rt / defmt
//!   linker scripts, but only when building for the RP2350 (host test builds are untouched).
//! - With the `tflm` feature, links the TensorFlow Lite Micro C wrapper from `TFLM_LIB_DIR`.

use std::path::PathBuf;
use std::{env, fs};

fn main() {
    let target = env::var("TARGET").unwrap_or_default();

    if target.starts_with("thumbv8m") {
        let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
        fs::write(out_dir.join("memory.x"), include_bytes!("memory.x")).unwrap();
        println!("cargo:rustc-link-search={}", out_dir.display());
        println!("cargo:rerun-if-changed=memory.x");

        println!("cargo:rustc-link-arg-bins=--nmagic");
        println!("cargo:rustc-link-arg-bins=-Tlink.x");
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }

    if env::var_os("CARGO_FEATURE_TFLM").is_some() {
        println!("cargo:rerun-if-env-changed=TFLM_LIB_DIR");
        match env::var("TFLM_LIB_DIR") {
            Ok(dir) => {
                println!("cargo:rustc-link-search=native={dir}");
                println!("cargo:rustc-link-lib=static=tflm_wrapper");
            }
            Err(_) => {
                println!("cargo:warning=feature `tflm` is enabled but TFLM_LIB_DIR is not set");
                println!("cargo:warning=Point TFLM_LIB_DIR at the directory containing libtflm_wrapper.a");
            }
        }
    }
}
