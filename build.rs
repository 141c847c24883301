//! Build script for vision-bridge.
//!
//! In a production build, this would:
//! 1. Locate the vendor inference runtime (prebuilt .xcframework or source)
//! 2. Compile its C/C++ shim sources for the target mobile platform
//! 3. Generate Rust FFI bindings via bindgen
//!
//! For now, it's a placeholder that documents the intended build process.
//! The engine contract is satisfied by the deterministic executor in
//! `src/engine/executor.rs` until the real runtime is linked here.

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Future: compile and link the vendor inference runtime.
    //
    // Steps:
    // 1. Read VISION_RUNTIME_DIR for a prebuilt runtime, or vendor the source
    // 2. Use cc::Build to compile the C shim that exposes load/infer
    // 3. Link the platform acceleration frameworks (Metal/CoreML on iOS)
    // 4. Generate bindings with bindgen from the shim header
    //
    // Example (when implemented):
    //
    // ```
    // let runtime_dir = std::env::var("VISION_RUNTIME_DIR")
    //     .unwrap_or_else(|_| "vendor/runtime".to_string());
    //
    // cc::Build::new()
    //     .cpp(true)
    //     .file("vendor/runtime/shim.cpp")
    //     .include(format!("{runtime_dir}/include"))
    //     .flag("-std=c++17")
    //     .compile("vision_runtime");
    //
    // println!("cargo:rustc-link-search={runtime_dir}/lib");
    // println!("cargo:rustc-link-lib=vision_runtime");
    // ```
}
