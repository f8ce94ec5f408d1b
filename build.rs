use std::env;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Host builds only carry the library and its tests
    let target = env::var("TARGET").unwrap_or_default();
    if !target.contains("avr") {
        return;
    }

    println!("cargo:rustc-link-arg=-mmcu=atmega128a");

    if env::var("CARGO_FEATURE_RT").is_err() {
        println!("cargo:warning=Building the firmware image requires `--features rt`");
    }
}
