//! Generates `include/reqline.h` from the `extern "C"` surface.

use std::env;

fn main() {
    println!("cargo:rerun-if-changed=src");

    let Ok(crate_dir) = env::var("CARGO_MANIFEST_DIR") else {
        return;
    };
    match cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("REQLINE_FFI_H")
        .generate()
    {
        Ok(bindings) => {
            bindings.write_to_file(format!("{crate_dir}/include/reqline.h"));
        }
        Err(err) => println!("cargo:warning=header generation skipped: {err}"),
    }
}
