//! Build script for pyload
//!
//! Compiles `stub/foo_stub.c` into a shared library with the host C
//! compiler. The integration tests load it in place of a real interpreter.
//! Its path is exported as `PYLOAD_STUB_LIBRARY`, empty when no stub could
//! be built.

use std::env;
use std::path::{Path, PathBuf};

const STUB_SOURCE: &str = "stub/foo_stub.c";

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed={}", STUB_SOURCE);

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let stub = match build_stub(&out_dir) {
        Ok(path) => path.display().to_string(),
        Err(reason) => {
            println!("cargo:warning=stub library not built: {}", reason);
            String::new()
        }
    };
    println!("cargo:rustc-env=PYLOAD_STUB_LIBRARY={}", stub);
}

/// Compile the stub as a shared object in `out_dir`
fn build_stub(out_dir: &Path) -> Result<PathBuf, String> {
    let target_os = env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    let lib_name = match target_os.as_str() {
        "windows" => return Err("stub build is not supported on Windows".to_string()),
        "macos" | "ios" => "libfoostub.dylib",
        _ => "libfoostub.so",
    };
    let lib_path = out_dir.join(lib_name);
    let source = PathBuf::from(env::var("CARGO_MANIFEST_DIR").map_err(|e| e.to_string())?)
        .join(STUB_SOURCE);

    let compiler = cc::Build::new()
        .cargo_metadata(false)
        .try_get_compiler()
        .map_err(|e| e.to_string())?;
    if compiler.is_like_msvc() {
        return Err("MSVC toolchain".to_string());
    }

    let status = compiler
        .to_command()
        .args(["-shared", "-fPIC", "-O1", "-o"])
        .arg(&lib_path)
        .arg(source)
        .status()
        .map_err(|e| format!("failed to run C compiler: {}", e))?;

    if status.success() {
        Ok(lib_path)
    } else {
        Err(format!("C compiler exited with {}", status))
    }
}
