use std::env;
use std::fs::{self, DirBuilder};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());

    let executable_dir = locate_target_dir_from_output_dir(&out_dir)
        .expect("failed to find target dir from OUT_DIR");

    println!("cargo:rerun-if-changed=assets");
    copy(&manifest_dir.join("assets"), &executable_dir.join("assets"));
}

// OUT_DIR is <target>/<profile>/build/<crate>-<hash>/out
fn locate_target_dir_from_output_dir(out_dir: &Path) -> Option<&Path> {
    out_dir
        .ancestors()
        .find(|dir| dir.file_name().map_or(false, |name| name == "build"))
        .and_then(Path::parent)
}

fn copy(from: &Path, to: &Path) {
    let from_path: PathBuf = from.into();
    let to_path: PathBuf = to.into();
    for entry in WalkDir::new(from_path.clone()) {
        let entry = entry.unwrap();

        if let Ok(rel_path) = entry.path().strip_prefix(&from_path) {
            let target_path = to_path.join(rel_path);

            if entry.file_type().is_dir() {
                DirBuilder::new()
                    .recursive(true)
                    .create(target_path)
                    .expect("failed to create target dir");
            } else {
                fs::copy(entry.path(), &target_path).expect("failed to copy");
            }
        }
    }
}
