//! Build script for retrial.
//!
//! On Windows this embeds an application manifest with `longPathAware=true`
//! so the wipe and restore steps can walk configuration trees that nest past
//! the 260-character MAX_PATH limit (plugin folders routinely do). On other
//! platforms the script does nothing.

fn main() {
    #[cfg(windows)]
    {
        embed_resource::compile("retrial.rc", embed_resource::NONE);

        println!("cargo:rerun-if-changed=retrial.rc");
        println!("cargo:rerun-if-changed=retrial.manifest");
    }
}
