//! Let cargo know that the embedded migrations need a rebuild when they change.
fn main() {
    println!("cargo:rerun-if-changed=migrations");
}
