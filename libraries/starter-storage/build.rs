// `sqlx::migrate!` embeds the schema at compile time; re-embed on any change.
fn main() {
    println!("cargo:rerun-if-changed=migrations");
}
