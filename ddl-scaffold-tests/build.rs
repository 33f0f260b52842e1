fn main() {
    // Generated files land in OUT_DIR and are only read by the tests
    // (via include_str!), so normal compilation is unaffected
    ddl_scaffold::generate_from_cargo_metadata().expect("codegen failed");
}
