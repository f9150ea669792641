fn main() {
    // Emits the ESP-IDF environment for target builds; a no-op on hosts
    // without an ESP-IDF toolchain configured.
    embuild::espidf::sysenv::output();
}
