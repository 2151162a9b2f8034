//! `conan-install`: install the Conan dependencies for one build mode.

fn main() {
    env_logger::init();
    std::process::exit(conanrun::install_main());
}
