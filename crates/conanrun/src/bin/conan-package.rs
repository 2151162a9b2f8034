//! `conan-package`: create the Conan package for every build mode.

fn main() {
    env_logger::init();
    std::process::exit(conanrun::package_main());
}
