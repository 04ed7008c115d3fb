fn main() {
    if let Err(err) = healthbridge_lib::run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}
