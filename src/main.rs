fn main() {
    if let Err(err) = ddr_normalize::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
