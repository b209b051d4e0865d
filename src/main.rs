fn main() {
    env_logger::init();
    let cli = dir_manifest::cli::parse();
    let code = dir_manifest::app::run_cli(cli);
    if code != 0 { std::process::exit(code); }
}
