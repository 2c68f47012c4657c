// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

fn build_cli() -> Command {
    Command::new("brigade")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Brigade Contributors")
        .about("Cook a set of package recipes in dependency order")
        .arg(
            Arg::new("recipes")
                .required(true)
                .num_args(1..)
                .value_name("RECIPES")
                .help("Recipe directories or glob patterns matching recipe directories"),
        )
        .arg(
            Arg::new("namespace")
                .long("namespace")
                .value_name("NAME")
                .help("Depot namespace to check for already-uploaded artifacts"),
        )
        .arg(
            Arg::new("depot_url")
                .long("depot-url")
                .value_name("URL")
                .default_value("https://depot.brigade-build.org")
                .help("Base URL of the package depot"),
        )
        .arg(
            Arg::new("builder")
                .long("builder")
                .value_name("NAME")
                .default_value("kiln")
                .help("Builder executable to drive, resolved on PATH"),
        )
        .arg(
            Arg::new("skip_checks")
                .long("skip-checks")
                .action(ArgAction::SetTrue)
                .help("Tell the builder to skip the post-build check phase"),
        )
        .arg(
            Arg::new("python_versions")
                .long("python-versions")
                .value_name("LIST")
                .default_value("3.12,3.13")
                .help("Python versions to cook against (comma or space separated)"),
        )
        .arg(
            Arg::new("numpy_versions")
                .long("numpy-versions")
                .value_name("LIST")
                .default_value("1.26,2.2")
                .help("Numpy versions to cook against (comma or space separated)"),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory - use CARGO_MANIFEST_DIR which is always set by cargo
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let cmd = build_cli();
    let man = Man::new(cmd);
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("brigade.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
