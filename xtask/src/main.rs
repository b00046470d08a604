//! Developer tasks: `cargo xtask <task>`.

use std::process::Command;

const DEMO_DIR: &str = "demos/counter";
const DEMO_WASM: &str = "./target/wasm32-unknown-unknown/debug/automount_counter.wasm";

/// Run `args` in `dir`, exiting the process if it can't be started or fails.
fn execute(dir: &str, args: &[&str]) {
    let cmd_full = args.join(" ");
    eprintln!("Running '{}' in {}", cmd_full, dir);

    let status = match Command::new(args[0]).current_dir(dir).args(&args[1..]).status() {
        Ok(status) => status,
        Err(err) => {
            eprintln!("Could not start '{}': {}", cmd_full, err);
            std::process::exit(1);
        }
    };

    if !status.success() {
        eprintln!("'{}' terminated with {}", cmd_full, status);
        std::process::exit(status.code().unwrap_or(1));
    }
    eprintln!("Finished: '{}'", cmd_full);
}

/// Compile the counter demo and generate its JS bindings into `pkg/`, next
/// to the demo's `index.html`.
fn demo_build() {
    execute(
        DEMO_DIR,
        &["cargo", "build", "--target", "wasm32-unknown-unknown"],
    );
    execute(
        "./",
        &[
            "wasm-bindgen",
            "--target",
            "web",
            "--no-typescript",
            "--out-dir",
            "demos/counter/pkg",
            DEMO_WASM,
        ],
    )
}

fn demo_serve() {
    execute(
        "./",
        &[
            "cargo",
            "watch",
            "-w",
            "demos/counter/src",
            "-w",
            "automount/src",
            "-s",
            "cargo xtask demo-build",
        ],
    );
}

/// Native unit tests, then the browser suite in a headless browser.
fn test_all() {
    execute("./", &["cargo", "test", "-p", "automount"]);
    execute(
        "automount",
        &["wasm-pack", "test", "--headless", "--firefox"],
    );
}

fn main() {
    let args: Vec<_> = std::env::args().skip(1).collect();
    let arg_refs: Vec<_> = args.iter().map(|x| x.as_str()).collect();

    match arg_refs.as_slice() {
        ["demo-build"] => demo_build(),
        ["demo-serve"] => demo_serve(),
        ["test"] => test_all(),
        _ => {
            eprintln!("Unknown arguments, expected one of: demo-build, demo-serve, test");
            std::process::exit(1);
        }
    }
}
