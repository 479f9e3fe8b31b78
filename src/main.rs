#[cfg(not(target_arch = "wasm32"))]
fn main() {
    eprintln!("titan-portfolio runs in the browser. Run `trunk serve` or `trunk build --release`.");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    titan_portfolio::frontend::run();
}
