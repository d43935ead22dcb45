/// Embeds a file from the `res/` directory at compile time.
#[macro_export]
macro_rules! include_res {
    (str, $p:expr) => {
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
}
